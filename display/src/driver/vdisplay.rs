//! Host-backed display driver
//!
//! [`VirtualDisplay`] owns the host library. Each primitive clips against
//! the surface, locks it for the pixel loop only, and reports damage to
//! the host once the lock is released. The same value is the scheduler's
//! idle handler, since the event loop waits on the same host.

use alloc::string::String;

use win32k_gdi::{BrushColor, ColorRef, DeviceContext, Rect};

use super::{DisplayDriver, ExtTextOutFlags, PixelFormatDriver};
use crate::config::DisplayConfig;
use crate::damage::DamageRect;
use crate::host::{Host, SurfaceGuard};
use crate::idle::{EventBridge, IdleEnv, IdleOutcome, IdleStats, Sleeper};
use crate::{DisplayError, DisplayResult};

/// Display driver drawing through a host library.
pub struct VirtualDisplay<H: Host, F: PixelFormatDriver> {
    host: H,
    format: F,
    config: DisplayConfig,
    bridge: EventBridge,
    /// Set once init has installed us as the idle handler
    idle_registered: bool,
}

impl<H: Host, F: PixelFormatDriver> VirtualDisplay<H, F> {
    pub fn new(host: H, format: F, config: DisplayConfig) -> Self {
        Self {
            host,
            format,
            config,
            bridge: EventBridge::new(),
            idle_registered: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Whether init registered this driver as the idle handler.
    pub fn is_idle_handler(&self) -> bool {
        self.idle_registered
    }

    pub fn idle_stats(&self) -> IdleStats {
        self.bridge.stats()
    }

    fn screen_size(&self) -> DisplayResult<(i32, i32)> {
        let surface = self.host.surface().ok_or(DisplayError::NotInitialized)?;
        Ok((surface.width() as i32, surface.height() as i32))
    }

    /// Normalize `rect` and clip it to the surface.
    fn clip(&self, rect: Rect) -> DisplayResult<Rect> {
        let (width, height) = self.screen_size()?;
        let r = rect.normalized();
        Ok(Rect::new(
            r.left.max(0),
            r.top.max(0),
            r.right.min(width),
            r.bottom.min(height),
        ))
    }

    /// Hand `damage` to the host. It is always clipped to the surface.
    fn report_damage(&mut self, damage: DamageRect) {
        debug_assert!(
            self.screen_size()
                .map_or(true, |(w, h)| damage.within(w as u32, h as u32)),
            "damage {:?} off surface",
            damage
        );
        self.host.update_rect(damage);
    }

    fn paint_background(&mut self) -> DisplayResult<()> {
        let (width, height) = self.screen_size()?;
        let full = Rect::new(0, 0, width, height);
        let background = self.config.background;
        {
            let mut guard = SurfaceGuard::lock(&mut self.host)?;
            self.format.polypatblt_l(guard.surface()?, &full, background);
        }
        self.report_damage(DamageRect::from_rect(&full));
        Ok(())
    }
}

fn lock<H: Host>(host: &mut H) -> DisplayResult<SurfaceGuard<'_, H>> {
    SurfaceGuard::lock(host).map_err(|err| {
        log::warn!("[display] surface lock failed: {}", err);
        err
    })
}

impl<H: Host, F: PixelFormatDriver> DisplayDriver for VirtualDisplay<H, F> {
    fn init(&mut self) -> DisplayResult<()> {
        if self.host.was_init() {
            return Ok(());
        }

        self.host.init()?;
        let mode = self.format.select_mode(&self.config);
        if let Err(err) = self.host.set_video_mode(mode) {
            log::warn!(
                "[display] {}x{} at {} bpp rejected by host",
                mode.width,
                mode.height,
                mode.format.bits_per_pixel()
            );
            self.host.quit();
            return Err(err.into());
        }
        if let Err(err) = self.paint_background() {
            self.host.quit();
            return Err(err);
        }

        self.idle_registered = true;
        log::info!(
            "[display] {}x{} {} bpp up",
            mode.width,
            mode.height,
            mode.format.bits_per_pixel()
        );
        Ok(())
    }

    fn fini(&mut self) {
        if !self.host.was_init() {
            return;
        }
        self.host.quit();
        self.idle_registered = false;
        log::info!("[display] shut down");
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: ColorRef) -> DisplayResult<()> {
        let (width, height) = self.screen_size()?;
        let inside = (0..width).contains(&x) && (0..height).contains(&y);
        {
            let mut guard = lock(&mut self.host)?;
            if inside {
                self.format.set_pixel_l(guard.surface()?, x, y, color);
            }
        }
        if inside {
            self.report_damage(DamageRect::new(x, y, 1, 1));
        }
        Ok(())
    }

    fn rectangle(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        brush: &dyn BrushColor,
    ) -> DisplayResult<()> {
        let rect = self.clip(Rect::new(left, top, right, bottom))?;
        log::trace!("[display] rectangle {:?}", rect);
        if rect.is_empty() {
            return Ok(());
        }

        let pen = self.config.pen;
        {
            let mut guard = lock(&mut self.host)?;
            self.format
                .rectangle_l(guard.surface()?, &rect, pen, brush.color());
        }
        self.report_damage(DamageRect::from_rect(&rect));
        Ok(())
    }

    fn ext_text_out(
        &mut self,
        x: i32,
        y: i32,
        options: ExtTextOutFlags,
        rect: Option<&Rect>,
        text: &[u16],
    ) -> DisplayResult<()> {
        let _guard = lock(&mut self.host)?;
        let text: String = char::decode_utf16(text.iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        log::debug!(
            "[display] text at ({}, {}) {:?} {:?}: {}",
            x,
            y,
            options,
            rect,
            text
        );
        Ok(())
    }

    fn bitblt(
        &mut self,
        x_dest: i32,
        y_dest: i32,
        cx: i32,
        cy: i32,
        src: &dyn DeviceContext,
        x_src: i32,
        y_src: i32,
        rop: u32,
    ) -> DisplayResult<()> {
        let (width, height) = self.screen_size()?;

        // keep the destination on the surface
        let x_dest = x_dest.max(0);
        let y_dest = y_dest.max(0);
        let cx = cx.min(width.saturating_sub(x_dest));
        let cy = cy.min(height.saturating_sub(y_dest));

        // and the source on its bitmap
        let (src_width, src_height) = src.selected_bitmap_size();
        let x_src = x_src.max(0);
        let y_src = y_src.max(0);
        let cx = cx.min(src_width.saturating_sub(x_src));
        let cy = cy.min(src_height.saturating_sub(y_src));

        log::trace!(
            "[display] bitblt {}x{} from ({}, {}) to ({}, {})",
            cx,
            cy,
            x_src,
            y_src,
            x_dest,
            y_dest
        );
        if cx <= 0 || cy <= 0 {
            return Ok(());
        }

        {
            let mut guard = lock(&mut self.host)?;
            self.format.bitblt_l(
                guard.surface()?,
                x_dest,
                y_dest,
                cx,
                cy,
                src,
                x_src,
                y_src,
                rop,
            );
        }
        self.report_damage(DamageRect::new(x_dest, y_dest, cx as u32, cy as u32));
        Ok(())
    }

    fn polypatblt(&mut self, rop: u32, rect: Rect) -> DisplayResult<()> {
        let rect = self.clip(rect)?;
        log::trace!("[display] polypatblt {:#010x} {:?}", rop, rect);
        if rect.is_empty() {
            return Ok(());
        }

        let pattern = self.config.pattern;
        {
            let mut guard = lock(&mut self.host)?;
            self.format.polypatblt_l(guard.surface()?, &rect, pattern);
        }
        self.report_damage(DamageRect::from_rect(&rect));
        Ok(())
    }
}

impl<H: Host, F: PixelFormatDriver> Sleeper for VirtualDisplay<H, F> {
    fn check_events(&mut self, env: &mut IdleEnv<'_>, wait: bool) -> IdleOutcome {
        self.bridge.check_events(&mut self.host, env, wait)
    }
}
