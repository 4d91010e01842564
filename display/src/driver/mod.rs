//! Virtual Display Driver
//!
//! GDI drawing primitives on the host surface. The public contract is
//! [`DisplayDriver`]; the per-depth parts (mode selection, color mapping
//! and the pixel loops run while the surface is locked) live behind
//! [`PixelFormatDriver`], with one implementation per supported depth.

mod bpp16;
mod bpp32;
mod vdisplay;

use alloc::boxed::Box;

use bitflags::bitflags;
use win32k_gdi::{BrushColor, ColorRef, DeviceContext, Rect};

use crate::config::DisplayConfig;
use crate::host::Host;
use crate::idle::Sleeper;
use crate::surface::{DisplayMode, PixelFormat, Surface};
use crate::{DisplayError, DisplayResult};

pub use bpp16::Bpp16;
pub use bpp32::Bpp32;
pub use vdisplay::VirtualDisplay;

/// Raster operation codes
pub mod rop {
    /// dest = source
    pub const SRCCOPY: u32 = 0x00cc_0020;
    /// dest = pattern
    pub const PATCOPY: u32 = 0x00f0_0021;
}

bitflags! {
    /// `ETO_*` text output options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExtTextOutFlags: u32 {
        const OPAQUE = 0x0002;
        const CLIPPED = 0x0004;
    }
}

/// Drawing contract GDI calls into.
///
/// Every primitive that touches pixels fails with
/// [`DisplayError::LockFailed`] when the surface cannot be locked, and
/// writes nothing in that case. Coordinates are clipped to the surface
/// silently.
pub trait DisplayDriver: Send {
    /// Bring up the host display, paint the background and become the
    /// idle handler. Does nothing if the host display is already up.
    fn init(&mut self) -> DisplayResult<()>;

    /// Shut the host display down if it is up.
    fn fini(&mut self);

    fn set_pixel(&mut self, x: i32, y: i32, color: ColorRef) -> DisplayResult<()>;

    /// Filled rectangle: pen-colored border, brush-colored interior.
    fn rectangle(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        brush: &dyn BrushColor,
    ) -> DisplayResult<()>;

    /// Text output. Logged only; nothing is rasterized.
    fn ext_text_out(
        &mut self,
        x: i32,
        y: i32,
        options: ExtTextOutFlags,
        rect: Option<&Rect>,
        text: &[u16],
    ) -> DisplayResult<()>;

    /// Copy a block from the bitmap selected into `src`.
    #[allow(clippy::too_many_arguments)]
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
    ) -> DisplayResult<()>;

    /// Pattern fill of `rect`.
    fn polypatblt(&mut self, rop: u32, rect: Rect) -> DisplayResult<()>;
}

/// Per-depth half of the driver.
///
/// The `*_l` methods run with the surface already locked and expect
/// coordinates already clipped to it.
pub trait PixelFormatDriver: Send {
    fn format(&self) -> PixelFormat;

    /// Video mode to request from the host.
    fn select_mode(&self, config: &DisplayConfig) -> DisplayMode {
        DisplayMode {
            width: config.width,
            height: config.height,
            format: self.format(),
        }
    }

    /// Convert a `COLORREF` to a pixel value.
    fn map_colorref(&self, color: ColorRef) -> u32 {
        self.format().map_rgb(color.red(), color.green(), color.blue())
    }

    /// Store one mapped pixel.
    fn put_pixel(&self, surface: &mut Surface, x: i32, y: i32, pixel: u32);

    /// Store `len` copies of a mapped pixel starting at `(x, y)`.
    fn fill_span(&self, surface: &mut Surface, x: i32, y: i32, len: i32, pixel: u32) {
        for i in 0..len {
            self.put_pixel(surface, x + i, y, pixel);
        }
    }

    fn set_pixel_l(&self, surface: &mut Surface, x: i32, y: i32, color: ColorRef) {
        self.put_pixel(surface, x, y, self.map_colorref(color));
    }

    fn rectangle_l(&self, surface: &mut Surface, rect: &Rect, pen: ColorRef, brush: ColorRef) {
        let pen = self.map_colorref(pen);
        let brush = self.map_colorref(brush);
        let width = rect.width();

        self.fill_span(surface, rect.left, rect.top, width, pen);
        for y in rect.top + 1..rect.bottom - 1 {
            self.put_pixel(surface, rect.left, y, pen);
            if width > 2 {
                self.fill_span(surface, rect.left + 1, y, width - 2, brush);
            }
            if width > 1 {
                self.put_pixel(surface, rect.right - 1, y, pen);
            }
        }
        if rect.height() > 1 {
            self.fill_span(surface, rect.left, rect.bottom - 1, width, pen);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn bitblt_l(
        &self,
        surface: &mut Surface,
        x_dest: i32,
        y_dest: i32,
        cx: i32,
        cy: i32,
        src: &dyn DeviceContext,
        x_src: i32,
        y_src: i32,
        rop: u32,
    ) {
        if rop != rop::SRCCOPY {
            log::warn!("[display] unsupported rop {:#010x}, copying", rop);
        }
        for dy in 0..cy {
            for dx in 0..cx {
                let color = src.get_pixel(x_src + dx, y_src + dy);
                self.put_pixel(surface, x_dest + dx, y_dest + dy, self.map_colorref(color));
            }
        }
    }

    fn polypatblt_l(&self, surface: &mut Surface, rect: &Rect, color: ColorRef) {
        let pixel = self.map_colorref(color);
        for y in rect.top..rect.bottom {
            self.fill_span(surface, rect.left, y, rect.width(), pixel);
        }
    }
}

/// The installed display manager: drawing plus the scheduler's idle hook.
pub trait Win32kManager: DisplayDriver + Sleeper {}

impl<T: DisplayDriver + Sleeper + ?Sized> Win32kManager for T {}

/// Build the driver variant matching `config.depth`.
pub fn create_manager<H: Host + 'static>(
    host: H,
    config: DisplayConfig,
) -> DisplayResult<Box<dyn Win32kManager>> {
    match config.depth {
        16 => Ok(Box::new(VirtualDisplay::new(host, Bpp16, config))),
        32 => Ok(Box::new(VirtualDisplay::new(host, Bpp32, config))),
        depth => {
            log::warn!("[display] no driver for {} bpp", depth);
            Err(DisplayError::UnsupportedDepth(depth))
        }
    }
}
