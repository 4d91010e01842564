//! Display configuration.
//!
//! Compile-time defaults and the runtime configuration handed to the
//! driver at construction.

use win32k_gdi::ColorRef;

/// Default screen width in pixels.
pub const SCREEN_WIDTH: u32 = 640;

/// Default screen height in pixels.
pub const SCREEN_HEIGHT: u32 = 480;

/// Default pixel depth.
pub const DEFAULT_DEPTH: u8 = 16;

/// Desktop background painted at init.
pub const BACKGROUND_COLOR: ColorRef = ColorRef::rgb(0x3b, 0x72, 0xa9);

/// Rectangle border color.
pub const PEN_COLOR: ColorRef = ColorRef::BLACK;

/// Fill color used by pattern block transfers.
pub const PATTERN_COLOR: ColorRef = ColorRef::BLACK;

/// User event code the host timer callback posts to wake the idle loop.
pub const TIMER_WAKE_CODE: i32 = 0;

/// Runtime display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per pixel; selects the driver variant
    pub depth: u8,
    /// Background painted over the whole surface at init
    pub background: ColorRef,
    /// Border color for rectangles
    pub pen: ColorRef,
    /// Fill color for pattern transfers
    pub pattern: ColorRef,
}

impl DisplayConfig {
    /// Same configuration at another size and depth.
    pub fn with_mode(mut self, width: u32, height: u32, depth: u8) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            depth: DEFAULT_DEPTH,
            background: BACKGROUND_COLOR,
            pen: PEN_COLOR,
            pattern: PATTERN_COLOR,
        }
    }
}
