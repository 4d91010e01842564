//! Color values

/// A Win32 `COLORREF`: `0x00BBGGRR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ColorRef(pub u32);

impl ColorRef {
    /// Create a color from its channels (the `RGB` macro).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self((r as u32) | ((g as u32) << 8) | ((b as u32) << 16))
    }

    #[inline]
    pub const fn red(&self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Common colors
    pub const BLACK: ColorRef = ColorRef::rgb(0, 0, 0);
    pub const WHITE: ColorRef = ColorRef::rgb(255, 255, 255);
}
