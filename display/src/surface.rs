//! Display Surface
//!
//! The pixel buffer the host presents. Rows are `pitch` bytes apart; the
//! pitch may exceed `width * bytes_per_pixel` when the host pads rows.
//! Multi-byte pixels are stored little-endian.

use alloc::vec::Vec;

use crate::host::HostError;

/// Pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16-bit RGB (5-6-5)
    Rgb565,
    /// 32-bit XRGB (RGB + padding)
    Xrgb8888,
}

impl PixelFormat {
    /// Format for a pixel depth, if one is supported
    pub fn from_depth(bpp: u8) -> Option<Self> {
        match bpp {
            16 => Some(PixelFormat::Rgb565),
            32 => Some(PixelFormat::Xrgb8888),
            _ => None,
        }
    }

    /// Get bits per pixel
    pub fn bits_per_pixel(&self) -> u8 {
        match self {
            PixelFormat::Rgb565 => 16,
            PixelFormat::Xrgb8888 => 32,
        }
    }

    /// Get bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel() as usize + 7) / 8
    }

    /// Pack 8-bit channels into a pixel value of this format.
    pub fn map_rgb(&self, r: u8, g: u8, b: u8) -> u32 {
        match self {
            PixelFormat::Rgb565 => {
                ((r as u32 >> 3) << 11) | ((g as u32 >> 2) << 5) | (b as u32 >> 3)
            }
            PixelFormat::Xrgb8888 => ((r as u32) << 16) | ((g as u32) << 8) | b as u32,
        }
    }
}

/// Display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: PixelFormat,
}

/// The shared pixel surface.
#[derive(Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    /// Bytes per row
    pitch: usize,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a surface with rows padded to four bytes.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, HostError> {
        let row = width as usize * format.bytes_per_pixel();
        Self::with_pitch(width, height, format, (row + 3) & !3)
    }

    /// Create a surface with an explicit row pitch.
    pub fn with_pitch(
        width: u32,
        height: u32,
        format: PixelFormat,
        pitch: usize,
    ) -> Result<Self, HostError> {
        if pitch < width as usize * format.bytes_per_pixel() {
            return Err(HostError::ModeFailed);
        }
        let len = pitch * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| HostError::OutOfMemory)?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pitch,
            format,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel memory
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Byte offset of a pixel, or `None` outside the surface.
    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.pitch + x as usize * self.format.bytes_per_pixel())
    }

    /// The visible part of row `y`, `width * bpp` bytes long.
    pub fn row_mut(&mut self, y: i32) -> Option<&mut [u8]> {
        let start = self.offset(0, y)?;
        let len = self.width as usize * self.format.bytes_per_pixel();
        self.pixels.get_mut(start..start + len)
    }

    /// Get a 16-bit pixel (checked)
    pub fn read_u16(&self, x: i32, y: i32) -> Option<u16> {
        let at = self.offset(x, y)?;
        let bytes = self.pixels.get(at..at + 2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Set a 16-bit pixel (checked)
    pub fn write_u16(&mut self, x: i32, y: i32, value: u16) {
        if let Some(at) = self.offset(x, y) {
            if let Some(bytes) = self.pixels.get_mut(at..at + 2) {
                bytes.copy_from_slice(&value.to_le_bytes());
            }
        }
    }

    /// Get a 32-bit pixel (checked)
    pub fn read_u32(&self, x: i32, y: i32) -> Option<u32> {
        let at = self.offset(x, y)?;
        let bytes = self.pixels.get(at..at + 4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Set a 32-bit pixel (checked)
    pub fn write_u32(&mut self, x: i32, y: i32, value: u32) {
        if let Some(at) = self.offset(x, y) {
            if let Some(bytes) = self.pixels.get_mut(at..at + 4) {
                bytes.copy_from_slice(&value.to_le_bytes());
            }
        }
    }

    /// Read a pixel in the surface's own format.
    pub fn read_pixel(&self, x: i32, y: i32) -> Option<u32> {
        match self.format {
            PixelFormat::Rgb565 => self.read_u16(x, y).map(u32::from),
            PixelFormat::Xrgb8888 => self.read_u32(x, y),
        }
    }
}
