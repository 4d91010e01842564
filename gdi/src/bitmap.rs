//! Bitmaps and device contexts
//!
//! Block transfers read their source through a device context: the size of
//! the bitmap selected into it, and one pixel at a time.

use alloc::vec::Vec;

use crate::color::ColorRef;
use crate::{GdiError, GdiResult};

/// Source side of a block transfer.
pub trait DeviceContext {
    /// Width and height of the selected bitmap.
    fn selected_bitmap_size(&self) -> (i32, i32);

    /// Color at `(x, y)` in the selected bitmap.
    fn get_pixel(&self, x: i32, y: i32) -> ColorRef;
}

/// A device-independent bitmap stored as `COLORREF` values.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: i32,
    height: i32,
    pixels: Vec<ColorRef>,
}

impl Bitmap {
    /// Create a bitmap filled with `fill`.
    pub fn new(width: i32, height: i32, fill: ColorRef) -> GdiResult<Self> {
        if width < 0 || height < 0 {
            return Err(GdiError::InvalidParameter);
        }
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| GdiError::OutOfMemory)?;
        pixels.resize(len, fill);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Get pixel at coordinates (checked)
    pub fn pixel(&self, x: i32, y: i32) -> Option<ColorRef> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Set pixel at coordinates (checked)
    pub fn set_pixel(&mut self, x: i32, y: i32, color: ColorRef) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let offset = y as usize * self.width as usize + x as usize;
        self.pixels[offset] = color;
    }
}

/// A memory device context with a bitmap selected into it.
#[derive(Debug, Clone)]
pub struct MemoryDc {
    bitmap: Bitmap,
}

impl MemoryDc {
    pub fn new(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.bitmap
    }
}

impl DeviceContext for MemoryDc {
    fn selected_bitmap_size(&self) -> (i32, i32) {
        (self.bitmap.width, self.bitmap.height)
    }

    fn get_pixel(&self, x: i32, y: i32) -> ColorRef {
        // CLR_INVALID outside the bitmap
        self.bitmap.pixel(x, y).unwrap_or(ColorRef(0xffff_ffff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_pixels() {
        let mut bitmap = Bitmap::new(4, 3, ColorRef::BLACK).unwrap();
        bitmap.set_pixel(3, 2, ColorRef::WHITE);
        bitmap.set_pixel(4, 2, ColorRef::WHITE);

        assert_eq!(bitmap.pixel(3, 2), Some(ColorRef::WHITE));
        assert_eq!(bitmap.pixel(0, 0), Some(ColorRef::BLACK));
        assert_eq!(bitmap.pixel(4, 2), None);
        assert_eq!(bitmap.pixel(-1, 0), None);
    }

    #[test]
    fn test_negative_size_rejected() {
        assert_eq!(
            Bitmap::new(-1, 4, ColorRef::BLACK).err(),
            Some(GdiError::InvalidParameter)
        );
    }

    #[test]
    fn test_memory_dc_accessors() {
        let dc = MemoryDc::new(Bitmap::new(8, 2, ColorRef::rgb(1, 2, 3)).unwrap());
        assert_eq!(dc.selected_bitmap_size(), (8, 2));
        assert_eq!(dc.get_pixel(7, 1), ColorRef::rgb(1, 2, 3));
        assert_eq!(dc.get_pixel(8, 1), ColorRef(0xffff_ffff));
    }
}
