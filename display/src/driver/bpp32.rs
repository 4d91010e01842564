//! 32 bpp (XRGB8888) pixel routines

use super::PixelFormatDriver;
use crate::surface::{PixelFormat, Surface};

/// XRGB8888 surface access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bpp32;

impl PixelFormatDriver for Bpp32 {
    fn format(&self) -> PixelFormat {
        PixelFormat::Xrgb8888
    }

    fn put_pixel(&self, surface: &mut Surface, x: i32, y: i32, pixel: u32) {
        surface.write_u32(x, y, pixel);
    }

    fn fill_span(&self, surface: &mut Surface, x: i32, y: i32, len: i32, pixel: u32) {
        let width = surface.width() as i32;
        let start = x.max(0);
        let end = x.saturating_add(len).min(width);
        if start >= end {
            return;
        }
        if let Some(row) = surface.row_mut(y) {
            let bytes = pixel.to_le_bytes();
            for px in row[start as usize * 4..end as usize * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
    }
}
