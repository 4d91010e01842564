//! 16 bpp (RGB565) pixel routines

use super::PixelFormatDriver;
use crate::surface::{PixelFormat, Surface};

/// RGB565 surface access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bpp16;

impl PixelFormatDriver for Bpp16 {
    fn format(&self) -> PixelFormat {
        PixelFormat::Rgb565
    }

    fn put_pixel(&self, surface: &mut Surface, x: i32, y: i32, pixel: u32) {
        surface.write_u16(x, y, pixel as u16);
    }

    fn fill_span(&self, surface: &mut Surface, x: i32, y: i32, len: i32, pixel: u32) {
        let width = surface.width() as i32;
        let start = x.max(0);
        let end = x.saturating_add(len).min(width);
        if start >= end {
            return;
        }
        let Some(row) = surface.row_mut(y) else {
            return;
        };
        let bytes = (pixel as u16).to_le_bytes();
        for px in row[start as usize * 2..end as usize * 2].chunks_exact_mut(2) {
            px.copy_from_slice(&bytes);
        }
    }
}
