//! Damage rectangles
//!
//! After every drawing primitive the driver tells the host which part of
//! the surface changed so it can be presented.

use win32k_gdi::Rect;

/// A rectangular region of the surface that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DamageRect {
    /// Create a new damage rectangle
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from a normalized rectangle. Inverted input yields an empty rect.
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            x: rect.left,
            y: rect.top,
            width: rect.width().max(0) as u32,
            height: rect.height().max(0) as u32,
        }
    }

    /// Get the right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Get the bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if this rectangle lies within a `width` x `height` surface
    pub fn within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() <= width as i32
            && self.bottom() <= height as i32
    }
}
