//! Brushes
//!
//! Drawing code only needs a brush's fill color.

use crate::color::ColorRef;

/// Anything that supplies a fill color.
pub trait BrushColor {
    fn color(&self) -> ColorRef;
}

/// A solid color brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidBrush {
    color: ColorRef,
}

impl SolidBrush {
    pub const fn new(color: ColorRef) -> Self {
        Self { color }
    }
}

impl BrushColor for SolidBrush {
    fn color(&self) -> ColorRef {
        self.color
    }
}
