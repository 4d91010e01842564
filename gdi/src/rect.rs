//! Rectangles
//!
//! Win32 `RECT` convention: `right` and `bottom` are exclusive.

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The zero rectangle.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    /// Create a rectangle from raw corners.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create from origin and size
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Swap corners so that `left <= right` and `top <= bottom`.
    pub fn normalized(&self) -> Rect {
        Rect {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Translate by `(dx, dy)`. Coordinates wrap on overflow.
    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left = self.left.wrapping_add(dx);
        self.right = self.right.wrapping_add(dx);
        self.top = self.top.wrapping_add(dy);
        self.bottom = self.bottom.wrapping_add(dy);
    }

    /// Translated copy, or `None` if any coordinate would overflow.
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Rect> {
        Some(Rect {
            left: self.left.checked_add(dx)?,
            top: self.top.checked_add(dy)?,
            right: self.right.checked_add(dx)?,
            bottom: self.bottom.checked_add(dy)?,
        })
    }

    /// Check if rectangle contains a point
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Check if this rectangle overlaps another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Bounding rectangle of both. An empty operand is ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}
