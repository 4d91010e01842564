//! Region objects
//!
//! A region is an area stored as a "y-x-banded" list of rectangles, the
//! encoding used by the X11 sample server. Rectangles are sorted by `top`
//! and then by `left`. Every rectangle whose top edge lies in a band shares
//! that band's top and bottom, and no two rectangles in one band touch, so
//! each band covers as much horizontal area as possible. Bands are stacked
//! without vertical overlap.
//!
//! `extents` caches the bounding box of all rectangles. The banding
//! invariant is what a combine implementation will rely on; the geometry
//! produced here is always a single rectangle or nothing.

use alloc::vec::Vec;

use crate::config::DEFAULT_REGION_RECTS;
use crate::rect::Rect;
use crate::{GdiError, GdiResult};

/// Region classification, derived from the rectangle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RegionType {
    /// No rectangles.
    Empty = 0,
    /// Exactly one rectangle.
    Simple = 1,
    /// More than one rectangle.
    Complex = 2,
}

impl RegionType {
    /// Classify a rectangle count.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => RegionType::Empty,
            1 => RegionType::Simple,
            _ => RegionType::Complex,
        }
    }

    /// Numeric code returned across the syscall boundary.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Region combine modes (`RGN_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CombineMode {
    And = 1,
    Or = 2,
    Xor = 3,
    Diff = 4,
}

impl CombineMode {
    /// Decode a raw `RGN_*` value.
    pub fn from_raw(mode: i32) -> Option<Self> {
        match mode {
            1 => Some(CombineMode::And),
            2 => Some(CombineMode::Or),
            3 => Some(CombineMode::Xor),
            4 => Some(CombineMode::Diff),
            _ => None,
        }
    }
}

/// A banded rectangle region.
#[derive(Debug, Clone)]
pub struct Region {
    /// Rectangles in y-x banded order. `rects.len()` is the count.
    rects: Vec<Rect>,
    /// Bounding box of `rects`; zero when the region is empty.
    extents: Rect,
}

impl Region {
    /// Create an empty region with room for `n` rectangles.
    ///
    /// Fails with [`GdiError::OutOfMemory`] if the rectangle buffer cannot
    /// be reserved, in which case no object exists to register.
    pub fn new(n: usize) -> GdiResult<Self> {
        let mut rects = Vec::new();
        rects
            .try_reserve_exact(n.max(1))
            .map_err(|_| GdiError::OutOfMemory)?;
        Ok(Self {
            rects,
            extents: Rect::EMPTY,
        })
    }

    /// Create an empty region with the default capacity.
    pub fn with_default_capacity() -> GdiResult<Self> {
        Self::new(DEFAULT_REGION_RECTS)
    }

    /// Number of rectangle slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.rects.capacity()
    }

    /// Number of stored rectangles.
    pub fn count(&self) -> usize {
        self.rects.len()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn extents(&self) -> Rect {
        self.extents
    }

    /// Derived classification.
    pub fn region_type(&self) -> RegionType {
        RegionType::from_count(self.rects.len())
    }

    /// Make the region empty.
    pub fn set_empty(&mut self) {
        self.rects.clear();
        self.extents = Rect::EMPTY;
    }

    /// Replace the region with the rectangle spanned by the given corners.
    ///
    /// Corners are normalized first. A rectangle with zero width or height
    /// leaves the region empty.
    pub fn set_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        let rect = Rect::new(left, top, right, bottom).normalized();

        if rect.left != rect.right && rect.top != rect.bottom {
            self.rects.clear();
            self.rects.push(rect);
            self.extents = rect;
        } else {
            self.set_empty();
        }
        debug_assert!(self.is_banded());
    }

    /// Bounding box and classification.
    pub fn bounding_box(&self) -> (Rect, RegionType) {
        let e = self.extents;
        log::trace!("region box ({},{}-{},{})", e.left, e.top, e.right, e.bottom);
        (e, self.region_type())
    }

    /// Region equality.
    ///
    /// Empty regions are equal whatever their extents hold. Otherwise the
    /// extents and every rectangle, in storage order, must match.
    pub fn equals(&self, other: &Region) -> bool {
        if self.rects.len() != other.rects.len() {
            return false;
        }
        if self.rects.is_empty() {
            return true;
        }
        if self.extents != other.extents {
            return false;
        }
        self.rects.iter().zip(other.rects.iter()).all(|(a, b)| a == b)
    }

    /// Move every rectangle and the extents by `(dx, dy)`.
    ///
    /// Nothing is clamped. If any coordinate would leave the `i32` range
    /// the region is left unchanged and [`GdiError::InvalidParameter`] is
    /// returned. An empty region stays empty with zero extents.
    pub fn offset(&mut self, dx: i32, dy: i32) -> GdiResult<RegionType> {
        if self.rects.is_empty() {
            return Ok(RegionType::Empty);
        }
        let Some(extents) = self.extents.checked_offset(dx, dy) else {
            log::warn!("region offset ({}, {}) overflows", dx, dy);
            return Err(GdiError::InvalidParameter);
        };

        // every rect lies inside the extents, so none of these overflow
        for rect in self.rects.iter_mut() {
            rect.offset(dx, dy);
        }
        self.extents = extents;
        Ok(self.region_type())
    }

    /// Check whether a point lies inside the region.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        if self.rects.is_empty() || !self.extents.contains_point(x, y) {
            return false;
        }
        for rect in &self.rects {
            // bands are sorted by top; nothing below can match
            if rect.top > y {
                break;
            }
            if rect.contains_point(x, y) {
                return true;
            }
        }
        false
    }

    /// Check whether any part of `rect` lies inside the region.
    pub fn rect_in_region(&self, rect: &Rect) -> bool {
        let rect = rect.normalized();
        if rect.is_empty() || self.rects.is_empty() || !self.extents.intersects(&rect) {
            return false;
        }
        for r in &self.rects {
            if r.top >= rect.bottom {
                break;
            }
            if r.intersects(&rect) {
                return true;
            }
        }
        false
    }

    /// Verify the banding and extents invariants.
    pub fn is_banded(&self) -> bool {
        if self.rects.is_empty() {
            return self.extents == Rect::EMPTY;
        }

        let mut bounds = Rect::EMPTY;
        let mut prev: Option<&Rect> = None;
        for rect in &self.rects {
            if rect.is_empty() {
                return false;
            }
            if let Some(p) = prev {
                let same_band = rect.top == p.top && rect.bottom == p.bottom;
                if same_band {
                    // strictly left to right, never touching
                    if rect.left <= p.right {
                        return false;
                    }
                } else if rect.top < p.bottom {
                    return false;
                }
            }
            bounds = bounds.union(rect);
            prev = Some(rect);
        }
        bounds == self.extents
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Region {}
