//! win32k GDI Object Model
//!
//! Kernel-side GDI objects for the NT personality layer. Everything that
//! user mode addresses through an `HGDIOBJ` lives here.
//!
//! # Architecture
//!
//! - `rect`: axis-aligned rectangles in Win32 `RECT` convention
//! - `color`: `COLORREF` values
//! - `region`: banded rectangle regions (`HRGN`)
//! - `handle`: the typed GDI handle table
//! - `brush`, `bitmap`: the narrow accessor contract drawing code needs
//! - `ntgdi`: NtGdi* region entry points operating on the handle table

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod bitmap;
pub mod brush;
pub mod color;
pub mod config;
pub mod handle;
pub mod ntgdi;
pub mod rect;
pub mod region;

use core::fmt;

pub use bitmap::{Bitmap, DeviceContext, MemoryDc};
pub use brush::{BrushColor, SolidBrush};
pub use color::ColorRef;
pub use handle::{GdiHandle, GdiHandleTable, GdiObject, GdiObjectType};
pub use rect::Rect;
pub use region::{CombineMode, Region, RegionType};

/// GDI error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdiError {
    /// A buffer or object could not be allocated.
    OutOfMemory,
    /// The handle table has no free slots.
    OutOfHandles,
    /// Handle does not name a live object.
    InvalidHandle,
    /// Handle names an object of another type.
    WrongObjectType,
    /// Invalid parameters.
    InvalidParameter,
    /// Operation is reserved and not implemented.
    Unsupported,
}

impl fmt::Display for GdiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "Out of memory"),
            Self::OutOfHandles => write!(f, "GDI handle table full"),
            Self::InvalidHandle => write!(f, "Invalid GDI handle"),
            Self::WrongObjectType => write!(f, "GDI handle has wrong object type"),
            Self::InvalidParameter => write!(f, "Invalid parameter"),
            Self::Unsupported => write!(f, "Operation not supported"),
        }
    }
}

/// Result alias for GDI operations.
pub type GdiResult<T> = Result<T, GdiError>;
