//! GDI configuration constants.
//!
//! Compile-time limits for the GDI object model.

/// Rectangle slots allocated for a freshly created region.
pub const DEFAULT_REGION_RECTS: usize = 2;

/// Number of slots in the GDI handle table (including the reserved null slot).
pub const MAX_GDI_HANDLES: usize = 0x4000;

/// Owner value for objects not bound to a process.
pub const OWNER_NONE: u32 = 0;
