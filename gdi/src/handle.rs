//! GDI Handle Table
//!
//! Maps opaque `HGDIOBJ` values to kernel-side objects. The table is an
//! arena of typed slots; a handle carries its slot index, the object type
//! and a per-slot uniqueness count:
//!
//! ```text
//!  31      24 23      16 15               0
//! +----------+----------+------------------+
//! |  unique  |   type   |      index       |
//! +----------+----------+------------------+
//! ```
//!
//! Every lookup checks all three, so a stale handle to a recycled slot or a
//! handle to an object of another kind never resolves.

use alloc::vec::Vec;

use crate::bitmap::Bitmap;
use crate::brush::SolidBrush;
use crate::config::MAX_GDI_HANDLES;
use crate::region::Region;
use crate::{GdiError, GdiResult};

/// An opaque GDI handle. Zero is the null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GdiHandle(pub u32);

impl GdiHandle {
    /// The null handle.
    pub const NULL: GdiHandle = GdiHandle(0);

    fn compose(index: usize, kind: GdiObjectType, uniqueness: u8) -> Self {
        GdiHandle((index as u32 & 0xffff) | ((kind as u32) << 16) | ((uniqueness as u32) << 24))
    }

    #[inline]
    pub fn index(&self) -> usize {
        (self.0 & 0xffff) as usize
    }

    #[inline]
    pub fn type_bits(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub fn uniqueness(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// GDI object type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GdiObjectType {
    Region = 0x04,
    Bitmap = 0x05,
    Brush = 0x10,
}

/// A kernel-side GDI object.
#[derive(Debug)]
pub enum GdiObject {
    Region(Region),
    Bitmap(Bitmap),
    Brush(SolidBrush),
}

impl GdiObject {
    pub fn object_type(&self) -> GdiObjectType {
        match self {
            GdiObject::Region(_) => GdiObjectType::Region,
            GdiObject::Bitmap(_) => GdiObjectType::Bitmap,
            GdiObject::Brush(_) => GdiObjectType::Brush,
        }
    }
}

/// A live handle table entry.
#[derive(Debug)]
pub struct GdiEntry {
    /// Owning process, or `OWNER_NONE`.
    pub owner: u32,
    /// The object itself.
    pub object: GdiObject,
}

#[derive(Debug)]
struct Slot {
    uniqueness: u8,
    entry: Option<GdiEntry>,
}

/// The GDI handle table.
pub struct GdiHandleTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
    capacity: usize,
}

impl GdiHandleTable {
    /// Create a table with the default number of slots.
    pub fn new() -> Self {
        Self::with_capacity(MAX_GDI_HANDLES)
    }

    /// Create a table limited to `capacity` slots (slot 0 is reserved).
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        // slot 0 backs the null handle and is never handed out
        slots.push(Slot {
            uniqueness: 0,
            entry: None,
        });
        Self {
            slots,
            free: Vec::new(),
            live: 0,
            capacity: capacity.clamp(1, MAX_GDI_HANDLES),
        }
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Register an object and return its handle.
    pub fn allocate(&mut self, object: GdiObject, owner: u32) -> GdiResult<GdiHandle> {
        let kind = object.object_type();
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                if self.slots.len() >= self.capacity {
                    log::warn!("GDI handle table full ({} slots)", self.capacity);
                    return Err(GdiError::OutOfHandles);
                }
                self.slots
                    .try_reserve(1)
                    .map_err(|_| GdiError::OutOfMemory)?;
                self.slots.push(Slot {
                    uniqueness: 0,
                    entry: None,
                });
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        slot.entry = Some(GdiEntry { owner, object });
        self.live += 1;

        let handle = GdiHandle::compose(index, kind, slot.uniqueness);
        log::trace!("allocated {:?} handle {:#010x}", kind, handle.0);
        Ok(handle)
    }

    /// Look up the entry behind a handle.
    pub fn resolve(&self, handle: GdiHandle) -> GdiResult<&GdiEntry> {
        let index = self.checked_index(handle)?;
        self.slots[index].entry.as_ref().ok_or(GdiError::InvalidHandle)
    }

    /// Look up the entry behind a handle for mutation.
    pub fn resolve_mut(&mut self, handle: GdiHandle) -> GdiResult<&mut GdiEntry> {
        let index = self.checked_index(handle)?;
        self.slots[index].entry.as_mut().ok_or(GdiError::InvalidHandle)
    }

    /// Resolve a region handle.
    pub fn region(&self, handle: GdiHandle) -> GdiResult<&Region> {
        match &self.resolve(handle)?.object {
            GdiObject::Region(region) => Ok(region),
            _ => Err(GdiError::WrongObjectType),
        }
    }

    /// Resolve a region handle for mutation.
    pub fn region_mut(&mut self, handle: GdiHandle) -> GdiResult<&mut Region> {
        match &mut self.resolve_mut(handle)?.object {
            GdiObject::Region(region) => Ok(region),
            _ => Err(GdiError::WrongObjectType),
        }
    }

    /// Resolve a brush handle.
    pub fn brush(&self, handle: GdiHandle) -> GdiResult<&SolidBrush> {
        match &self.resolve(handle)?.object {
            GdiObject::Brush(brush) => Ok(brush),
            _ => Err(GdiError::WrongObjectType),
        }
    }

    /// Resolve a bitmap handle.
    pub fn bitmap(&self, handle: GdiHandle) -> GdiResult<&Bitmap> {
        match &self.resolve(handle)?.object {
            GdiObject::Bitmap(bitmap) => Ok(bitmap),
            _ => Err(GdiError::WrongObjectType),
        }
    }

    /// Free a handle and return the object it named.
    pub fn release(&mut self, handle: GdiHandle) -> GdiResult<GdiObject> {
        let index = self.checked_index(handle)?;
        let slot = &mut self.slots[index];
        let entry = slot.entry.take().ok_or(GdiError::InvalidHandle)?;

        slot.uniqueness = slot.uniqueness.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;
        Ok(entry.object)
    }

    fn checked_index(&self, handle: GdiHandle) -> GdiResult<usize> {
        let index = handle.index();
        if index == 0 {
            return Err(GdiError::InvalidHandle);
        }
        let slot = self.slots.get(index).ok_or(GdiError::InvalidHandle)?;
        let entry = slot.entry.as_ref().ok_or(GdiError::InvalidHandle)?;
        if slot.uniqueness != handle.uniqueness()
            || entry.object.object_type() as u8 != handle.type_bits()
        {
            return Err(GdiError::InvalidHandle);
        }
        Ok(index)
    }
}

impl Default for GdiHandleTable {
    fn default() -> Self {
        Self::new()
    }
}
