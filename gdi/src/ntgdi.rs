//! NtGdi region entry points.
//!
//! Region system calls operating on a GDI handle table. Parameter
//! marshalling (copying the box out to user memory) is done by the syscall
//! layer; these functions return plain values.

use crate::config::DEFAULT_REGION_RECTS;
use crate::handle::{GdiHandle, GdiHandleTable, GdiObject};
use crate::rect::Rect;
use crate::region::{CombineMode, Region, RegionType};
use crate::{GdiError, GdiResult};

/// NtGdiCreateRectRgn
pub fn create_rect_rgn(
    table: &mut GdiHandleTable,
    owner: u32,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
) -> GdiResult<GdiHandle> {
    let mut region = Region::new(DEFAULT_REGION_RECTS)?;
    region.set_rect(left, top, right, bottom);
    table.allocate(GdiObject::Region(region), owner)
}

/// NtGdiCreateEllipticRgn
///
/// Reserved: no handle is created. This fails with `Unsupported` since
/// there is no object a caller could go on to use.
pub fn create_elliptic_rgn(
    _table: &mut GdiHandleTable,
    _owner: u32,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
) -> GdiResult<GdiHandle> {
    log::warn!(
        "elliptic region ({},{}-{},{}) not implemented",
        left,
        top,
        right,
        bottom
    );
    Err(GdiError::Unsupported)
}

/// NtGdiGetRgnBox
pub fn get_rgn_box(table: &GdiHandleTable, region: GdiHandle) -> GdiResult<(Rect, RegionType)> {
    let rgn = table.region(region)?;
    log::trace!("get_rgn_box {:#010x}", region.0);
    Ok(rgn.bounding_box())
}

/// NtGdiCombineRgn
///
/// Reserved: no region is read or written and the result is always
/// `RegionType::Empty` (code 0), whatever the handles or mode.
pub fn combine_rgn(
    _table: &mut GdiHandleTable,
    dest: GdiHandle,
    src1: GdiHandle,
    src2: GdiHandle,
    mode: i32,
) -> GdiResult<RegionType> {
    log::warn!(
        "combine {:#010x} = {:#010x} {:?} {:#010x} not implemented",
        dest.0,
        src1.0,
        CombineMode::from_raw(mode),
        src2.0
    );
    Ok(RegionType::Empty)
}

/// NtGdiEqualRgn
pub fn equal_rgn(table: &GdiHandleTable, rgn1: GdiHandle, rgn2: GdiHandle) -> GdiResult<bool> {
    let a = table.region(rgn1)?;
    let b = table.region(rgn2)?;
    Ok(a.equals(b))
}

/// NtGdiOffsetRgn
pub fn offset_rgn(
    table: &mut GdiHandleTable,
    region: GdiHandle,
    x: i32,
    y: i32,
) -> GdiResult<RegionType> {
    table.region_mut(region)?.offset(x, y)
}

/// NtGdiSetRectRgn
pub fn set_rect_rgn(
    table: &mut GdiHandleTable,
    region: GdiHandle,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
) -> GdiResult<()> {
    table.region_mut(region)?.set_rect(left, top, right, bottom);
    Ok(())
}

/// NtGdiPtInRegion
pub fn pt_in_region(table: &GdiHandleTable, region: GdiHandle, x: i32, y: i32) -> GdiResult<bool> {
    Ok(table.region(region)?.contains_point(x, y))
}

/// NtGdiRectInRegion
pub fn rect_in_region(table: &GdiHandleTable, region: GdiHandle, rect: &Rect) -> GdiResult<bool> {
    Ok(table.region(region)?.rect_in_region(rect))
}

/// NtGdiDeleteObjectApp
pub fn delete_object(table: &mut GdiHandleTable, object: GdiHandle) -> GdiResult<()> {
    let freed = table.release(object)?;
    log::trace!("deleted {:?} {:#010x}", freed.object_type(), object.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::SolidBrush;
    use crate::color::ColorRef;
    use crate::config::OWNER_NONE;

    #[test]
    fn test_region_lifecycle_scenario() {
        let mut table = GdiHandleTable::new();
        let rgn = create_rect_rgn(&mut table, OWNER_NONE, 10, 10, 20, 20).unwrap();

        assert_eq!(
            get_rgn_box(&table, rgn).unwrap(),
            (Rect::new(10, 10, 20, 20), RegionType::Simple)
        );

        assert_eq!(offset_rgn(&mut table, rgn, 5, -5).unwrap(), RegionType::Simple);
        assert_eq!(
            get_rgn_box(&table, rgn).unwrap(),
            (Rect::new(15, 5, 25, 15), RegionType::Simple)
        );

        set_rect_rgn(&mut table, rgn, 0, 0, 0, 5).unwrap();
        let (rect, kind) = get_rgn_box(&table, rgn).unwrap();
        assert_eq!(rect, Rect::EMPTY);
        assert_eq!(kind, RegionType::Empty);
        assert_eq!(kind.code(), 0);

        delete_object(&mut table, rgn).unwrap();
        assert_eq!(get_rgn_box(&table, rgn).err(), Some(GdiError::InvalidHandle));
    }

    #[test]
    fn test_create_degenerate_region() {
        let mut table = GdiHandleTable::new();
        let rgn = create_rect_rgn(&mut table, OWNER_NONE, 4, 4, 9, 4).unwrap();
        assert_eq!(
            get_rgn_box(&table, rgn).unwrap(),
            (Rect::EMPTY, RegionType::Empty)
        );
    }

    #[test]
    fn test_equal_rgn() {
        let mut table = GdiHandleTable::new();
        let a = create_rect_rgn(&mut table, OWNER_NONE, 0, 0, 8, 8).unwrap();
        let b = create_rect_rgn(&mut table, OWNER_NONE, 8, 8, 0, 0).unwrap();
        let empty1 = create_rect_rgn(&mut table, OWNER_NONE, 3, 3, 3, 3).unwrap();
        let empty2 = create_rect_rgn(&mut table, OWNER_NONE, 0, 0, 0, 0).unwrap();

        assert_eq!(equal_rgn(&table, a, b), Ok(true));
        assert_eq!(equal_rgn(&table, empty1, empty2), Ok(true));
        assert_eq!(equal_rgn(&table, a, empty1), Ok(false));

        offset_rgn(&mut table, b, 0, 1).unwrap();
        assert_eq!(equal_rgn(&table, a, b), Ok(false));
        assert_eq!(equal_rgn(&table, a, GdiHandle(0x1234)).err(), Some(GdiError::InvalidHandle));
    }

    #[test]
    fn test_offset_rgn_overflow_is_rejected() {
        let mut table = GdiHandleTable::new();
        let rgn = create_rect_rgn(&mut table, OWNER_NONE, 0, 0, 10, 10).unwrap();

        assert_eq!(
            offset_rgn(&mut table, rgn, i32::MAX, 0).err(),
            Some(GdiError::InvalidParameter)
        );
        assert_eq!(
            offset_rgn(&mut table, rgn, 0, i32::MIN + 1).unwrap(),
            RegionType::Simple
        );
        assert_eq!(
            offset_rgn(&mut table, rgn, -1, -2).err(),
            Some(GdiError::InvalidParameter)
        );
        assert_eq!(
            get_rgn_box(&table, rgn).unwrap(),
            (Rect::new(0, i32::MIN + 1, 10, i32::MIN + 11), RegionType::Simple)
        );
    }

    #[test]
    fn test_non_region_handles_fail() {
        let mut table = GdiHandleTable::new();
        let brush = table
            .allocate(GdiObject::Brush(SolidBrush::new(ColorRef::BLACK)), OWNER_NONE)
            .unwrap();

        assert_eq!(get_rgn_box(&table, brush).err(), Some(GdiError::WrongObjectType));
        assert_eq!(offset_rgn(&mut table, brush, 1, 1).err(), Some(GdiError::WrongObjectType));
        assert_eq!(
            set_rect_rgn(&mut table, brush, 0, 0, 1, 1).err(),
            Some(GdiError::WrongObjectType)
        );
        assert_eq!(
            set_rect_rgn(&mut table, GdiHandle::NULL, 0, 0, 1, 1).err(),
            Some(GdiError::InvalidHandle)
        );
    }

    #[test]
    fn test_reserved_operations_change_nothing() {
        let mut table = GdiHandleTable::new();
        let dest = create_rect_rgn(&mut table, OWNER_NONE, 0, 0, 4, 4).unwrap();
        let src = create_rect_rgn(&mut table, OWNER_NONE, 2, 2, 6, 6).unwrap();

        assert_eq!(
            combine_rgn(&mut table, dest, dest, src, CombineMode::Or as i32),
            Ok(RegionType::Empty)
        );
        assert_eq!(
            combine_rgn(&mut table, GdiHandle::NULL, src, GdiHandle(0x1234), 99),
            Ok(RegionType::Empty)
        );
        assert_eq!(
            get_rgn_box(&table, dest).unwrap(),
            (Rect::new(0, 0, 4, 4), RegionType::Simple)
        );
        assert_eq!(
            get_rgn_box(&table, src).unwrap(),
            (Rect::new(2, 2, 6, 6), RegionType::Simple)
        );

        let live = table.len();
        assert_eq!(
            create_elliptic_rgn(&mut table, OWNER_NONE, 0, 0, 10, 10).err(),
            Some(GdiError::Unsupported)
        );
        assert_eq!(table.len(), live);
    }

    #[test]
    fn test_point_queries() {
        let mut table = GdiHandleTable::new();
        let rgn = create_rect_rgn(&mut table, OWNER_NONE, 0, 0, 10, 10).unwrap();

        assert_eq!(pt_in_region(&table, rgn, 9, 9), Ok(true));
        assert_eq!(pt_in_region(&table, rgn, 10, 9), Ok(false));
        assert_eq!(rect_in_region(&table, rgn, &Rect::new(-5, -5, 1, 1)), Ok(true));
        assert_eq!(rect_in_region(&table, rgn, &Rect::new(10, 0, 20, 10)), Ok(false));
    }
}
