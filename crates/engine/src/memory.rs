//! Raw memory primitives
//!
//! Every access the kit makes into engine memory goes through this module.
//! Each function performs exactly one hop: read a value at an offset,
//! dereference a pointer field (yielding `None` on null), or resolve a
//! RIP-relative displacement. Multi-hop chains are built by the callers out
//! of these primitives so that every hop is null-checked.

use std::ffi::c_void;
use std::ops::Range;
use std::ptr::NonNull;

/// Read a `T` at `base + offset`
///
/// Unaligned reads are allowed; engine structures are packed by their own rules.
///
/// # Safety
/// `base + offset .. base + offset + size_of::<T>()` must be readable and hold a valid `T`.
#[inline]
pub unsafe fn read<T: Copy>(base: NonNull<c_void>, offset: usize) -> T {
    (base.as_ptr().byte_add(offset) as *const T).read_unaligned()
}

/// Write a `T` at `base + offset`
///
/// # Safety
/// `base + offset .. base + offset + size_of::<T>()` must be writable.
#[inline]
pub unsafe fn write<T: Copy>(base: NonNull<c_void>, offset: usize, value: T) {
    (base.as_ptr().byte_add(offset) as *mut T).write_unaligned(value)
}

/// Read a pointer field at `base + offset`, returning `None` if it is null
///
/// # Safety
/// `base + offset` must be readable for one machine word.
#[inline]
pub unsafe fn read_ptr<T>(base: NonNull<c_void>, offset: usize) -> Option<NonNull<T>> {
    NonNull::new(read::<*mut T>(base, offset))
}

/// Read a field given a possibly-null object pointer and a schema offset
///
/// Returns `None` for a null object or a negative offset, which is how an
/// unresolved schema field is represented.
///
/// # Safety
/// If `base` is non-null and `offset` non-negative, the field must be readable as `T`.
#[inline]
pub unsafe fn read_field<T: Copy>(base: *mut c_void, offset: i32) -> Option<T> {
    let base = NonNull::new(base)?;
    let offset = usize::try_from(offset).ok()?;
    Some(read(base, offset))
}

/// Write a field given a possibly-null object pointer and a schema offset
///
/// Returns `false` when nothing was written.
///
/// # Safety
/// If `base` is non-null and `offset` non-negative, the field must be writable as `T`.
#[inline]
pub unsafe fn write_field<T: Copy>(base: *mut c_void, offset: i32, value: T) -> bool {
    let (Some(base), Ok(offset)) = (NonNull::new(base), usize::try_from(offset)) else {
        return false;
    };
    write(base, offset, value);
    true
}

/// Readable runs within `address .. address + len`
///
/// Adjacent readable regions are merged into one run, so a range spanning
/// two mappings with different protections stays contiguous. Unreadable
/// holes split the result. Runs are clamped to the requested range.
pub fn readable_ranges(address: usize, len: usize) -> Vec<Range<usize>> {
    let mut runs: Vec<Range<usize>> = Vec::new();
    if address == 0 || len == 0 {
        return runs;
    }
    let Some(end) = address.checked_add(len) else {
        return runs;
    };

    let Ok(regions) = region::query_range(address as *const u8, len) else {
        return runs;
    };

    for region in regions {
        let Ok(region) = region else {
            break;
        };
        if !region.is_readable() {
            continue;
        }

        let range = region.as_range();
        let start = range.start.max(address);
        let stop = range.end.min(end);
        if start >= stop {
            continue;
        }

        match runs.last_mut() {
            Some(last) if last.end == start => last.end = stop,
            _ => runs.push(start..stop),
        }
    }

    runs
}

/// Check that `len` bytes starting at `address` are mapped and readable
///
/// The bytes may span several mappings.
pub fn is_readable(address: usize, len: usize) -> bool {
    let Some(end) = address.checked_add(len) else {
        return false;
    };

    match readable_ranges(address, len).as_slice() {
        [run] => run.start == address && run.end == end,
        _ => false,
    }
}

/// Resolve a RIP-relative displacement
///
/// Reads a signed 32-bit little-endian value at `address + disp_offset` and
/// returns `address + disp_size + value`. Returns `None` if `address` is zero,
/// the displacement is not readable, or the result is zero.
pub fn resolve_relative(address: usize, disp_offset: usize, disp_size: usize) -> Option<usize> {
    if address == 0 {
        return None;
    }

    let disp_address = address.checked_add(disp_offset)?;
    if !is_readable(disp_address, std::mem::size_of::<i32>()) {
        tracing::warn!(
            "Relative displacement at {:#x} is not readable",
            disp_address
        );
        return None;
    }

    // SAFETY: the four bytes at disp_address were just checked to be mapped and readable.
    let relative = unsafe { (disp_address as *const i32).read_unaligned() };

    let target = address
        .wrapping_add(disp_size)
        .wrapping_add_signed(relative as isize);

    (target != 0).then_some(target)
}
