//! Checked conversions for pointers handed over by a host.
//!
//! Each helper returns `None` for null pointers, non-positive lengths and
//! text that is not UTF-8, so callers map all of them to a failure status.

use std::ffi::{CStr, c_char};

/// View `len` bytes at `ptr` as a slice.
///
/// # Safety
///
/// When `ptr` is non-null and `len > 0`, `ptr` must be valid for reads of
/// `len` bytes for the lifetime `'a`, and the memory must not be mutated
/// during that lifetime.
pub unsafe fn bytes_from_raw<'a>(ptr: *const u8, len: i32) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    let len = usize::try_from(len).ok().filter(|&len| len > 0)?;
    // SAFETY: non-null and in bounds per the caller contract.
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Read a NUL-terminated UTF-8 string.
///
/// # Safety
///
/// When `ptr` is non-null it must point to a NUL-terminated string valid for
/// the lifetime `'a`.
pub unsafe fn str_from_raw<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}
