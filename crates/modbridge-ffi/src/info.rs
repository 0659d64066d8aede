//! Reused NUL-terminated text buffer for strings returned to hosts.

use std::ffi::CStr;

use modbridge_common::truncate_to;

/// Fixed-capacity C string, rewritten in place on every query.
#[derive(Debug, Clone)]
pub struct InfoBuffer {
    capacity: usize,
    bytes: Vec<u8>,
}

impl InfoBuffer {
    /// Buffer holding at most `capacity` text bytes plus the terminator.
    pub fn new(capacity: usize) -> Self {
        let mut bytes = Vec::with_capacity(capacity + 1);
        bytes.push(0);
        Self { capacity, bytes }
    }

    /// Text capacity in bytes, excluding the terminator.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace the contents with `text`, cut at the first NUL and at the
    /// capacity.
    pub fn write(&mut self, text: &str) -> &CStr {
        let text = text.split('\0').next().unwrap_or_default();
        let text = truncate_to(text, self.capacity);
        self.bytes.clear();
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(0);
        self.as_c_str()
    }

    /// Current contents.
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.bytes).unwrap_or_default()
    }

    /// Reset to the empty string.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.bytes.push(0);
    }
}
