//! Flat, status-code surfaces over modbridge sessions.
//!
//! [`ChipSurface`] and [`ModuleSurface`] mirror the call shape a host on the
//! other side of a C or WebAssembly boundary expects:
//! - `i32` status codes ([`STATUS_OK`] / [`STATUS_ERROR`]) instead of `Result`
//! - raw pointers into buffers that are allocated once at `init`
//! - NUL-terminated info strings held in a reused buffer
//!
//! Each surface is an explicit value; hosts that need a global instance wrap
//! one in their own binding layer.

#![warn(missing_docs)]

mod chip;
mod info;
mod module;
pub mod raw;

pub use crate::chip::ChipSurface;
pub use crate::info::InfoBuffer;
pub use crate::module::ModuleSurface;
pub use modbridge_common::{STATUS_ERROR, STATUS_OK};

/// Capacity of the chip `track_info` string in bytes.
pub const CHIP_INFO_CAPACITY: usize = 2047;

/// Capacity of the module `track_info` string in bytes.
pub const MODULE_INFO_CAPACITY: usize = 1023;

#[inline]
fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
