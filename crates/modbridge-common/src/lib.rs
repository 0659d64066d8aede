//! Shared contract for modbridge playback sessions.
//!
//! Both backends (the tick-driven chip session and the frame-pull module
//! session) implement [`PlaybackSession`]; they differ only in how a block is
//! rendered and in their [`StereoSample`] format.
//!
//! # Example
//!
//! ```ignore
//! use modbridge_common::{PlaybackSession, RenderStatus};
//!
//! fn drain<S: PlaybackSession>(session: &mut S) -> usize {
//!     let mut frames = 0;
//!     while session.compute() == RenderStatus::Playing {
//!         frames += session.audio_buffer().valid_frames();
//!         // ... hand session.audio_buffer().samples() to the device
//!     }
//!     frames
//! }
//! ```

#![warn(missing_docs)]

mod buffer;
mod capabilities;
mod config;
mod error;
mod metadata;
mod session;
mod status;

pub use buffer::{AudioBuffer, StereoSample};
pub use capabilities::Capabilities;
pub use config::{ConfigError, SessionConfig};
pub use error::{Result, SessionError};
pub use metadata::{
    AUTHOR_CAPACITY, DESCRIPTION_CAPACITY, KIND_CAPACITY, TITLE_CAPACITY, TrackMetadata,
    truncate_to,
};
pub use session::{PlaybackSession, SessionSlot, SessionState};
pub use status::{RenderStatus, STATUS_ERROR, STATUS_OK, status_code};

// ============================================================================
// Common Constants
// ============================================================================

/// Number of interleaved channels in every audio buffer.
pub const CHANNELS: usize = 2;

/// Default sample rate of the chip session (native OPL rate).
pub const DEFAULT_CHIP_SAMPLE_RATE: u32 = 49_716;

/// Default sample rate of the module session.
pub const DEFAULT_MODULE_SAMPLE_RATE: u32 = 48_000;

/// Frames rendered per chip `compute` call.
pub const CHIP_BUFFER_FRAMES: usize = 512;

/// Frames rendered per module `compute` call.
pub const MODULE_BUFFER_FRAMES: usize = 1024;

/// Tick rate substituted when a player reports a non-positive refresh rate.
pub const DEFAULT_REFRESH_HZ: f32 = 70.0;

/// Resolve a host-supplied sample rate, falling back for non-positive values.
#[inline]
pub fn sample_rate_or(requested: i32, fallback: u32) -> u32 {
    u32::try_from(requested)
        .ok()
        .filter(|&rate| rate > 0)
        .unwrap_or(fallback)
}
