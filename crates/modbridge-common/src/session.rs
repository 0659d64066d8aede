//! Transport contract shared by every backend.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --init--> Ready --load ok--> Loaded --load ok--> Loaded
//!       ^                   ^                  |
//!       |                   +---load failed----+
//!       +------------------teardown--------------------------------+
//! ```
//!
//! A session value only exists between `init` and `teardown`, so
//! `Uninitialized` is represented by [`SessionSlot`] holding nothing.

use crate::buffer::{AudioBuffer, StereoSample};
use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::metadata::TrackMetadata;
use crate::status::RenderStatus;

/// Lifecycle stage of a facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// `init` has not been called or `teardown` ran.
    #[default]
    Uninitialized,
    /// Engine created, no track.
    Ready,
    /// A track is loaded.
    Loaded,
}

/// Transport operations every playback session provides.
///
/// Position and duration are exposed in seconds here; backends keep their
/// native unit (milliseconds for tick-driven players) in their own API.
pub trait PlaybackSession {
    /// Sample format of the audio buffer.
    type Sample: StereoSample;

    /// Features supported by this backend.
    fn capabilities(&self) -> Capabilities;

    /// `Ready` or `Loaded`.
    fn state(&self) -> SessionState;

    /// Output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Load a track, replacing the current one.
    ///
    /// Invalid arguments leave the session untouched. Any other failure
    /// leaves it with no track.
    fn load(&mut self, name: &str, data: &[u8]) -> Result<()>;

    /// Drop the current track, keeping the engine.
    fn unload(&mut self);

    /// Render the next block into the audio buffer.
    ///
    /// Returns [`RenderStatus::Ended`] once the song finishes or when no
    /// track is loaded.
    fn compute(&mut self) -> RenderStatus;

    /// Buffer filled by the last [`compute`](Self::compute).
    fn audio_buffer(&self) -> &AudioBuffer<Self::Sample>;

    /// Metadata of the loaded track (empty when none).
    fn metadata(&self) -> &TrackMetadata;

    /// Elapsed playback time.
    fn position_seconds(&self) -> f64;

    /// Length of the current subsong; `0.0` when unknown.
    fn duration_seconds(&self) -> f64;

    /// Move the playback position.
    fn seek_seconds(&mut self, seconds: f64);

    /// Restart the current subsong.
    fn rewind(&mut self);

    /// Number of subsongs in the loaded track (0 when none).
    fn subsong_count(&self) -> usize;

    /// Switch to subsong `index` (0-based).
    fn set_subsong(&mut self, index: usize) -> Result<()>;

    /// Whether a track is loaded.
    fn is_loaded(&self) -> bool {
        self.state() == SessionState::Loaded
    }
}

/// Holder implementing the `init`/`teardown` half of the lifecycle.
#[derive(Debug)]
pub struct SessionSlot<S> {
    session: Option<S>,
}

impl<S> Default for SessionSlot<S> {
    fn default() -> Self {
        Self { session: None }
    }
}

impl<S: PlaybackSession> SessionSlot<S> {
    /// Create an empty (uninitialized) slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down any current session, then build a fresh one.
    ///
    /// When `create` fails the slot stays empty.
    pub fn init_with<F>(&mut self, create: F) -> Result<&mut S>
    where
        F: FnOnce() -> Result<S>,
    {
        self.teardown();
        let session = create()?;
        Ok(self.session.insert(session))
    }

    /// Release the current session. Returns whether one existed.
    pub fn teardown(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Shared access to the live session.
    pub fn get(&self) -> Option<&S> {
        self.session.as_ref()
    }

    /// Mutable access to the live session.
    pub fn get_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    /// Lifecycle stage, including `Uninitialized`.
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Uninitialized, |session| session.state())
    }

    /// Render a block, or report `Ended` when uninitialized.
    pub fn compute(&mut self) -> RenderStatus {
        self.session
            .as_mut()
            .map_or(RenderStatus::Ended, |session| session.compute())
    }
}
