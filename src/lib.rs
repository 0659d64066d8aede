//! Pull-based playback sessions for music-module engines
//!
//! `modbridge` turns two unrelated decoding engines into one transport a host
//! drives block by block: a tick-driven chip-synthesis player (AdLib/OPL
//! style) and a frame-pull tracker module renderer. The host owns the audio
//! device and the event loop; a session only renders when asked.
//!
//! # Crate feature flags
//! - `chip` (default): tick-accumulator session (`chip`)
//! - `module` (default): frame-pull session (`module`)
//! - `ffi` (opt-in): flat status-code surfaces (`ffi`)
//!
//! # Quick start
//! ```ignore
//! use modbridge::{PlaybackSession, RenderStatus, SessionConfig};
//! use modbridge::chip::ChipSession;
//!
//! let mut session = ChipSession::new(&my_backend, SessionConfig::chip())?;
//! session.add_file("standard.bnk", &bank)?;
//! session.load_file("song.rol", &song)?;
//! while session.compute() == RenderStatus::Playing {
//!     device.queue(session.audio_buffer().samples());
//! }
//! ```

#![warn(missing_docs)]

pub use modbridge_common as common;
pub use modbridge_vfs as vfs;

#[cfg(feature = "chip")]
pub use modbridge_chip as chip;
#[cfg(feature = "ffi")]
pub use modbridge_ffi as ffi;
#[cfg(feature = "module")]
pub use modbridge_module as module;

// Public API exports
pub use modbridge_common::{
    AudioBuffer, Capabilities, PlaybackSession, RenderStatus, SessionConfig, SessionError,
    SessionSlot, SessionState, StereoSample, TrackMetadata,
};
pub use modbridge_vfs::{FileStore, MemoryProvider, OpenStream};

#[cfg(feature = "chip")]
pub use modbridge_chip::{ChipBackend, ChipSession, PlayerRegistry, SynthChip, TickPlayer};
#[cfg(feature = "ffi")]
pub use modbridge_ffi::{ChipSurface, ModuleSurface};
#[cfg(feature = "module")]
pub use modbridge_module::{ModuleLoader, ModuleSession, RepeatCount, TrackerModule};
