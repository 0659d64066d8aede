//! Tick-accumulator playback for chip-synthesis players.
//!
//! This crate adapts players that advance a song in discrete ticks (AdLib
//! style OPL formats) to hosts that pull fixed-size PCM blocks:
//! - [`SynthChip`] and [`TickPlayer`] describe the opaque emulator and player
//! - [`PlayerRegistry`] detects the format (extension match, then every player)
//! - [`PlaybackClock`] schedules ticks against the output sample rate
//! - [`ChipSession`] owns it all, including the virtual file store that serves
//!   companion files such as instrument banks

#![warn(missing_docs)]

pub mod chip;
pub mod clock;
pub mod error;
pub mod factory;
pub mod player;
mod session;

pub use crate::chip::{SilentChip, SynthChip};
pub use crate::clock::{BlockFill, PlaybackClock, TickSource, effective_refresh_hz};
pub use crate::error::{ChipError, Result};
pub use crate::factory::{LoadedPlayer, PlayerConstructor, PlayerDescriptor, PlayerRegistry};
pub use crate::player::{MAX_SONG_LENGTH_MS, TickPlayer};
pub use crate::session::{ChipBackend, ChipSession};
