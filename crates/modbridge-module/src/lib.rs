//! Frame-pull playback for tracker module decoders.
//!
//! The wrapped decoder keeps its own clock and renders whatever number of
//! frames is asked for, so [`ModuleSession`] stays a thin layer: it owns the
//! f32 output block, remembers the [`RepeatCount`] across loads and caches
//! the metadata the host displays.

#![warn(missing_docs)]

pub mod error;
pub mod module;
mod repeat;
mod session;

pub use crate::error::{ModuleError, Result};
pub use crate::module::{
    METADATA_ARTIST, METADATA_TITLE, METADATA_TYPE, ModuleLoader, TrackerModule,
};
pub use crate::repeat::RepeatCount;
pub use crate::session::ModuleSession;
