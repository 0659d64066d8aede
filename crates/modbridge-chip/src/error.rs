//! Error handling for the chip session.

use modbridge_common::SessionError;
use modbridge_vfs::VfsError;
use thiserror::Error;

/// Convenient result alias for chip session operations.
pub type Result<T> = std::result::Result<T, ChipError>;

/// Errors raised by the chip session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChipError {
    /// The synthesis chip could not be created.
    #[error("synthesis chip unavailable: {reason}")]
    ChipUnavailable {
        /// Backend-provided explanation.
        reason: String,
    },
    /// The session configuration was rejected.
    #[error("invalid chip session configuration: {reason}")]
    InvalidConfig {
        /// Validation message.
        reason: String,
    },
    /// The file could not be registered.
    #[error(transparent)]
    File(#[from] VfsError),
    /// No registered player accepted the file.
    #[error("no player recognizes '{name}'")]
    UnrecognizedFormat {
        /// Primary file name.
        name: String,
    },
    /// Transport call without a loaded track.
    #[error("no track loaded")]
    NoTrack,
    /// Subsong index outside the loaded track.
    #[error("subsong {index} out of range (track has {available})")]
    InvalidSubsong {
        /// Requested 0-based index.
        index: usize,
        /// Number of subsongs in the track.
        available: usize,
    },
}

impl From<ChipError> for SessionError {
    fn from(err: ChipError) -> Self {
        match err {
            ChipError::ChipUnavailable { reason } => SessionError::EngineUnavailable { reason },
            ChipError::InvalidConfig { reason } => SessionError::InvalidArgument { reason },
            ChipError::File(err) => SessionError::invalid_argument(err.to_string()),
            ChipError::UnrecognizedFormat { name } => SessionError::UnrecognizedFormat { name },
            ChipError::NoTrack => SessionError::NoTrack,
            ChipError::InvalidSubsong { index, available } => {
                SessionError::InvalidSubsong { index, available }
            }
        }
    }
}
