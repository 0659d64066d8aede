//! Session error taxonomy.

use thiserror::Error;

use crate::status::STATUS_ERROR;

/// Convenient result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors reported by session operations.
///
/// None of these are fatal: the host recovers by calling `init` or
/// `load_file` again.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    /// Missing or empty input; session state is unchanged.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },
    /// The synthesis or decoding engine could not be created.
    #[error("engine unavailable: {reason}")]
    EngineUnavailable {
        /// Backend-provided explanation.
        reason: String,
    },
    /// No player or loader accepted the file.
    #[error("unrecognized format for '{name}'")]
    UnrecognizedFormat {
        /// File name passed to the load call.
        name: String,
    },
    /// The operation needs `init` first.
    #[error("session not initialized")]
    NotInitialized,
    /// The operation needs a loaded track.
    #[error("no track loaded")]
    NoTrack,
    /// Subsong index outside the loaded track.
    #[error("invalid subsong index {index} (available: {available})")]
    InvalidSubsong {
        /// Requested subsong index.
        index: usize,
        /// Number of available subsongs.
        available: usize,
    },
}

impl SessionError {
    /// Shorthand for [`SessionError::InvalidArgument`].
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        SessionError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Flat status code for this error.
    pub fn status_code(&self) -> i32 {
        STATUS_ERROR
    }
}
