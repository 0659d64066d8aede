//! Error handling for the module session.

use modbridge_common::SessionError;
use thiserror::Error;

/// Convenient result alias for module session operations.
pub type Result<T> = std::result::Result<T, ModuleError>;

/// Errors raised by module loaders and the module session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModuleError {
    /// Empty file data.
    #[error("module '{name}' has no data")]
    EmptyInput {
        /// File name passed to the load call.
        name: String,
    },
    /// The loader could not parse the data.
    #[error("unrecognized module '{name}': {reason}")]
    Unrecognized {
        /// File name passed to the load call.
        name: String,
        /// Loader-provided explanation.
        reason: String,
    },
    /// The session configuration was rejected.
    #[error("invalid module session configuration: {reason}")]
    InvalidConfig {
        /// Validation message.
        reason: String,
    },
    /// Transport call without a loaded module.
    #[error("no module loaded")]
    NoTrack,
    /// Subsong index outside the loaded module.
    #[error("subsong {index} out of range (module has {available})")]
    InvalidSubsong {
        /// Requested 0-based index.
        index: usize,
        /// Number of subsongs in the module.
        available: usize,
    },
}

impl ModuleError {
    /// Shorthand for [`ModuleError::Unrecognized`].
    pub fn unrecognized(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ModuleError::Unrecognized {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<ModuleError> for SessionError {
    fn from(err: ModuleError) -> Self {
        match err {
            ModuleError::EmptyInput { .. } => SessionError::invalid_argument(err.to_string()),
            ModuleError::Unrecognized { name, .. } => SessionError::UnrecognizedFormat { name },
            ModuleError::InvalidConfig { reason } => SessionError::InvalidArgument { reason },
            ModuleError::NoTrack => SessionError::NoTrack,
            ModuleError::InvalidSubsong { index, available } => {
                SessionError::InvalidSubsong { index, available }
            }
        }
    }
}
