//! Error handling for the virtual file store.

use thiserror::Error;

/// Convenient result alias for store operations.
pub type Result<T> = std::result::Result<T, VfsError>;

/// Errors raised when registering files.
///
/// Lookups never fail with an error: an unresolvable name is reported as
/// `None` so decoders can apply their own missing-file policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VfsError {
    /// The registration name was empty.
    #[error("file name must not be empty")]
    EmptyName,
    /// The registered file had no bytes.
    #[error("file '{name}' has no data")]
    EmptyData {
        /// Name the caller tried to register.
        name: String,
    },
}
