//! # modbridge-vfs
//!
//! In-memory virtual file store for chip formats that spread a song over
//! several files (instrument banks, sample sets, companion headers).
//!
//! - [`FileStore`] owns named byte blobs and resolves requested names with a
//!   three-tier lookup (exact, basename, case-insensitive basename).
//! - [`MemoryProvider`] hands out [`OpenStream`] snapshots: each open gets a
//!   private copy of the bytes, so a decoder can keep reading a stream while
//!   the store is re-registered or cleared underneath it.
//!
//! ## Example
//!
//! ```
//! use modbridge_vfs::MemoryProvider;
//! use std::io::Read;
//!
//! let mut provider = MemoryProvider::new();
//! provider.store_mut().register("STANDARD.BNK", b"bank").unwrap();
//!
//! let mut stream = provider.open("songs/standard.bnk").expect("resolved");
//! let mut bytes = Vec::new();
//! stream.read_to_end(&mut bytes).unwrap();
//! assert_eq!(bytes, b"bank");
//! provider.close(stream);
//! ```

#![warn(missing_docs)]

mod error;
mod provider;
mod store;

pub use error::{Result, VfsError};
pub use provider::{MemoryProvider, OpenStream, StreamId};
pub use store::{FileEntry, FileStore, MatchTier, basename};
