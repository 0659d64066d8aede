//! Stream provider over a [`FileStore`].
//!
//! Decoders open companion files by name and may read them destructively or
//! keep them open for the whole song. Every [`OpenStream`] therefore owns a
//! private snapshot of the file bytes, independent of later store mutation.
//! The provider keeps a ledger of live stream ids; a stream leaves the ledger
//! exactly once, when it is closed or dropped.

use std::collections::HashSet;
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::store::{FileStore, MatchTier};

/// Identifier of one open stream, unique per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(u64);

#[derive(Debug, Default)]
struct StreamLedger {
    next_id: AtomicU64,
    live: Mutex<HashSet<StreamId>>,
}

impl StreamLedger {
    fn issue(&self) -> StreamId {
        let id = StreamId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.live.lock().insert(id);
        id
    }

    fn release(&self, id: StreamId) -> bool {
        self.live.lock().remove(&id)
    }

    fn count(&self) -> usize {
        self.live.lock().len()
    }
}

/// Readable snapshot of a stored file.
///
/// Implements [`Read`], [`BufRead`] and [`Seek`], plus the little-endian
/// helpers chip-format parsers usually need.
#[derive(Debug)]
pub struct OpenStream {
    id: StreamId,
    name: String,
    cursor: Cursor<Vec<u8>>,
    ledger: Arc<StreamLedger>,
}

impl OpenStream {
    /// Ledger id of this stream.
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Stored name the request resolved to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full snapshot contents, independent of the read position.
    pub fn bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    /// Snapshot length in bytes.
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Current read offset.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Bytes left between the read offset and the end.
    pub fn remaining(&self) -> usize {
        self.len()
            .saturating_sub(usize::try_from(self.cursor.position()).unwrap_or(usize::MAX))
    }

    /// Whether the read offset reached the end of the snapshot.
    pub fn at_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.cursor.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.cursor.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read `len` bytes as (lossy) text, stopping at the first NUL.
    pub fn read_fixed_string(&mut self, len: usize) -> io::Result<String> {
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf)?;
        let end = buf.iter().position(|&b| b == 0).unwrap_or(len);
        Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
    }
}

impl Read for OpenStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl BufRead for OpenStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.cursor.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.cursor.consume(amt);
    }
}

impl Seek for OpenStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Drop for OpenStream {
    fn drop(&mut self) {
        self.ledger.release(self.id);
    }
}

/// File provider backed by an in-memory [`FileStore`].
#[derive(Debug, Default)]
pub struct MemoryProvider {
    store: FileStore,
    ledger: Arc<StreamLedger>,
}

impl MemoryProvider {
    /// Create a provider over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider over an existing store.
    pub fn with_store(store: FileStore) -> Self {
        Self {
            store,
            ledger: Arc::default(),
        }
    }

    /// Shared access to the backing store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Mutable access to the backing store.
    ///
    /// Open streams are snapshots and are not affected by changes made here.
    pub fn store_mut(&mut self) -> &mut FileStore {
        &mut self.store
    }

    /// Resolve `filename` and open a private snapshot of it.
    ///
    /// Returns `None` when no lookup tier matches; the caller decides whether
    /// a missing companion file aborts the load.
    pub fn open(&self, filename: &str) -> Option<OpenStream> {
        let Some((entry, tier)) = self.store.resolve_with_tier(filename) else {
            log::warn!("vfs: unresolved file reference '{filename}'");
            return None;
        };
        if tier != MatchTier::Exact {
            log::trace!(
                "vfs: '{filename}' resolved to '{}' ({tier:?})",
                entry.name()
            );
        }

        Some(OpenStream {
            id: self.ledger.issue(),
            name: entry.name().to_string(),
            cursor: Cursor::new(entry.bytes().to_vec()),
            ledger: Arc::clone(&self.ledger),
        })
    }

    /// Close a stream, releasing its snapshot.
    ///
    /// Consuming the handle makes a second close of the same stream
    /// impossible.
    pub fn close(&self, stream: OpenStream) {
        drop(stream);
    }

    /// Number of streams opened through this provider and not yet closed.
    pub fn open_stream_count(&self) -> usize {
        self.ledger.count()
    }

    /// Check whether a specific stream is still open.
    pub fn is_open(&self, id: StreamId) -> bool {
        self.ledger.live.lock().contains(&id)
    }

    /// Release every stored file.
    ///
    /// Streams already handed out stay readable until they are closed.
    pub fn clear(&mut self) {
        self.store.clear();
    }
}
