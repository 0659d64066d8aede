//! Named blob registry with fuzzy name resolution.
//!
//! Chip formats such as ROL or raw OPL captures reference companion files
//! (e.g. `STANDARD.BNK`) by whatever name the original tracker wrote, which
//! rarely matches the case or directory layout the host registered. Lookup
//! therefore falls back from an exact match to the bare file name and finally
//! to a case-insensitive comparison of bare names.

use std::collections::BTreeMap;

use crate::error::{Result, VfsError};

/// A registered file: its name and an owned copy of its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    name: String,
    bytes: Box<[u8]>,
}

impl FileEntry {
    /// Registration name (exact key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Registered entries are never empty, but the accessor mirrors `len`.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Which lookup tier satisfied a [`FileStore::resolve_with_tier`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// The requested name matched a key exactly.
    Exact,
    /// The requested name with its directory prefix stripped matched a key.
    Basename,
    /// The stripped name matched a stripped key ignoring ASCII case.
    CaseInsensitive,
}

/// Strip any `/` or `\` directory prefix from a path.
pub fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// In-memory registry of named files.
///
/// Keys are case-sensitive and unique. Entries are kept in key order so the
/// case-insensitive tier picks the same candidate on every run.
#[derive(Debug, Default, Clone)]
pub struct FileStore {
    entries: BTreeMap<String, FileEntry>,
}

impl FileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a copy of `bytes` under `name`.
    ///
    /// Any entry already stored under exactly `name` is released and returned.
    pub fn register(&mut self, name: &str, bytes: &[u8]) -> Result<Option<FileEntry>> {
        self.register_owned(name, bytes.to_vec())
    }

    /// Register `bytes` under `name`, taking ownership of the buffer.
    pub fn register_owned(&mut self, name: &str, bytes: Vec<u8>) -> Result<Option<FileEntry>> {
        if name.is_empty() {
            return Err(VfsError::EmptyName);
        }
        if bytes.is_empty() {
            return Err(VfsError::EmptyData {
                name: name.to_string(),
            });
        }

        // Release the previous buffer before the new one is stored.
        let previous = self.entries.remove(name);
        self.entries.insert(
            name.to_string(),
            FileEntry {
                name: name.to_string(),
                bytes: bytes.into_boxed_slice(),
            },
        );
        Ok(previous)
    }

    /// Remove the entry stored under exactly `name`.
    pub fn remove(&mut self, name: &str) -> Option<FileEntry> {
        self.entries.remove(name)
    }

    /// Resolve a requested name to a stored entry.
    pub fn resolve(&self, requested: &str) -> Option<&FileEntry> {
        self.resolve_with_tier(requested).map(|(entry, _)| entry)
    }

    /// Resolve a requested name, reporting which tier matched.
    ///
    /// Tiers are tried in order and the first hit wins:
    /// 1. exact key,
    /// 2. requested basename as exact key,
    /// 3. requested basename against every stored basename, ignoring ASCII case.
    pub fn resolve_with_tier(&self, requested: &str) -> Option<(&FileEntry, MatchTier)> {
        if let Some(entry) = self.entries.get(requested) {
            return Some((entry, MatchTier::Exact));
        }

        let wanted = basename(requested);
        if let Some(entry) = self.entries.get(wanted) {
            return Some((entry, MatchTier::Basename));
        }

        self.entries
            .iter()
            .find(|(key, _)| basename(key).eq_ignore_ascii_case(wanted))
            .map(|(_, entry)| (entry, MatchTier::CaseInsensitive))
    }

    /// Check whether an exact key is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total bytes held by the store.
    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(FileEntry::len).sum()
    }

    /// Release every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
