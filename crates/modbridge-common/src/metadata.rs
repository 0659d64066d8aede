//! Track metadata with explicit field capacities.
//!
//! Hosts on the other side of the call boundary read metadata out of
//! fixed-size buffers. Every field therefore has a byte capacity and text past
//! it is cut at the last complete UTF-8 character that fits.

use serde::{Deserialize, Serialize};

/// Maximum title length in bytes.
pub const TITLE_CAPACITY: usize = 255;
/// Maximum author/artist length in bytes.
pub const AUTHOR_CAPACITY: usize = 255;
/// Maximum format/type length in bytes.
pub const KIND_CAPACITY: usize = 255;
/// Maximum description length in bytes.
pub const DESCRIPTION_CAPACITY: usize = 1023;

/// Cut `text` to at most `max_bytes` bytes without splitting a character.
pub fn truncate_to(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Metadata of the loaded track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    title: String,
    author: String,
    kind: String,
    description: String,
}

impl TrackMetadata {
    /// Build metadata, truncating every field to its capacity.
    pub fn new(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        kind: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Self {
        let mut metadata = Self::default();
        metadata.set_title(title.as_ref());
        metadata.set_author(author.as_ref());
        metadata.set_kind(kind.as_ref());
        metadata.set_description(description.as_ref());
        metadata
    }

    /// Song title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author, composer or artist.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Format name reported by the backend.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Free-form description; empty for backends that have none.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: &str) {
        replace_truncated(&mut self.title, title, TITLE_CAPACITY);
    }

    /// Replace the author.
    pub fn set_author(&mut self, author: &str) {
        replace_truncated(&mut self.author, author, AUTHOR_CAPACITY);
    }

    /// Replace the format name.
    pub fn set_kind(&mut self, kind: &str) {
        replace_truncated(&mut self.kind, kind, KIND_CAPACITY);
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: &str) {
        replace_truncated(&mut self.description, description, DESCRIPTION_CAPACITY);
    }

    /// Whether every field is empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.author.is_empty()
            && self.kind.is_empty()
            && self.description.is_empty()
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        self.title.clear();
        self.author.clear();
        self.kind.clear();
        self.description.clear();
    }

    /// `title|author|type|description`
    pub fn info_line(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.title, self.author, self.kind, self.description
        )
    }

    /// `title|author|type`, for backends without a description.
    pub fn short_info_line(&self) -> String {
        format!("{}|{}|{}", self.title, self.author, self.kind)
    }
}

fn replace_truncated(field: &mut String, value: &str, capacity: usize) {
    field.clear();
    field.push_str(truncate_to(value, capacity));
}
