//! Decoder abstraction for tracker modules.

use crate::error::Result;
use crate::repeat::RepeatCount;

/// Metadata key for the song title.
pub const METADATA_TITLE: &str = "title";
/// Metadata key for the artist.
pub const METADATA_ARTIST: &str = "artist";
/// Metadata key for the long format name.
pub const METADATA_TYPE: &str = "type_long";

/// A decoded tracker module that renders on demand.
pub trait TrackerModule {
    /// Apply a repeat count; takes effect on the next render.
    fn set_repeat_count(&mut self, repeat: RepeatCount);

    /// Render up to `out.len() / 2` interleaved stereo frames at
    /// `sample_rate`. Returns the frames produced; `0` means the end.
    fn read_interleaved_stereo(&mut self, sample_rate: u32, out: &mut [f32]) -> usize;

    /// Current position in seconds.
    fn position_seconds(&self) -> f64;

    /// Length of the current subsong in seconds.
    fn duration_seconds(&self) -> f64;

    /// Move to `seconds`. Returns the position actually reached.
    fn set_position_seconds(&mut self, seconds: f64) -> f64;

    /// Look up a metadata value such as [`METADATA_TITLE`].
    fn metadata(&self, key: &str) -> Option<String>;

    /// Number of subsongs.
    fn subsong_count(&self) -> usize {
        1
    }

    /// Switch to subsong `index`. Returns `false` when it does not exist.
    fn select_subsong(&mut self, index: usize) -> bool {
        index == 0
    }
}

/// Parses file data into a [`TrackerModule`].
pub trait ModuleLoader {
    /// Module type produced by this loader.
    type Module: TrackerModule;

    /// Decode `data`. `filename` is a format hint only.
    fn load(&self, filename: &str, data: &[u8]) -> Result<Self::Module>;
}
