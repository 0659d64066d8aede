//! Reusable interleaved stereo audio buffers.

use std::fmt::Debug;

use crate::CHANNELS;

/// Sample formats a session can render.
pub trait StereoSample: Copy + Default + PartialEq + Debug + Send + 'static {
    /// Value written for silence.
    const SILENCE: Self;

    /// Storage size of one sample in bytes.
    const BYTES: usize = std::mem::size_of::<Self>();

    /// Convert to a normalized `f32` in `[-1.0, 1.0]`.
    fn to_f32(self) -> f32;
}

impl StereoSample for i16 {
    const SILENCE: Self = 0;

    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self) / 32768.0
    }
}

impl StereoSample for f32 {
    const SILENCE: Self = 0.0;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }
}

/// Fixed-capacity interleaved stereo block.
///
/// Storage is allocated once and reused by every render call. The number of
/// frames holding fresh audio (`valid_frames`) is tracked separately from
/// the capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer<S: StereoSample> {
    samples: Vec<S>,
    valid_frames: usize,
}

impl<S: StereoSample> AudioBuffer<S> {
    /// Allocate a silent buffer holding `capacity_frames` stereo frames.
    pub fn new(capacity_frames: usize) -> Self {
        Self {
            samples: vec![S::SILENCE; capacity_frames * CHANNELS],
            valid_frames: 0,
        }
    }

    /// Capacity in stereo frames.
    pub fn capacity_frames(&self) -> usize {
        self.samples.len() / CHANNELS
    }

    /// Frames produced by the last render.
    pub fn valid_frames(&self) -> usize {
        self.valid_frames
    }

    /// Record how many frames the last render produced (clamped to capacity).
    pub fn set_valid_frames(&mut self, frames: usize) {
        self.valid_frames = frames.min(self.capacity_frames());
    }

    /// Valid samples, interleaved L/R.
    pub fn samples(&self) -> &[S] {
        &self.samples[..self.valid_frames * CHANNELS]
    }

    /// Whole backing storage for a renderer to write into.
    pub fn storage_mut(&mut self) -> &mut [S] {
        &mut self.samples
    }

    /// Storage for frames `start..start + count`.
    pub fn frames_mut(&mut self, start: usize, count: usize) -> &mut [S] {
        &mut self.samples[start * CHANNELS..(start + count) * CHANNELS]
    }

    /// Pointer to the first sample, stable for the lifetime of the buffer.
    pub fn as_ptr(&self) -> *const S {
        self.samples.as_ptr()
    }

    /// Byte length of the valid region.
    pub fn valid_byte_len(&self) -> usize {
        self.valid_frames * CHANNELS * S::BYTES
    }

    /// Whether the last render produced nothing.
    pub fn is_empty(&self) -> bool {
        self.valid_frames == 0
    }

    /// Silence the storage and drop the valid region.
    pub fn clear(&mut self) {
        self.samples.fill(S::SILENCE);
        self.valid_frames = 0;
    }
}
