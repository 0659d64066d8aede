//! Tick-to-sample scheduling.
//!
//! Players advance in ticks at a song-defined rate; hosts pull fixed-size
//! blocks. [`PlaybackClock`] keeps a fractional sample accumulator so that,
//! over time, exactly `sample_rate / refresh_rate` samples are rendered per
//! tick regardless of block boundaries.

use modbridge_common::{CHANNELS, RenderStatus};

/// Replace a non-positive or non-finite refresh rate with `fallback`.
#[inline]
pub fn effective_refresh_hz(refresh_rate: f32, fallback: f32) -> f32 {
    if refresh_rate.is_finite() && refresh_rate > 0.0 {
        refresh_rate
    } else {
        fallback
    }
}

/// What the clock drives: a chip that renders and a player that ticks.
pub trait TickSource {
    /// Render `out.len() / 2` interleaved stereo frames.
    fn render(&mut self, out: &mut [i16]);

    /// Advance one tick. Returns `false` when the song has ended.
    fn advance_tick(&mut self) -> bool;

    /// Current tick rate in Hz (may be non-positive).
    fn refresh_rate(&self) -> f32;
}

/// Outcome of one [`PlaybackClock::fill_block`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFill {
    /// Frames written to the front of the block.
    pub frames: usize,
    /// Whether the song is still playing.
    pub status: RenderStatus,
}

/// Fractional sample scheduler for a tick-driven player.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    sample_rate: u32,
    fallback_refresh_hz: f32,
    refresh_rate_hz: f32,
    accumulator: f64,
    samples_rendered: u64,
    current_tick: u64,
}

impl PlaybackClock {
    /// Create a clock for `sample_rate`, substituting `fallback_refresh_hz`
    /// whenever the player reports an unusable rate.
    pub fn new(sample_rate: u32, fallback_refresh_hz: f32) -> Self {
        Self {
            sample_rate,
            fallback_refresh_hz,
            refresh_rate_hz: fallback_refresh_hz,
            accumulator: 0.0,
            samples_rendered: 0,
            current_tick: 0,
        }
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples still owed to the current tick.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Frames rendered since load, rewind or seek.
    pub fn samples_rendered(&self) -> u64 {
        self.samples_rendered
    }

    /// Ticks advanced since load or rewind.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Refresh rate read after the last tick.
    pub fn refresh_rate_hz(&self) -> f32 {
        self.refresh_rate_hz
    }

    /// Position derived from rendered frames, rounded to whole milliseconds.
    pub fn position_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples_rendered as f64 * 1000.0 / f64::from(self.sample_rate)).round() as u64
    }

    /// Back to tick zero.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.samples_rendered = 0;
        self.current_tick = 0;
    }

    /// Re-anchor after a seek to `ms` that stepped `ticks` ticks.
    pub fn realign(&mut self, ms: u64, ticks: u64) {
        self.accumulator = 0.0;
        self.samples_rendered = (ms as f64 * f64::from(self.sample_rate) / 1000.0).round() as u64;
        self.current_tick = ticks;
    }

    /// Fill `block` (interleaved stereo) from `source`.
    ///
    /// On [`RenderStatus::Ended`] only the first `frames` frames are valid.
    pub fn fill_block<T: TickSource + ?Sized>(
        &mut self,
        block: &mut [i16],
        source: &mut T,
    ) -> BlockFill {
        let capacity = block.len() / CHANNELS;
        let mut filled = 0usize;
        let mut status = RenderStatus::Playing;

        while filled < capacity {
            if self.accumulator >= 1.0 {
                let owed = self.accumulator.floor() as usize;
                let count = owed.min(capacity - filled);
                source.render(&mut block[filled * CHANNELS..(filled + count) * CHANNELS]);
                self.accumulator -= count as f64;
                filled += count;
            }

            if filled < capacity {
                let playing = source.advance_tick();
                self.current_tick += 1;
                if !playing {
                    status = RenderStatus::Ended;
                    break;
                }
                self.refresh_rate_hz =
                    effective_refresh_hz(source.refresh_rate(), self.fallback_refresh_hz);
                self.accumulator += f64::from(self.sample_rate) / f64::from(self.refresh_rate_hz);
            }
        }

        self.samples_rendered += filled as u64;
        BlockFill {
            frames: filled,
            status,
        }
    }
}
