//! Tick-driven player abstraction.
//!
//! A player owns a parsed song and advances it one tick at a time, writing
//! chip registers as it goes. The session decides how many samples to
//! render between ticks from [`TickPlayer::refresh_rate`].

use modbridge_common::DEFAULT_REFRESH_HZ;
use modbridge_vfs::MemoryProvider;

use crate::chip::{SilentChip, SynthChip};
use crate::clock::effective_refresh_hz;

/// Upper bound for simulated song length (10 minutes).
pub const MAX_SONG_LENGTH_MS: f64 = 600_000.0;

/// A song player driven by discrete ticks.
///
/// `subsong` arguments are 0-based; `None` means "the current subsong".
pub trait TickPlayer {
    /// Parse `filename`, opening it (and any companion files) through
    /// `provider`. Returns `false` when the file is not in this player's
    /// format or a required companion file is missing.
    fn load(&mut self, filename: &str, provider: &MemoryProvider, chip: &mut dyn SynthChip) -> bool;

    /// Advance one tick. Returns `false` once the song has ended.
    fn update(&mut self, chip: &mut dyn SynthChip) -> bool;

    /// Restart `subsong` (or the current one) from its first tick.
    fn rewind(&mut self, subsong: Option<usize>, chip: &mut dyn SynthChip);

    /// Current tick rate in Hz. May change after any [`update`](Self::update).
    fn refresh_rate(&self) -> f32;

    /// Human-readable format name.
    fn kind(&self) -> String;

    /// Song title.
    fn title(&self) -> String {
        String::new()
    }

    /// Composer.
    fn author(&self) -> String {
        String::new()
    }

    /// Free-form song description.
    fn description(&self) -> String {
        String::new()
    }

    /// Number of subsongs in the file.
    fn subsong_count(&self) -> usize {
        1
    }

    /// Forward the host loop flag. Players without loop support ignore it.
    fn set_loop_enabled(&mut self, _enabled: bool) {}

    /// Length of `subsong` in milliseconds.
    ///
    /// The default simulates the song on a [`SilentChip`] so the real chip is
    /// left alone, and rewinds afterwards.
    fn song_length_ms(&mut self, subsong: Option<usize>) -> u64 {
        let mut silent = SilentChip;
        self.rewind(subsong, &mut silent);

        let mut length = 0.0f64;
        while self.update(&mut silent) && length < MAX_SONG_LENGTH_MS {
            length += tick_duration_ms(self.refresh_rate());
        }

        self.rewind(subsong, &mut silent);
        length as u64
    }

    /// Move to `ms` within the current subsong.
    ///
    /// The default rewinds and replays ticks until the target is reached.
    /// Returns the number of ticks stepped.
    fn seek_ms(&mut self, ms: u64, chip: &mut dyn SynthChip) -> u64 {
        self.rewind(None, chip);

        let target = ms as f64;
        let mut position = 0.0f64;
        let mut ticks = 0u64;
        while position < target && self.update(chip) {
            position += tick_duration_ms(self.refresh_rate());
            ticks += 1;
        }
        ticks
    }
}

#[inline]
fn tick_duration_ms(refresh_rate: f32) -> f64 {
    1000.0 / f64::from(effective_refresh_hz(refresh_rate, DEFAULT_REFRESH_HZ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays `ticks` ticks at `rate` Hz and counts chip writes.
    struct Metronome {
        ticks: u32,
        position: u32,
        rate: f32,
        writes: u32,
    }

    impl TickPlayer for Metronome {
        fn load(&mut self, _: &str, _: &MemoryProvider, _: &mut dyn SynthChip) -> bool {
            true
        }

        fn update(&mut self, chip: &mut dyn SynthChip) -> bool {
            chip.write(0xA0, 0x01);
            self.writes += 1;
            self.position += 1;
            self.position < self.ticks
        }

        fn rewind(&mut self, _subsong: Option<usize>, chip: &mut dyn SynthChip) {
            chip.init();
            self.position = 0;
        }

        fn refresh_rate(&self) -> f32 {
            self.rate
        }

        fn kind(&self) -> String {
            "Metronome".into()
        }
    }

    fn metronome(ticks: u32, rate: f32) -> Metronome {
        Metronome {
            ticks,
            position: 0,
            rate,
            writes: 0,
        }
    }

    #[test]
    fn default_song_length_sums_tick_durations() {
        // 100 ticks at 50 Hz: the final update reports the end, so 99 ticks count.
        let mut player = metronome(100, 50.0);
        assert_eq!(player.song_length_ms(None), 1980);
        assert_eq!(player.position, 0);
    }

    #[test]
    fn song_length_uses_fallback_rate() {
        let mut player = metronome(8, 0.0);
        // 7 counted ticks at 70 Hz = 100 ms.
        assert_eq!(player.song_length_ms(Some(0)), 100);
    }

    #[test]
    fn song_length_is_capped() {
        let mut player = metronome(u32::MAX, 1000.0);
        let length = player.song_length_ms(None);
        assert!(length >= MAX_SONG_LENGTH_MS as u64);
        assert!(length <= MAX_SONG_LENGTH_MS as u64 + 1);
    }

    #[test]
    fn default_seek_steps_ticks() {
        let mut player = metronome(1000, 100.0);
        let mut chip = SilentChip;
        let ticks = player.seek_ms(250, &mut chip);
        assert_eq!(ticks, 25);
        assert_eq!(player.position, 25);
        assert_eq!(player.writes, 25);
    }

    #[test]
    fn seek_past_end_stops_at_end() {
        let mut player = metronome(10, 100.0);
        let mut chip = SilentChip;
        let ticks = player.seek_ms(60_000, &mut chip);
        assert_eq!(ticks, 9);
    }
}
