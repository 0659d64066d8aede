//! Tick-accumulator playback session.

use modbridge_common::{
    AudioBuffer, Capabilities, PlaybackSession, RenderStatus, SessionConfig, SessionError,
    SessionState, TrackMetadata,
};
use modbridge_vfs::{MemoryProvider, VfsError};

use crate::chip::SynthChip;
use crate::clock::{PlaybackClock, TickSource, effective_refresh_hz};
use crate::error::{ChipError, Result};
use crate::factory::PlayerRegistry;
use crate::player::TickPlayer;

/// Supplies the chip emulator and the player set for a session.
pub trait ChipBackend {
    /// Chip emulator type.
    type Chip: SynthChip;

    /// Create a chip running at `sample_rate`.
    fn create_chip(&self, sample_rate: u32) -> Result<Self::Chip>;

    /// Players available to the factory, in probe order.
    fn players(&self) -> PlayerRegistry;
}

struct LoadedTrack {
    player: Box<dyn TickPlayer>,
    format: &'static str,
    subsong: usize,
}

/// Couples a chip with the player feeding it for one block fill.
struct Voice<'a, C: SynthChip> {
    chip: &'a mut C,
    player: &'a mut dyn TickPlayer,
}

impl<C: SynthChip> TickSource for Voice<'_, C> {
    fn render(&mut self, out: &mut [i16]) {
        self.chip.render(out);
    }

    fn advance_tick(&mut self) -> bool {
        self.player.update(&mut *self.chip)
    }

    fn refresh_rate(&self) -> f32 {
        self.player.refresh_rate()
    }
}

/// Playback session for a tick-driven chip player.
///
/// Owns the chip, the player registry, the virtual file store the players
/// read from and the reusable i16 output block.
pub struct ChipSession<C: SynthChip> {
    config: SessionConfig,
    chip: C,
    registry: PlayerRegistry,
    provider: MemoryProvider,
    track: Option<LoadedTrack>,
    clock: PlaybackClock,
    buffer: AudioBuffer<i16>,
    metadata: TrackMetadata,
    position_ms: u64,
    duration_ms: u64,
    loop_enabled: bool,
}

impl<C: SynthChip> ChipSession<C> {
    /// Create a session with a fresh chip from `backend`.
    pub fn new<B>(backend: &B, config: SessionConfig) -> Result<Self>
    where
        B: ChipBackend<Chip = C>,
    {
        config.validate().map_err(|err| ChipError::InvalidConfig {
            reason: err.to_string(),
        })?;

        let mut chip = backend.create_chip(config.sample_rate)?;
        chip.init();
        let registry = backend.players();
        log::debug!(
            "chip: session ready at {} Hz, {} frames per block, {} players",
            config.sample_rate,
            config.buffer_frames,
            registry.len()
        );

        Ok(Self {
            clock: PlaybackClock::new(config.sample_rate, config.default_refresh_hz),
            buffer: AudioBuffer::new(config.buffer_frames),
            loop_enabled: config.loop_enabled,
            config,
            chip,
            registry,
            provider: MemoryProvider::new(),
            track: None,
            metadata: TrackMetadata::default(),
            position_ms: 0,
            duration_ms: 0,
        })
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Register a companion file (instrument bank, pattern data...).
    ///
    /// Replaces any file registered under the same name.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if self.provider.store_mut().register(name, data)?.is_some() {
            log::debug!("chip: replaced '{name}' ({} bytes)", data.len());
        }
        Ok(())
    }

    /// Virtual file store the players read from.
    pub fn provider(&self) -> &MemoryProvider {
        &self.provider
    }

    /// Register `name` and load it with the first player that accepts it.
    ///
    /// Empty input is rejected before anything changes. Otherwise the current
    /// track is released first, so a failed load leaves no track loaded.
    pub fn load_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if name.is_empty() {
            return Err(VfsError::EmptyName.into());
        }
        if data.is_empty() {
            return Err(VfsError::EmptyData {
                name: name.to_string(),
            }
            .into());
        }

        self.unload_track();
        self.add_file(name, data)?;
        self.chip.init();

        let Some(loaded) = self.registry.factory(name, &mut self.chip, &self.provider) else {
            log::warn!("chip: no player recognizes '{name}'");
            return Err(ChipError::UnrecognizedFormat {
                name: name.to_string(),
            });
        };

        let mut player = loaded.player;
        player.set_loop_enabled(self.loop_enabled);
        self.metadata = TrackMetadata::new(
            player.title(),
            player.author(),
            player.kind(),
            player.description(),
        );
        self.duration_ms = player.song_length_ms(None);
        self.clock.reset();
        self.position_ms = 0;
        self.buffer.clear();

        log::debug!(
            "chip: loaded '{name}' as {} ({} ms, {} subsongs)",
            loaded.descriptor.name(),
            self.duration_ms,
            player.subsong_count()
        );
        self.track = Some(LoadedTrack {
            player,
            format: loaded.descriptor.name(),
            subsong: 0,
        });
        Ok(())
    }

    /// Name of the player that loaded the current track.
    pub fn format_name(&self) -> Option<&'static str> {
        self.track.as_ref().map(|track| track.format)
    }

    /// Render the next block.
    ///
    /// With no track loaded the block is empty and the result is `Ended`.
    pub fn compute_samples(&mut self) -> RenderStatus {
        let Some(track) = self.track.as_mut() else {
            self.buffer.set_valid_frames(0);
            return RenderStatus::Ended;
        };

        let mut voice = Voice {
            chip: &mut self.chip,
            player: track.player.as_mut(),
        };
        let fill = self.clock.fill_block(self.buffer.storage_mut(), &mut voice);
        self.buffer.set_valid_frames(fill.frames);
        self.position_ms = self.clock.position_ms();
        fill.status
    }

    /// Block filled by the last [`compute_samples`](Self::compute_samples).
    pub fn audio_buffer(&self) -> &AudioBuffer<i16> {
        &self.buffer
    }

    /// Elapsed time in milliseconds.
    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    /// Length of the current subsong in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Jump to `ms` in the current subsong.
    pub fn seek_ms(&mut self, ms: u64) -> Result<()> {
        let track = self.track.as_mut().ok_or(ChipError::NoTrack)?;
        let ticks = track.player.seek_ms(ms, &mut self.chip);
        self.clock.realign(ms, ticks);
        self.position_ms = ms;
        Ok(())
    }

    /// Restart the current subsong.
    pub fn rewind(&mut self) -> Result<()> {
        let track = self.track.as_mut().ok_or(ChipError::NoTrack)?;
        track.player.rewind(None, &mut self.chip);
        self.clock.reset();
        self.position_ms = 0;
        Ok(())
    }

    /// Number of subsongs (0 without a track).
    pub fn subsong_count(&self) -> usize {
        self.track
            .as_ref()
            .map_or(0, |track| track.player.subsong_count())
    }

    /// Currently selected subsong.
    pub fn current_subsong(&self) -> usize {
        self.track.as_ref().map_or(0, |track| track.subsong)
    }

    /// Switch to `index` and re-measure its length.
    pub fn set_subsong(&mut self, index: usize) -> Result<()> {
        let track = self.track.as_mut().ok_or(ChipError::NoTrack)?;
        let available = track.player.subsong_count();
        if index >= available {
            return Err(ChipError::InvalidSubsong { index, available });
        }

        track.player.rewind(Some(index), &mut self.chip);
        self.duration_ms = track.player.song_length_ms(Some(index));
        track.subsong = index;
        self.clock.reset();
        self.position_ms = 0;
        log::debug!("chip: subsong {index} selected ({} ms)", self.duration_ms);
        Ok(())
    }

    /// Ticks advanced since load, rewind or seek.
    pub fn current_tick(&self) -> u64 {
        self.clock.current_tick()
    }

    /// Tick rate of the current track, with the fallback applied.
    pub fn refresh_rate_hz(&self) -> f32 {
        self.track.as_ref().map_or(self.config.default_refresh_hz, |track| {
            effective_refresh_hz(track.player.refresh_rate(), self.config.default_refresh_hz)
        })
    }

    /// Set the loop flag and forward it to the current player.
    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
        if let Some(track) = self.track.as_mut() {
            track.player.set_loop_enabled(enabled);
        }
    }

    /// Current loop flag.
    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Metadata of the loaded track.
    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    /// `title|author|type|description`.
    pub fn track_info(&self) -> String {
        self.metadata.info_line()
    }

    fn unload_track(&mut self) {
        if let Some(track) = self.track.take() {
            log::debug!("chip: unloading {} track", track.format);
        }
        self.metadata.clear();
        self.clock.reset();
        self.buffer.clear();
        self.position_ms = 0;
        self.duration_ms = 0;
    }
}

impl<C: SynthChip> Drop for ChipSession<C> {
    fn drop(&mut self) {
        self.track = None;
        let open = self.provider.open_stream_count();
        if open > 0 {
            log::warn!("chip: {open} streams still open at teardown");
        }
        self.provider.clear();
    }
}

impl<C: SynthChip> PlaybackSession for ChipSession<C> {
    type Sample = i16;

    fn capabilities(&self) -> Capabilities {
        Capabilities::TICK_CLOCK
            | Capabilities::SEEK
            | Capabilities::SUBSONGS
            | Capabilities::LOOP_FLAG
            | Capabilities::AUX_FILES
    }

    fn state(&self) -> SessionState {
        if self.track.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Ready
        }
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    fn load(&mut self, name: &str, data: &[u8]) -> modbridge_common::Result<()> {
        Ok(self.load_file(name, data)?)
    }

    fn unload(&mut self) {
        self.unload_track();
    }

    fn compute(&mut self) -> RenderStatus {
        self.compute_samples()
    }

    fn audio_buffer(&self) -> &AudioBuffer<i16> {
        &self.buffer
    }

    fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    fn position_seconds(&self) -> f64 {
        self.position_ms as f64 / 1000.0
    }

    fn duration_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    fn seek_seconds(&mut self, seconds: f64) {
        let ms = (seconds.max(0.0) * 1000.0).round() as u64;
        if let Err(err) = self.seek_ms(ms) {
            log::debug!("chip: seek ignored: {err}");
        }
    }

    fn rewind(&mut self) {
        if let Err(err) = ChipSession::rewind(self) {
            log::debug!("chip: rewind ignored: {err}");
        }
    }

    fn subsong_count(&self) -> usize {
        ChipSession::subsong_count(self)
    }

    fn set_subsong(&mut self, index: usize) -> modbridge_common::Result<()> {
        ChipSession::set_subsong(self, index).map_err(SessionError::from)
    }
}
