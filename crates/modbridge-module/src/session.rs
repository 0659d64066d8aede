//! Frame-pull playback session.

use modbridge_common::{
    AudioBuffer, Capabilities, PlaybackSession, RenderStatus, SessionConfig, SessionError,
    SessionState, TrackMetadata,
};

use crate::error::{ModuleError, Result};
use crate::module::{METADATA_ARTIST, METADATA_TITLE, METADATA_TYPE, ModuleLoader, TrackerModule};
use crate::repeat::RepeatCount;

/// Playback session over a tracker module decoder.
///
/// The decoder keeps its own position; the session only adds the output
/// buffer, the repeat count and cached metadata.
pub struct ModuleSession<L: ModuleLoader> {
    config: SessionConfig,
    loader: L,
    module: Option<L::Module>,
    buffer: AudioBuffer<f32>,
    metadata: TrackMetadata,
    repeat: RepeatCount,
    subsong: usize,
}

impl<L: ModuleLoader> ModuleSession<L> {
    /// Create an empty session.
    pub fn new(loader: L, config: SessionConfig) -> Result<Self> {
        config.validate().map_err(|err| ModuleError::InvalidConfig {
            reason: err.to_string(),
        })?;
        log::debug!(
            "module: session ready at {} Hz, {} frames per block",
            config.sample_rate,
            config.buffer_frames
        );

        Ok(Self {
            buffer: AudioBuffer::new(config.buffer_frames),
            repeat: RepeatCount::from_raw(config.repeat_count),
            config,
            loader,
            module: None,
            metadata: TrackMetadata::default(),
            subsong: 0,
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

    /// Decode `data` and make it the current module.
    ///
    /// Empty data is rejected without touching the current module. Otherwise
    /// the current module is released first.
    pub fn load_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(ModuleError::EmptyInput {
                name: name.to_string(),
            });
        }

        self.unload_module();
        let mut module = match self.loader.load(name, data) {
            Ok(module) => module,
            Err(err) => {
                log::warn!("module: {err}");
                return Err(err);
            }
        };

        module.set_repeat_count(self.repeat);
        let field = |key| module.metadata(key).unwrap_or_default();
        self.metadata = TrackMetadata::new(
            field(METADATA_TITLE),
            field(METADATA_ARTIST),
            field(METADATA_TYPE),
            "",
        );
        log::debug!(
            "module: loaded '{name}' ({}, {:.1} s, repeat {})",
            self.metadata.kind(),
            module.duration_seconds(),
            self.repeat
        );
        self.module = Some(module);
        Ok(())
    }

    /// Render the next block. Zero frames means the module ended.
    pub fn compute_samples(&mut self) -> RenderStatus {
        let Some(module) = self.module.as_mut() else {
            self.buffer.set_valid_frames(0);
            return RenderStatus::Ended;
        };

        let frames =
            module.read_interleaved_stereo(self.config.sample_rate, self.buffer.storage_mut());
        self.buffer.set_valid_frames(frames);
        if frames == 0 {
            RenderStatus::Ended
        } else {
            RenderStatus::Playing
        }
    }

    /// Block filled by the last [`compute_samples`](Self::compute_samples).
    pub fn audio_buffer(&self) -> &AudioBuffer<f32> {
        &self.buffer
    }

    /// Frames produced by the last render.
    pub fn audio_buffer_frame_count(&self) -> usize {
        self.buffer.valid_frames()
    }

    /// Decoder position in seconds (0 without a module).
    pub fn position_seconds(&self) -> f64 {
        self.module.as_ref().map_or(0.0, |module| module.position_seconds())
    }

    /// Length of the current subsong in seconds (0 without a module).
    pub fn duration_seconds(&self) -> f64 {
        self.module.as_ref().map_or(0.0, |module| module.duration_seconds())
    }

    /// Seek to `seconds`; negative targets clamp to the start.
    pub fn set_position_seconds(&mut self, seconds: f64) -> Result<f64> {
        let module = self.module.as_mut().ok_or(ModuleError::NoTrack)?;
        Ok(module.set_position_seconds(seconds.max(0.0)))
    }

    /// Back to the start of the current subsong.
    pub fn rewind(&mut self) -> Result<()> {
        self.set_position_seconds(0.0).map(|_| ())
    }

    /// Persist a repeat count and apply it to the current module.
    pub fn set_repeat_count(&mut self, repeat: RepeatCount) {
        self.repeat = repeat;
        if let Some(module) = self.module.as_mut() {
            module.set_repeat_count(repeat);
        }
    }

    /// Current repeat count.
    pub fn repeat_count(&self) -> RepeatCount {
        self.repeat
    }

    /// Number of subsongs (0 without a module).
    pub fn subsong_count(&self) -> usize {
        self.module.as_ref().map_or(0, |module| module.subsong_count())
    }

    /// Currently selected subsong.
    pub fn current_subsong(&self) -> usize {
        self.subsong
    }

    /// Switch to subsong `index`.
    pub fn set_subsong(&mut self, index: usize) -> Result<()> {
        let module = self.module.as_mut().ok_or(ModuleError::NoTrack)?;
        let available = module.subsong_count();
        if index >= available || !module.select_subsong(index) {
            return Err(ModuleError::InvalidSubsong { index, available });
        }
        self.subsong = index;
        log::debug!("module: subsong {index} selected");
        Ok(())
    }

    /// Metadata of the loaded module.
    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    /// `title|artist|type`.
    pub fn track_info(&self) -> String {
        self.metadata.short_info_line()
    }

    fn unload_module(&mut self) {
        if self.module.take().is_some() {
            log::debug!("module: released previous module");
        }
        self.metadata.clear();
        self.buffer.clear();
        self.subsong = 0;
    }
}

impl<L: ModuleLoader> PlaybackSession for ModuleSession<L> {
    type Sample = f32;

    fn capabilities(&self) -> Capabilities {
        Capabilities::FRAME_PULL
            | Capabilities::SEEK
            | Capabilities::SUBSONGS
            | Capabilities::REPEAT_COUNT
    }

    fn state(&self) -> SessionState {
        if self.module.is_some() {
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
        self.unload_module();
    }

    fn compute(&mut self) -> RenderStatus {
        self.compute_samples()
    }

    fn audio_buffer(&self) -> &AudioBuffer<f32> {
        &self.buffer
    }

    fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    fn position_seconds(&self) -> f64 {
        ModuleSession::position_seconds(self)
    }

    fn duration_seconds(&self) -> f64 {
        ModuleSession::duration_seconds(self)
    }

    fn seek_seconds(&mut self, seconds: f64) {
        if let Err(err) = self.set_position_seconds(seconds) {
            log::debug!("module: seek ignored: {err}");
        }
    }

    fn rewind(&mut self) {
        if let Err(err) = ModuleSession::rewind(self) {
            log::debug!("module: rewind ignored: {err}");
        }
    }

    fn subsong_count(&self) -> usize {
        ModuleSession::subsong_count(self)
    }

    fn set_subsong(&mut self, index: usize) -> modbridge_common::Result<()> {
        ModuleSession::set_subsong(self, index).map_err(SessionError::from)
    }
}
