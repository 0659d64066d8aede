//! Flat surface over the frame-pull module session.

use std::ffi::{CStr, c_char};

use modbridge_common::{
    Capabilities, DEFAULT_MODULE_SAMPLE_RATE, PlaybackSession, STATUS_ERROR, SessionConfig,
    SessionError, SessionSlot, SessionState, status_code,
};
use modbridge_module::{ModuleLoader, ModuleSession, RepeatCount};

use crate::MODULE_INFO_CAPACITY;
use crate::info::InfoBuffer;
use crate::raw::{bytes_from_raw, str_from_raw};

/// Status-code surface for a tracker module loader.
///
/// The repeat count lives on the surface: it survives `init` and every
/// load, and is applied to each new module.
pub struct ModuleSurface<L: ModuleLoader + Clone> {
    loader: L,
    config: SessionConfig,
    slot: SessionSlot<ModuleSession<L>>,
    info: InfoBuffer,
}

impl<L: ModuleLoader + Clone> ModuleSurface<L> {
    /// Surface with the default module configuration.
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, SessionConfig::module())
    }

    /// Surface with a custom configuration; `init` only overrides its rate.
    pub fn with_config(loader: L, config: SessionConfig) -> Self {
        Self {
            loader,
            config,
            slot: SessionSlot::new(),
            info: InfoBuffer::new(MODULE_INFO_CAPACITY),
        }
    }

    /// Tear down any session and start a fresh one at `sample_rate`
    /// (non-positive selects 48000 Hz).
    pub fn init(&mut self, sample_rate: i32) -> i32 {
        self.info.clear();
        let config = self.config.with_sample_rate(sample_rate, DEFAULT_MODULE_SAMPLE_RATE);
        let loader = self.loader.clone();
        let result = self
            .slot
            .init_with(|| ModuleSession::new(loader, config).map_err(SessionError::from));
        if let Err(err) = &result {
            log::warn!("module surface: init failed: {err}");
        }
        status_code(&result)
    }

    /// Release the session and its module.
    pub fn teardown(&mut self) {
        if self.slot.teardown() {
            log::debug!("module surface: torn down");
        }
        self.info.clear();
    }

    /// Lifecycle stage.
    pub fn state(&self) -> SessionState {
        self.slot.state()
    }

    /// Backend features, empty before `init`.
    pub fn capabilities(&self) -> Capabilities {
        self.slot
            .get()
            .map_or(Capabilities::empty(), |session| session.capabilities())
    }

    /// Decode `data` as the current module.
    pub fn load_file(&mut self, name: &str, data: &[u8]) -> i32 {
        let Some(session) = self.slot.get_mut() else {
            log::warn!("module surface: load_file before init");
            return STATUS_ERROR;
        };
        status_code(&session.load_file(name, data))
    }

    /// [`load_file`](Self::load_file) from raw host pointers. A null name is
    /// accepted and treated as empty.
    ///
    /// # Safety
    ///
    /// `name` must be null or a NUL-terminated string; `data` must be null or
    /// valid for reads of `len` bytes.
    pub unsafe fn load_file_raw(&mut self, name: *const c_char, data: *const u8, len: i32) -> i32 {
        // SAFETY: forwarded caller contract.
        let (name, data) = unsafe { (str_from_raw(name), bytes_from_raw(data, len)) };
        match data {
            Some(data) => self.load_file(name.unwrap_or_default(), data),
            None => STATUS_ERROR,
        }
    }

    /// Render the next block: `0` playing, `1` ended.
    pub fn compute_samples(&mut self) -> i32 {
        self.slot.compute().code()
    }

    /// Interleaved f32 block, or null before `init`.
    pub fn audio_buffer(&self) -> *const f32 {
        self.slot
            .get()
            .map_or(std::ptr::null(), |session| session.audio_buffer().as_ptr())
    }

    /// Frames produced by the last render.
    pub fn audio_buffer_frame_count(&self) -> i32 {
        self.slot.get().map_or(0, |session| {
            i32::try_from(session.audio_buffer_frame_count()).unwrap_or(i32::MAX)
        })
    }

    /// Decoder position in seconds.
    pub fn position_seconds(&self) -> f64 {
        self.slot
            .get()
            .map_or(0.0, |session| session.position_seconds())
    }

    /// Length of the current subsong in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.slot
            .get()
            .map_or(0.0, |session| session.duration_seconds())
    }

    /// Seek to `seconds`.
    pub fn set_position_seconds(&mut self, seconds: f64) -> i32 {
        self.slot.get_mut().map_or(STATUS_ERROR, |session| {
            status_code(&session.set_position_seconds(seconds))
        })
    }

    /// `title|artist|type`, empty before a load.
    pub fn track_info(&mut self) -> &CStr {
        match self.slot.get() {
            Some(session) => self.info.write(&session.track_info()),
            None => self.info.write(""),
        }
    }

    /// Track metadata as a JSON object.
    pub fn track_info_json(&self) -> Option<String> {
        let session = self.slot.get()?;
        serde_json::to_string(session.metadata()).ok()
    }

    /// Set the repeat count: `-1` (or any negative) infinite, `0` none,
    /// `n` extra plays.
    pub fn set_repeat_count(&mut self, count: i32) {
        let repeat = RepeatCount::from_raw(count);
        self.config.repeat_count = repeat.to_raw();
        if let Some(session) = self.slot.get_mut() {
            session.set_repeat_count(repeat);
        }
    }

    /// Current repeat count in the host convention.
    pub fn repeat_count(&self) -> i32 {
        self.config.repeat_count
    }

    /// Back to the start.
    pub fn rewind(&mut self) -> i32 {
        self.slot
            .get_mut()
            .map_or(STATUS_ERROR, |session| status_code(&session.rewind()))
    }

    /// Number of subsongs.
    pub fn subsong_count(&self) -> i32 {
        self.slot.get().map_or(0, |session| {
            i32::try_from(session.subsong_count()).unwrap_or(i32::MAX)
        })
    }

    /// Switch to subsong `index` (0-based).
    pub fn set_subsong(&mut self, index: i32) -> i32 {
        let (Some(session), Ok(index)) = (self.slot.get_mut(), usize::try_from(index)) else {
            return STATUS_ERROR;
        };
        status_code(&session.set_subsong(index))
    }

    /// Output sample rate, `0` before `init`.
    pub fn sample_rate(&self) -> i32 {
        self.slot.get().map_or(0, |session| {
            i32::try_from(session.sample_rate()).unwrap_or(i32::MAX)
        })
    }

    /// Typed access to the live session.
    pub fn session(&self) -> Option<&ModuleSession<L>> {
        self.slot.get()
    }
}

impl<L: ModuleLoader + Clone> Drop for ModuleSurface<L> {
    fn drop(&mut self) {
        self.teardown();
    }
}
