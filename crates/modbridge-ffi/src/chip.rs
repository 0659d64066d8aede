//! Flat surface over the tick-accumulator chip session.

use std::ffi::{CStr, c_char};

use modbridge_chip::{ChipBackend, ChipSession};
use modbridge_common::{
    Capabilities, DEFAULT_CHIP_SAMPLE_RATE, PlaybackSession, STATUS_ERROR, SessionConfig,
    SessionError, SessionSlot, SessionState, status_code,
};

use crate::info::InfoBuffer;
use crate::raw::{bytes_from_raw, str_from_raw};
use crate::{CHIP_INFO_CAPACITY, clamp_u32};

/// Status-code surface for a chip backend.
///
/// Every call is valid at any time. Before `init` and after `teardown`,
/// queries return zero, null or the fallback refresh rate and commands
/// return [`STATUS_ERROR`].
pub struct ChipSurface<B: ChipBackend> {
    backend: B,
    config: SessionConfig,
    slot: SessionSlot<ChipSession<B::Chip>>,
    info: InfoBuffer,
}

impl<B: ChipBackend> ChipSurface<B> {
    /// Surface with the default chip configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SessionConfig::chip())
    }

    /// Surface with a custom configuration; `init` replaces its rate.
    pub fn with_config(backend: B, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            slot: SessionSlot::new(),
            info: InfoBuffer::new(CHIP_INFO_CAPACITY),
        }
    }

    /// Tear down any session and start a fresh one at `sample_rate`
    /// (non-positive selects 49716 Hz).
    pub fn init(&mut self, sample_rate: i32) -> i32 {
        self.info.clear();
        let config = self.config.with_sample_rate(sample_rate, DEFAULT_CHIP_SAMPLE_RATE);
        let backend = &self.backend;
        let result = self
            .slot
            .init_with(|| ChipSession::new(backend, config).map_err(SessionError::from));
        if let Err(err) = &result {
            log::warn!("chip surface: init failed: {err}");
        }
        status_code(&result)
    }

    /// Release the session, its chip and every registered file.
    pub fn teardown(&mut self) {
        if self.slot.teardown() {
            log::debug!("chip surface: torn down");
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

    /// Register a companion file.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> i32 {
        let Some(session) = self.slot.get_mut() else {
            return STATUS_ERROR;
        };
        let result = session.add_file(name, data);
        if let Err(err) = &result {
            log::warn!("chip surface: add_file rejected: {err}");
        }
        status_code(&result)
    }

    /// [`add_file`](Self::add_file) from raw host pointers.
    ///
    /// # Safety
    ///
    /// `name` must be null or a NUL-terminated string; `data` must be null or
    /// valid for reads of `len` bytes.
    pub unsafe fn add_file_raw(&mut self, name: *const c_char, data: *const u8, len: i32) -> i32 {
        // SAFETY: forwarded caller contract.
        let (name, data) = unsafe { (str_from_raw(name), bytes_from_raw(data, len)) };
        match (name, data) {
            (Some(name), Some(data)) => self.add_file(name, data),
            _ => STATUS_ERROR,
        }
    }

    /// Load `name` as the current track.
    pub fn load_file(&mut self, name: &str, data: &[u8]) -> i32 {
        let Some(session) = self.slot.get_mut() else {
            log::warn!("chip surface: load_file before init");
            return STATUS_ERROR;
        };
        let result = session.load_file(name, data);
        status_code(&result)
    }

    /// [`load_file`](Self::load_file) from raw host pointers.
    ///
    /// # Safety
    ///
    /// Same contract as [`add_file_raw`](Self::add_file_raw).
    pub unsafe fn load_file_raw(&mut self, name: *const c_char, data: *const u8, len: i32) -> i32 {
        // SAFETY: forwarded caller contract.
        let (name, data) = unsafe { (str_from_raw(name), bytes_from_raw(data, len)) };
        match (name, data) {
            (Some(name), Some(data)) => self.load_file(name, data),
            _ => STATUS_ERROR,
        }
    }

    /// Render the next block: `0` playing, `1` ended.
    pub fn compute_samples(&mut self) -> i32 {
        self.slot.compute().code()
    }

    /// Interleaved i16 block, or null before `init`.
    pub fn audio_buffer(&self) -> *const i16 {
        self.slot
            .get()
            .map_or(std::ptr::null(), |session| session.audio_buffer().as_ptr())
    }

    /// Byte length of the valid part of the block.
    pub fn audio_buffer_byte_length(&self) -> i32 {
        self.slot.get().map_or(0, |session| {
            i32::try_from(session.audio_buffer().valid_byte_len()).unwrap_or(i32::MAX)
        })
    }

    /// Elapsed milliseconds.
    pub fn position_ms(&self) -> u32 {
        self.slot.get().map_or(0, |session| clamp_u32(session.position_ms()))
    }

    /// Length of the current subsong in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        self.slot.get().map_or(0, |session| clamp_u32(session.duration_ms()))
    }

    /// Jump to `ms`.
    pub fn seek_ms(&mut self, ms: u32) -> i32 {
        self.slot
            .get_mut()
            .map_or(STATUS_ERROR, |session| status_code(&session.seek_ms(u64::from(ms))))
    }

    /// `title|author|type|description`, empty before a load.
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

    /// Restart the current subsong.
    pub fn rewind(&mut self) -> i32 {
        self.slot
            .get_mut()
            .map_or(STATUS_ERROR, |session| status_code(&session.rewind()))
    }

    /// Ticks advanced since the last load, rewind or seek.
    pub fn current_tick(&self) -> u64 {
        self.slot.get().map_or(0, |session| session.current_tick())
    }

    /// Current tick rate in Hz.
    pub fn refresh_rate_hz(&self) -> f32 {
        self.slot
            .get()
            .map_or(self.config.default_refresh_hz, |session| session.refresh_rate_hz())
    }

    /// Set the loop flag. It is kept across `init`.
    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.config.loop_enabled = enabled;
        if let Some(session) = self.slot.get_mut() {
            session.set_loop_enabled(enabled);
        }
    }

    /// Current loop flag.
    pub fn loop_enabled(&self) -> bool {
        self.config.loop_enabled
    }

    /// Typed access to the live session.
    pub fn session(&self) -> Option<&ChipSession<B::Chip>> {
        self.slot.get()
    }
}

impl<B: ChipBackend> Drop for ChipSurface<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbridge_chip::{PlayerRegistry, SilentChip};
    use modbridge_common::STATUS_OK;

    struct NoPlayers;

    impl ChipBackend for NoPlayers {
        type Chip = SilentChip;

        fn create_chip(&self, _: u32) -> modbridge_chip::Result<SilentChip> {
            Ok(SilentChip)
        }

        fn players(&self) -> PlayerRegistry {
            PlayerRegistry::new()
        }
    }

    #[test]
    fn sentinels_before_init() {
        let mut surface = ChipSurface::new(NoPlayers);
        assert_eq!(surface.state(), SessionState::Uninitialized);
        assert_eq!(surface.compute_samples(), 1);
        assert!(surface.audio_buffer().is_null());
        assert_eq!(surface.audio_buffer_byte_length(), 0);
        assert_eq!(surface.sample_rate(), 0);
        assert_eq!(surface.add_file("a.bnk", b"bank"), STATUS_ERROR);
        assert_eq!(surface.load_file("a.d00", b"data"), STATUS_ERROR);
        assert_eq!(surface.seek_ms(10), STATUS_ERROR);
        assert_eq!(surface.refresh_rate_hz(), 70.0);
        assert!(surface.track_info().is_empty());
        assert!(surface.capabilities().is_empty());
    }

    #[test]
    fn init_selects_rate() {
        let mut surface = ChipSurface::new(NoPlayers);
        assert_eq!(surface.init(0), STATUS_OK);
        assert_eq!(surface.sample_rate(), 49_716);
        assert_eq!(surface.init(44_100), STATUS_OK);
        assert_eq!(surface.sample_rate(), 44_100);
        assert!(surface.capabilities().contains(Capabilities::AUX_FILES));
    }
}
