mod common;

use approx::assert_relative_eq;
use common::HoldLoader;
use modbridge_common::{Capabilities, SessionConfig, SessionState};
use modbridge_ffi::{ModuleSurface, STATUS_ERROR, STATUS_OK};

fn ready_surface() -> ModuleSurface<HoldLoader> {
    let mut surface = ModuleSurface::new(HoldLoader);
    assert_eq!(surface.init(0), STATUS_OK);
    surface
}

#[test]
fn plays_once_and_reports_end() {
    let mut surface = ready_surface();
    assert_eq!(surface.sample_rate(), 48_000);
    assert_eq!(surface.load_file("elysium.mod", b"M.K.\x01"), STATUS_OK);
    assert_eq!(surface.track_info().to_str().unwrap(), "Elysium|Jester|ProTracker MOD");
    assert_relative_eq!(surface.duration_seconds(), 1.0);

    let mut blocks = 0;
    while surface.compute_samples() == 0 {
        blocks += 1;
        assert!(blocks < 1000, "module never ended");
    }
    // 48000 frames in blocks of 1024.
    assert_eq!(blocks, 47);
    assert_eq!(surface.audio_buffer_frame_count(), 0);
    assert_relative_eq!(surface.position_seconds(), 1.0);
}

#[test]
fn infinite_repeat_never_ends() {
    let mut surface = ready_surface();
    surface.set_repeat_count(-1);
    assert_eq!(surface.load_file("elysium.mod", b"M.K.\x01"), STATUS_OK);

    for _ in 0..2_000 {
        assert_eq!(surface.compute_samples(), 0);
        assert_eq!(surface.audio_buffer_frame_count(), 1024);
    }
    let samples = unsafe { std::slice::from_raw_parts(surface.audio_buffer(), 2048) };
    assert!(samples.iter().all(|&sample| sample == 0.5));
}

#[test]
fn repeat_count_persists_across_init() {
    let mut surface = ModuleSurface::new(HoldLoader);
    surface.set_repeat_count(-3);
    assert_eq!(surface.repeat_count(), -1);

    assert_eq!(surface.init(44_100), STATUS_OK);
    assert_eq!(surface.load_file("elysium.mod", b"M.K.\x01"), STATUS_OK);
    assert_eq!(
        surface.session().unwrap().repeat_count(),
        modbridge_module::RepeatCount::Infinite
    );

    surface.set_repeat_count(0);
    let mut blocks = 0;
    while surface.compute_samples() == 0 {
        blocks += 1;
        assert!(blocks < 1000, "module never ended");
    }
}

#[test]
fn seek_and_rewind() {
    let mut surface = ready_surface();
    assert_eq!(surface.set_position_seconds(0.5), STATUS_ERROR);
    assert_eq!(surface.rewind(), STATUS_ERROR);

    surface.load_file("elysium.mod", b"M.K.\x04");
    assert_eq!(surface.set_position_seconds(2.5), STATUS_OK);
    assert_relative_eq!(surface.position_seconds(), 2.5);
    assert_eq!(surface.rewind(), STATUS_OK);
    assert_relative_eq!(surface.position_seconds(), 0.0);
}

#[test]
fn failed_loads() {
    let mut surface = ready_surface();
    assert_eq!(surface.load_file("elysium.mod", b"M.K.\x02"), STATUS_OK);

    let data = b"M.K.\x01";
    unsafe {
        assert_eq!(surface.load_file_raw(c"x.mod".as_ptr(), std::ptr::null(), 5), STATUS_ERROR);
        assert_eq!(surface.load_file_raw(c"x.mod".as_ptr(), data.as_ptr(), 0), STATUS_ERROR);
    }
    assert_eq!(surface.state(), SessionState::Loaded);
    assert_relative_eq!(surface.duration_seconds(), 2.0);

    assert_eq!(surface.load_file("notes.txt", b"plain text"), STATUS_ERROR);
    assert_eq!(surface.state(), SessionState::Ready);
    assert_eq!(surface.track_info().to_str().unwrap(), "||");
    assert_eq!(surface.compute_samples(), 1);
}

#[test]
fn raw_load_accepts_null_name() {
    let mut surface = ready_surface();
    let data = b"M.K.\x01";
    let status = unsafe { surface.load_file_raw(std::ptr::null(), data.as_ptr(), 5) };
    assert_eq!(status, STATUS_OK);
    assert_eq!(surface.subsong_count(), 1);
    assert_eq!(surface.set_subsong(0), STATUS_OK);
    assert_eq!(surface.set_subsong(1), STATUS_ERROR);
}

#[test]
fn lifecycle_sentinels() {
    let mut surface = ModuleSurface::new(HoldLoader);
    assert!(surface.audio_buffer().is_null());
    assert_eq!(surface.compute_samples(), 1);
    assert_eq!(surface.sample_rate(), 0);
    assert_eq!(surface.load_file("elysium.mod", b"M.K.\x01"), STATUS_ERROR);
    assert!(surface.capabilities().is_empty());
    assert!(surface.track_info_json().is_none());

    assert_eq!(surface.init(0), STATUS_OK);
    assert!(surface.capabilities().contains(Capabilities::REPEAT_COUNT));
    assert_eq!(surface.init(0), STATUS_OK);
    surface.teardown();
    surface.teardown();
    assert_eq!(surface.state(), SessionState::Uninitialized);
    assert_relative_eq!(surface.position_seconds(), 0.0);
}

#[test]
fn non_positive_rate_selects_48k() {
    let config = SessionConfig {
        sample_rate: 32_000,
        ..SessionConfig::module()
    };
    let mut surface = ModuleSurface::with_config(HoldLoader, config);
    assert_eq!(surface.init(0), STATUS_OK);
    assert_eq!(surface.sample_rate(), 48_000);
    assert_eq!(surface.init(44_100), STATUS_OK);
    assert_eq!(surface.sample_rate(), 44_100);
}
