mod common;

use approx::assert_relative_eq;
use common::{BrokenOpl, FakeOpl, d00};
use modbridge_common::{SessionConfig, SessionState};
use modbridge_ffi::{ChipSurface, STATUS_ERROR, STATUS_OK};

fn ready_surface() -> ChipSurface<FakeOpl> {
    let mut surface = ChipSurface::new(FakeOpl);
    assert_eq!(surface.init(49_716), STATUS_OK);
    surface
}

#[test]
fn d00_plays_until_ended() {
    let mut surface = ready_surface();
    assert_eq!(surface.load_file("dune.d00", &d00(100)), STATUS_OK);
    assert_eq!(
        surface.track_info().to_str().unwrap(),
        "Dune|Stephane Picq|EdLib packed|Arrakis"
    );
    // 99 playing ticks at 50 Hz.
    assert_eq!(surface.duration_ms(), 1980);

    let mut frames = 0u64;
    let mut blocks = 0;
    loop {
        let status = surface.compute_samples();
        frames += (surface.audio_buffer_byte_length() / 4) as u64;
        blocks += 1;
        if status == 1 {
            break;
        }
        assert!(blocks < 10_000, "song never ended");
    }

    let expected_ms = (frames as f64 * 1000.0 / 49_716.0).round() as u32;
    assert_eq!(surface.position_ms(), expected_ms);
    assert_eq!(surface.current_tick(), 100);
    // Ended stays ended.
    assert_eq!(surface.compute_samples(), 1);
}

#[test]
fn buffer_holds_rendered_samples() {
    let mut surface = ready_surface();
    surface.load_file("dune.d00", &d00(100));
    assert_eq!(surface.compute_samples(), 0);
    assert_eq!(surface.audio_buffer_byte_length(), 512 * 4);

    let samples = unsafe { std::slice::from_raw_parts(surface.audio_buffer(), 1024) };
    assert!(samples.iter().all(|&sample| sample == 1));
}

#[test]
fn uppercase_bank_satisfies_lowercase_reference() {
    let mut surface = ready_surface();
    assert_eq!(surface.add_file("STANDARD.BNK", &[7]), STATUS_OK);
    assert_eq!(surface.load_file("music/theme.rol", b"BNK?"), STATUS_OK);
    assert_eq!(surface.track_info().to_str().unwrap(), "||AdLib Visual Composer|");
    assert_relative_eq!(surface.refresh_rate_hz(), 70.0);

    surface.compute_samples();
    let first = unsafe { *surface.audio_buffer() };
    assert_eq!(first, 7);
}

#[test]
fn rol_without_bank_fails() {
    let mut surface = ready_surface();
    assert_eq!(surface.load_file("theme.rol", b"BNK?"), STATUS_ERROR);
    assert_eq!(surface.state(), SessionState::Ready);
    assert_eq!(surface.compute_samples(), 1);
    assert_eq!(surface.audio_buffer_byte_length(), 0);
}

#[test]
fn null_and_empty_loads_change_nothing() {
    let mut surface = ready_surface();
    assert_eq!(surface.load_file("dune.d00", &d00(100)), STATUS_OK);
    surface.compute_samples();
    let position = surface.position_ms();

    let name = c"dune.d00";
    let data = d00(100);
    unsafe {
        assert_eq!(surface.load_file_raw(name.as_ptr(), std::ptr::null(), 4), STATUS_ERROR);
        assert_eq!(surface.load_file_raw(name.as_ptr(), data.as_ptr(), 0), STATUS_ERROR);
        assert_eq!(surface.load_file_raw(std::ptr::null(), data.as_ptr(), 4), STATUS_ERROR);
        assert_eq!(surface.add_file_raw(name.as_ptr(), data.as_ptr(), -1), STATUS_ERROR);
    }
    assert_eq!(surface.load_file("dune.d00", &[]), STATUS_ERROR);

    assert_eq!(surface.state(), SessionState::Loaded);
    assert_eq!(surface.position_ms(), position);
    assert!(surface.track_info().to_str().unwrap().starts_with("Dune|"));
}

#[test]
fn raw_load_matches_slice_load() {
    let mut surface = ready_surface();
    let name = c"dune.d00";
    let data = d00(20);
    let status = unsafe { surface.load_file_raw(name.as_ptr(), data.as_ptr(), data.len() as i32) };
    assert_eq!(status, STATUS_OK);
    assert_eq!(surface.duration_ms(), 380);
}

#[test]
fn unrecognized_load_tears_down_previous_track() {
    let mut surface = ready_surface();
    surface.load_file("dune.d00", &d00(100));
    assert_eq!(surface.load_file("notes.txt", b"hello"), STATUS_ERROR);

    assert_eq!(surface.state(), SessionState::Ready);
    assert_eq!(surface.track_info().to_str().unwrap(), "|||");
    assert_eq!(surface.duration_ms(), 0);
    assert_eq!(surface.compute_samples(), 1);
}

#[test]
fn init_and_teardown_are_idempotent() {
    let mut surface = ChipSurface::new(FakeOpl);
    surface.teardown();
    assert_eq!(surface.init(-5), STATUS_OK);
    assert_eq!(surface.sample_rate(), 49_716);
    assert_eq!(surface.add_file("standard.bnk", &[3]), STATUS_OK);

    // Re-init drops every registered file.
    assert_eq!(surface.init(22_050), STATUS_OK);
    assert_eq!(surface.sample_rate(), 22_050);
    assert_eq!(surface.load_file("theme.rol", b"BNK?"), STATUS_ERROR);

    surface.teardown();
    surface.teardown();
    assert_eq!(surface.state(), SessionState::Uninitialized);
    assert!(surface.audio_buffer().is_null());
    assert_eq!(surface.compute_samples(), 1);
    assert_eq!(surface.position_ms(), 0);
}

#[test]
fn engine_failure_leaves_surface_uninitialized() {
    let mut surface = ChipSurface::new(BrokenOpl);
    assert_eq!(surface.init(44_100), STATUS_ERROR);
    assert_eq!(surface.state(), SessionState::Uninitialized);
    assert_eq!(surface.load_file("dune.d00", &d00(10)), STATUS_ERROR);
}

#[test]
fn rewind_and_seek_retarget_position() {
    let mut surface = ready_surface();
    surface.load_file("dune.d00", &d00(200));
    for _ in 0..20 {
        surface.compute_samples();
    }
    assert!(surface.position_ms() > 0);

    assert_eq!(surface.rewind(), STATUS_OK);
    assert_eq!(surface.position_ms(), 0);
    assert_eq!(surface.current_tick(), 0);

    assert_eq!(surface.seek_ms(1000), STATUS_OK);
    assert_eq!(surface.position_ms(), 1000);
    assert_eq!(surface.current_tick(), 50);
}

#[test]
fn loop_flag_survives_init() {
    let mut surface = ChipSurface::new(FakeOpl);
    surface.set_loop_enabled(true);
    assert!(surface.loop_enabled());
    assert_eq!(surface.init(0), STATUS_OK);
    assert!(surface.session().unwrap().loop_enabled());

    surface.set_loop_enabled(false);
    assert!(!surface.session().unwrap().loop_enabled());
}

#[test]
fn subsong_calls_on_single_song_track() {
    let mut surface = ready_surface();
    assert_eq!(surface.subsong_count(), 0);
    assert_eq!(surface.set_subsong(0), STATUS_ERROR);

    surface.load_file("dune.d00", &d00(100));
    assert_eq!(surface.subsong_count(), 1);
    assert_eq!(surface.set_subsong(0), STATUS_OK);
    assert_eq!(surface.duration_ms(), 1980);
    assert_eq!(surface.set_subsong(1), STATUS_ERROR);
    assert_eq!(surface.set_subsong(-1), STATUS_ERROR);
}

#[test]
fn configured_surface_and_json_info() {
    let json = r#"{"buffer_frames": 256}"#;
    let config = SessionConfig::from_json(json, SessionConfig::chip()).unwrap();
    let mut surface = ChipSurface::with_config(FakeOpl, config);
    assert_eq!(surface.init(0), STATUS_OK);
    surface.load_file("dune.d00", &d00(100));
    surface.compute_samples();
    assert_eq!(surface.audio_buffer_byte_length(), 256 * 4);

    let json = surface.track_info_json().unwrap();
    assert!(json.contains(r#""title":"Dune""#));
    assert!(json.contains(r#""description":"Arrakis""#));
}

#[test]
fn non_positive_rate_selects_native_rate() {
    let config = SessionConfig {
        sample_rate: 44_100,
        ..SessionConfig::chip()
    };
    let mut surface = ChipSurface::with_config(FakeOpl, config);
    assert_eq!(surface.init(0), STATUS_OK);
    assert_eq!(surface.sample_rate(), 49_716);
    assert_eq!(surface.init(22_050), STATUS_OK);
    assert_eq!(surface.sample_rate(), 22_050);
    assert_eq!(surface.init(-1), STATUS_OK);
    assert_eq!(surface.sample_rate(), 49_716);
}
