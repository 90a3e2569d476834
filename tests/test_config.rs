use std::path::Path;
use std::time::Duration;

use downtime_dash::clock::{clamp_dt, FrameClock, MAX_FRAME_DT};
use downtime_dash::config::Config;
use downtime_dash::error::ConfigError;

#[test]
fn defaults() {
    let c = Config::default();
    assert_eq!(c.fps, 60);
    assert_eq!(c.top_n, 10);
    assert!(c.sound);
    assert_eq!(c.seed, None);
    assert_eq!(c.log_level, "info");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let c = Config::parse("fps = 30\nseed = 7\n", Path::new("test.toml")).unwrap();
    assert_eq!(c.fps, 30);
    assert_eq!(c.seed, Some(7));
    assert_eq!(c.top_n, 10);
    assert!(c.sound);
}

#[test]
fn explicit_leaderboard_path_wins() {
    let c = Config::parse("leaderboard_path = \"/tmp/board.json\"", Path::new("c.toml")).unwrap();
    assert_eq!(c.leaderboard_path(), Path::new("/tmp/board.json"));
}

#[test]
fn malformed_file_is_an_error() {
    let err = Config::parse("fps = \"fast\"", Path::new("bad.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let c = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(c, Config::default());
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "sound = false\ntop_n = 5\n").unwrap();
    let c = Config::load(Some(&path)).unwrap();
    assert!(!c.sound);
    assert_eq!(c.top_n, 5);
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[test]
fn long_frames_are_clamped() {
    assert_eq!(clamp_dt(1.0), MAX_FRAME_DT);
    assert_eq!(clamp_dt(0.01), 0.01);
    assert_eq!(clamp_dt(-0.5), 0.0);
    assert_eq!(clamp_dt(f32::NAN), 0.0);
}

#[test]
fn frame_budget_follows_fps() {
    assert_eq!(FrameClock::new(50).frame_budget(), Duration::from_millis(20));
    assert_eq!(FrameClock::new(1).frame_budget(), Duration::from_millis(100));
}

#[test]
fn delta_is_never_above_max() {
    let mut clock = FrameClock::new(60);
    std::thread::sleep(Duration::from_millis(80));
    assert_eq!(clock.delta(), MAX_FRAME_DT);
    assert!(clock.delta() <= MAX_FRAME_DT);
}
