use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cassette_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", "/tmp/cassette-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/cassette-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("cassette")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cassette")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/state")
            .join("cassette")
            .join("cassette.log")
    );

    let _g3 = EnvGuard::set("XDG_STATE_HOME", "/tmp/state");
    assert_eq!(
        default_log_path().unwrap(),
        PathBuf::from("/tmp/state/cassette/cassette.log")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.playback.poll_interval_ms, 100);
    assert_eq!(s.playback.join_timeout_ms, 1000);
    assert_eq!(s.playback.progress_clock, ProgressClockSetting::Wall);
    assert!(!s.playback.auto_advance);
}

#[test]
fn validate_rejects_mismatched_track_lists() {
    let mut s = Settings::default();
    s.library.songs = vec!["a.mp3".into(), "b.mp3".into()];
    s.library.covers = vec!["a.jpg".into()];
    let err = s.validate().unwrap_err();
    assert!(err.contains("same length"), "{err}");
}

#[test]
fn validate_rejects_zero_poll_interval_and_bad_volume() {
    let mut s = Settings::default();
    s.playback.poll_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume_step = 0.0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_zero_join_timeout() {
    let mut s = Settings::default();
    s.playback.join_timeout_ms = 0;
    let err = s.validate().unwrap_err();
    assert!(err.contains("join_timeout_ms"), "{err}");

    s.playback.join_timeout_ms = 1;
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
initial_volume = 0.25
poll_interval_ms = 40
join_timeout_ms = 300
auto_advance = true
progress_clock = "play-time"

[library]
songs = ["audio/lofi.mp3", "audio/sad_guitar.mp3"]
covers = ["image/pic 2.jpeg", "image/guitar.jpg"]
cover_extensions = ["png"]

[ui]
title = "hello"
progress_color = "green"

[log]
level = "debug"
file = "/tmp/cassette.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CASSETTE__PLAYBACK__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert!((s.playback.initial_volume - 0.25).abs() < f32::EPSILON);
    assert_eq!(s.playback.poll_interval_ms, 40);
    assert_eq!(s.playback.join_timeout_ms, 300);
    assert!(s.playback.auto_advance);
    assert_eq!(s.playback.progress_clock, ProgressClockSetting::Played);
    assert_eq!(s.library.songs.len(), 2);
    assert_eq!(s.library.covers[0], PathBuf::from("image/pic 2.jpeg"));
    assert_eq!(s.library.cover_extensions, vec!["png".to_string()]);
    // Untouched keys keep their defaults.
    assert_eq!(s.library.audio_extensions.len(), 4);
    assert_eq!(s.ui.title, "hello");
    assert_eq!(s.ui.progress_color, "green");
    assert_eq!(s.log.level, "debug");
    assert_eq!(s.log.file, Some(PathBuf::from("/tmp/cassette.log")));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CASSETTE__PLAYBACK__POLL_INTERVAL_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.poll_interval_ms, 50);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("does-not-exist.toml");
    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CASSETTE__PLAYBACK__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.poll_interval_ms, 100);
    assert!(s.library.songs.is_empty());
}
