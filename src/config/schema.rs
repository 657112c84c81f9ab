use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cassette/config.toml` or `~/.config/cassette/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CASSETTE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume applied at startup, in `[0, 1]`.
    pub initial_volume: f32,
    /// How often the progress monitor samples the clock (milliseconds).
    pub poll_interval_ms: u64,
    /// Upper bound on waiting for a progress monitor to exit (milliseconds).
    pub join_timeout_ms: u64,
    /// Volume change per key press.
    pub volume_step: f32,
    /// Start the next track when the current one finishes.
    pub auto_advance: bool,
    /// How elapsed time is measured for the progress bar.
    pub progress_clock: ProgressClockSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
            poll_interval_ms: 100,
            join_timeout_ms: 1000,
            volume_step: 0.05,
            auto_advance: false,
            progress_clock: ProgressClockSetting::Wall,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressClockSetting {
    /// Wall-clock time since the track started, pauses included.
    #[serde(alias = "wall-clock", alias = "wall_clock")]
    Wall,
    /// Time actually spent playing, pauses excluded.
    #[serde(alias = "play-time", alias = "play_time")]
    Played,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory scanned for tracks when `songs` is empty.
    pub dir: Option<PathBuf>,
    /// Explicit track list. Must have the same length as `covers`.
    pub songs: Vec<PathBuf>,
    /// Cover images paired with `songs` by index.
    pub covers: Vec<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub audio_extensions: Vec<String>,
    /// File extensions to treat as cover images (case-insensitive, without dot).
    pub cover_extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            dir: None,
            songs: Vec::new(),
            covers: Vec::new(),
            audio_extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            cover_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            follow_links: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered in the header box.
    pub title: String,
    /// Progress gauge colour, as understood by `ratatui::style::Color::from_str`
    /// (named colours or `#rrggbb`).
    pub progress_color: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: " Music Player ".to_string(),
            progress_color: "#32a85a".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default `tracing` filter directive; `CASSETTE_LOG` takes precedence.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/cassette/cassette.log`.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
