//! Display collaborator: what the player wants shown on screen.
//!
//! The controller and the progress monitor write through `NowPlayingView`;
//! the terminal UI reads a `ViewState` snapshot once per frame.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Sink for everything the player displays.
///
/// Implementations must tolerate calls from the progress monitor thread.
pub trait NowPlayingView: Send + Sync {
    fn set_progress(&self, progress: f32);
    fn set_cover_image(&self, cover: Option<&Path>);
    fn set_track_label(&self, label: &str);
    fn set_button_label(&self, label: &str);
    fn set_volume_level(&self, volume: f32);
    /// A one-line message such as a load error; `None` clears it.
    fn set_status(&self, status: Option<String>);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub progress: f32,
    pub cover: Option<PathBuf>,
    pub track_label: String,
    pub button_label: String,
    pub volume: f32,
    pub status: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            cover: None,
            track_label: String::new(),
            button_label: "Play".to_string(),
            volume: 0.0,
            status: None,
        }
    }
}

/// `NowPlayingView` backed by a mutex-guarded `ViewState`.
///
/// Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    state: Arc<Mutex<ViewState>>,
}

impl SharedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState {
        match self.state.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        // A panic elsewhere must not take the display down with it.
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}

impl NowPlayingView for SharedView {
    fn set_progress(&self, progress: f32) {
        self.update(|s| s.progress = progress.clamp(0.0, 1.0));
    }

    fn set_cover_image(&self, cover: Option<&Path>) {
        self.update(|s| s.cover = cover.map(Path::to_path_buf));
    }

    fn set_track_label(&self, label: &str) {
        self.update(|s| s.track_label = label.to_string());
    }

    fn set_button_label(&self, label: &str) {
        self.update(|s| s.button_label = label.to_string());
    }

    fn set_volume_level(&self, volume: f32) {
        self.update(|s| s.volume = volume);
    }

    fn set_status(&self, status: Option<String>) {
        self.update(|s| s.status = status);
    }
}
