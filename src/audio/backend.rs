use std::path::Path;
use std::time::Duration;

use super::types::AudioError;

/// Transport commands the player issues to the audio output.
///
/// All calls happen on the UI thread. `load` only prepares a track; nothing is
/// audible until `play`.
pub trait AudioBackend {
    /// Prepare `path` for playback, stopping whatever was playing.
    fn load(&mut self, path: &Path) -> Result<(), AudioError>;
    /// Start the loaded track. `loops` extra repetitions follow the first pass.
    fn play(&mut self, loops: u32) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);
    /// `volume` is already clamped into `[0, 1]` by the caller.
    fn set_volume(&mut self, volume: f32);
    /// True while a track is loaded and not finished or stopped, paused or not.
    fn is_busy(&self) -> bool;
    /// Shut the output down. Further commands are no-ops or errors.
    fn release(&mut self);
}

/// Reports the total length of an audio file.
///
/// Called from the progress monitor thread, hence `Send + Sync`.
pub trait DurationProbe: Send + Sync {
    fn duration(&self, path: &Path) -> Result<Duration, AudioError>;
}
