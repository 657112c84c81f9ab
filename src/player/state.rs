/// Playback state owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Position in the track list.
    pub index: usize,
    /// True between a successful play/resume and the next pause/stop.
    pub playing: bool,
    /// False once shutdown has started.
    pub running: bool,
    /// Output volume in `[0, 1]`.
    pub volume: f32,
}

impl PlaybackState {
    pub fn new(volume: f32) -> Self {
        Self {
            index: 0,
            playing: false,
            running: true,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Label for the play/pause button: what pressing it would do.
    pub fn button_label(&self) -> &'static str {
        if self.playing { "Pause" } else { "Play" }
    }
}
