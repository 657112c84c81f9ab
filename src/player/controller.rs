//! Playback controller: turns user commands into audio commands, keeps the
//! playback state and owns the progress monitor of the current track.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::audio::{AudioBackend, AudioError, DurationProbe};
use crate::config::{PlaybackSettings, ProgressClockSetting};
use crate::library::{Direction, Track, TrackList};
use crate::view::NowPlayingView;

use super::monitor::{ClockMode, MonitorExit, MonitorHandle, MonitorSpec, SessionClock};
use super::state::PlaybackState;

/// Tunables for the controller, usually derived from `PlaybackSettings`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerOptions {
    pub initial_volume: f32,
    pub poll_interval: Duration,
    pub join_timeout: Duration,
    pub auto_advance: bool,
    pub clock: ClockMode,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self::from(&PlaybackSettings::default())
    }
}

impl From<&PlaybackSettings> for PlayerOptions {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            initial_volume: s.initial_volume,
            poll_interval: Duration::from_millis(s.poll_interval_ms.max(1)),
            join_timeout: Duration::from_millis(s.join_timeout_ms),
            auto_advance: s.auto_advance,
            clock: match s.progress_clock {
                ProgressClockSetting::Wall => ClockMode::Wall,
                ProgressClockSetting::Played => ClockMode::Played,
            },
        }
    }
}

/// The track currently loaded, with its clock and monitor.
struct Session {
    track: PathBuf,
    clock: SessionClock,
    monitor: Option<MonitorHandle>,
    last_exit: Option<MonitorExit>,
}

pub struct Controller<A: AudioBackend> {
    tracks: TrackList,
    audio: A,
    probe: Arc<dyn DurationProbe>,
    view: Arc<dyn NowPlayingView>,
    options: PlayerOptions,
    state: PlaybackState,
    session: Option<Session>,
    live_monitors: Arc<AtomicUsize>,
}

impl<A: AudioBackend> Controller<A> {
    pub fn new(
        tracks: TrackList,
        mut audio: A,
        probe: Arc<dyn DurationProbe>,
        view: Arc<dyn NowPlayingView>,
        options: PlayerOptions,
    ) -> Self {
        let state = PlaybackState::new(options.initial_volume);
        audio.set_volume(state.volume);

        let controller = Self {
            tracks,
            audio,
            probe,
            view,
            options,
            state,
            session: None,
            live_monitors: Arc::new(AtomicUsize::new(0)),
        };
        controller.show_track(&controller.current_track());
        controller.view.set_button_label(controller.state.button_label());
        controller.view.set_volume_level(controller.state.volume);
        controller.view.set_progress(0.0);
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    #[cfg(test)]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Number of progress monitor threads currently running.
    pub fn live_monitors(&self) -> usize {
        self.live_monitors.load(Ordering::SeqCst)
    }

    pub fn current_track(&self) -> Track {
        let index = self.tracks.clamp(self.state.index);
        // `TrackList` is never empty and `index` is in bounds.
        self.tracks.get(index).cloned().unwrap_or_else(|| Track::new("", None))
    }

    /// Load and start the track at the current index.
    ///
    /// Any previous monitor is stopped first. On failure the player is left
    /// idle and the error is shown on the status line.
    pub fn play_current(&mut self) -> Result<(), AudioError> {
        if !self.state.running {
            tracing::debug!("play ignored after shutdown");
            return Ok(());
        }

        self.state.index = self.tracks.clamp(self.state.index);
        self.end_session();

        let track = self.current_track();
        let started = self
            .audio
            .load(&track.audio)
            .and_then(|()| self.audio.play(0));

        self.show_track(&track);
        self.view.set_progress(0.0);

        if let Err(e) = started {
            tracing::error!(track = %track.audio.display(), error = %e, "cannot play track");
            self.audio.stop();
            self.state.playing = false;
            self.view.set_button_label(self.state.button_label());
            self.view
                .set_status(Some(format!("Cannot play {}: {e}", track.label())));
            return Err(e);
        }

        self.audio.set_volume(self.state.volume);
        self.state.playing = true;
        self.view.set_button_label(self.state.button_label());
        self.view.set_status(None);
        tracing::info!(index = self.state.index, track = %track.audio.display(), "playing");

        self.session = Some(Session {
            track: track.audio,
            clock: SessionClock::start(self.options.clock, Instant::now()),
            monitor: None,
            last_exit: None,
        });
        self.spawn_monitor();
        Ok(())
    }

    /// Pause when playing, resume a paused track, or start the current one.
    pub fn toggle_play_pause(&mut self) -> Result<(), AudioError> {
        if !self.state.running {
            return Ok(());
        }

        if self.state.playing {
            self.audio.pause();
            self.state.playing = false;
            self.view.set_button_label(self.state.button_label());
            self.suspend_session();
            tracing::info!("paused");
            return Ok(());
        }

        if self.audio.is_busy() {
            self.audio.unpause();
            self.state.playing = true;
            self.view.set_button_label(self.state.button_label());
            self.resume_session();
            tracing::info!("resumed");
            return Ok(());
        }

        self.play_current()
    }

    /// Stop the current track and play its neighbour, wrapping at either end.
    pub fn skip(&mut self, direction: Direction) -> Result<(), AudioError> {
        if !self.state.running {
            return Ok(());
        }
        self.audio.stop();
        self.state.index = self.tracks.step(self.state.index, direction);
        self.play_current()
    }

    /// Set the output volume, clamped into `[0, 1]`. NaN is ignored.
    ///
    /// Returns the volume now in effect.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if volume.is_nan() {
            tracing::warn!("ignoring NaN volume");
            return self.state.volume;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        self.audio.set_volume(volume);
        self.view.set_volume_level(volume);
        volume
    }

    pub fn nudge_volume(&mut self, delta: f32) -> f32 {
        self.set_volume(self.state.volume + delta)
    }

    /// Detect the end of the current track; call this regularly from the UI loop.
    pub fn tick(&mut self) -> Result<(), AudioError> {
        if !self.state.running || !self.state.playing || self.audio.is_busy() {
            return Ok(());
        }

        tracing::info!(index = self.state.index, "track finished");
        if self.options.auto_advance {
            return self.skip(Direction::Forward);
        }

        self.end_session();
        self.state.playing = false;
        self.view.set_progress(1.0);
        self.view.set_button_label(self.state.button_label());
        Ok(())
    }

    /// Stop playback, the monitor and the audio output. Safe to call twice.
    pub fn shutdown(&mut self) {
        if !self.state.running {
            tracing::debug!("shutdown already done");
            return;
        }
        self.state.running = false;
        self.state.playing = false;

        self.audio.stop();
        self.end_session();
        self.audio.release();
        tracing::info!("player shut down");
    }

    fn show_track(&self, track: &Track) {
        self.view.set_track_label(&track.label());
        self.view.set_cover_image(track.cover());
    }

    fn spawn_monitor(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let spec = MonitorSpec {
            track: session.track.clone(),
            clock: session.clock.clone(),
            probe: Arc::clone(&self.probe),
            view: Arc::clone(&self.view),
            interval: self.options.poll_interval,
            live: Arc::clone(&self.live_monitors),
        };
        match MonitorHandle::spawn(spec) {
            Ok(handle) => session.monitor = Some(handle),
            Err(e) => tracing::warn!(error = %e, "cannot start progress monitor"),
        }
    }

    fn stop_monitor(session: &mut Session, timeout: Duration) {
        if let Some(monitor) = session.monitor.take() {
            if let Some(exit) = monitor.stop(timeout) {
                session.last_exit = Some(exit);
            }
        }
    }

    fn suspend_session(&mut self) {
        let timeout = self.options.join_timeout;
        if let Some(session) = self.session.as_mut() {
            session.clock.pause(Instant::now());
            Self::stop_monitor(session, timeout);
        }
    }

    fn resume_session(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.clock.resume(Instant::now());
        // A finished or failed monitor has nothing more to report for this track.
        if matches!(
            session.last_exit,
            Some(MonitorExit::Completed | MonitorExit::Failed)
        ) {
            return;
        }
        self.spawn_monitor();
    }

    fn end_session(&mut self) {
        let timeout = self.options.join_timeout;
        if let Some(mut session) = self.session.take() {
            Self::stop_monitor(&mut session, timeout);
        }
    }
}
