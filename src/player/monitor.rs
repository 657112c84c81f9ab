//! Progress monitor: a background thread that estimates how far into the
//! current track playback is and publishes the fraction to the view.
//!
//! The estimate comes from a clock started with the track, compared against
//! the track length reported by a `DurationProbe`. It is not the decoder's
//! real position.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::audio::DurationProbe;
use crate::view::NowPlayingView;

/// How paused time affects elapsed time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Elapsed time runs from the start of the track, pauses included, so
    /// the bar jumps ahead after a resume.
    #[default]
    Wall,
    /// Paused time is subtracted.
    Played,
}

/// Clock for one track, shared across pause/resume of that track.
#[derive(Debug, Clone)]
pub struct SessionClock {
    mode: ClockMode,
    origin: Instant,
    paused_total: Duration,
    paused_at: Option<Instant>,
    duration: Arc<OnceLock<Duration>>,
}

impl SessionClock {
    pub fn start(mode: ClockMode, now: Instant) -> Self {
        Self {
            mode,
            origin: now,
            paused_total: Duration::ZERO,
            paused_at: None,
            duration: Arc::new(OnceLock::new()),
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(at);
        }
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let wall = now.saturating_duration_since(self.origin);
        match self.mode {
            ClockMode::Wall => wall,
            ClockMode::Played => {
                let open_pause = self
                    .paused_at
                    .map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
                wall.saturating_sub(self.paused_total + open_pause)
            }
        }
    }

    /// Track length, once a monitor has probed it.
    pub fn known_duration(&self) -> Option<Duration> {
        self.duration.get().copied()
    }
}

/// `elapsed / total`, clamped into `[0, 1]`. A zero-length track counts as done.
pub fn progress_fraction(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0) as f32
}

/// Why a monitor run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MonitorExit {
    /// The clock reached the track length; 1.0 was published.
    Completed,
    /// Cancelled by the controller.
    Cancelled,
    /// The track length could not be determined.
    Failed,
}

/// Counts running monitors; decremented when the run returns.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(live)
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(super) struct MonitorSpec {
    pub track: PathBuf,
    pub clock: SessionClock,
    pub probe: Arc<dyn DurationProbe>,
    pub view: Arc<dyn NowPlayingView>,
    pub interval: Duration,
    pub live: Arc<AtomicUsize>,
}

/// Handle to a running monitor thread.
pub(super) struct MonitorHandle {
    cancel: Sender<()>,
    done: Receiver<MonitorExit>,
    join: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn spawn(spec: MonitorSpec) -> io::Result<Self> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel::<MonitorExit>();

        let join = thread::Builder::new()
            .name("progress-monitor".into())
            .spawn(move || {
                let exit = {
                    let _live = LiveGuard::enter(spec.live.clone());
                    run(&spec, &cancel_rx)
                };
                let _ = done_tx.send(exit);
            })?;

        Ok(Self {
            cancel: cancel_tx,
            done: done_rx,
            join,
        })
    }

    /// Cancel the run and wait up to `timeout` for it to end.
    ///
    /// Returns `None` when the thread did not answer in time; it is then left
    /// to finish on its own.
    pub fn stop(self, timeout: Duration) -> Option<MonitorExit> {
        let _ = self.cancel.send(());
        match self.done.recv_timeout(timeout) {
            Ok(exit) => {
                let _ = self.join.join();
                Some(exit)
            }
            Err(_) => {
                tracing::warn!(?timeout, "progress monitor did not stop in time; abandoning it");
                None
            }
        }
    }
}

fn cancelled(rx: &Receiver<()>) -> bool {
    !matches!(rx.try_recv(), Err(TryRecvError::Empty))
}

fn run(spec: &MonitorSpec, cancel: &Receiver<()>) -> MonitorExit {
    let duration = match spec.clock.known_duration() {
        Some(d) => d,
        None => match spec.probe.duration(&spec.track) {
            Ok(d) => {
                let _ = spec.clock.duration.set(d);
                d
            }
            Err(e) => {
                tracing::warn!(track = %spec.track.display(), error = %e, "progress unavailable");
                return MonitorExit::Failed;
            }
        },
    };
    tracing::debug!(track = %spec.track.display(), ?duration, "progress monitor started");

    loop {
        if cancelled(cancel) {
            return MonitorExit::Cancelled;
        }

        let elapsed = spec.clock.elapsed_at(Instant::now());
        if elapsed >= duration {
            spec.view.set_progress(1.0);
            tracing::debug!(track = %spec.track.display(), "progress complete");
            return MonitorExit::Completed;
        }
        spec.view.set_progress(progress_fraction(elapsed, duration));

        match cancel.recv_timeout(spec.interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return MonitorExit::Cancelled,
        }
    }
}
