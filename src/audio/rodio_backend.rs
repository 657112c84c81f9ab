//! `rodio` implementation of the audio backend.
//!
//! The output stream is opened on a dedicated thread that keeps the device
//! alive until `release`; the backend itself only holds a handle to the
//! stream's mixer and the `Sink` of the current track.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStreamBuilder, Sink};

use super::backend::AudioBackend;
use super::types::AudioError;

type FileDecoder = Decoder<BufReader<File>>;

struct OutputThread {
    quit: Sender<()>,
    join: JoinHandle<()>,
}

/// Open and decode `path`, mapping failures to `AudioError`.
pub(super) fn decode(path: &Path) -> Result<FileDecoder, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn spawn_output_thread() -> Result<(Mixer, OutputThread), AudioError> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<Mixer, String>>();
    let (quit_tx, quit_rx) = mpsc::channel::<()>();

    let join = thread::Builder::new()
        .name("audio-output".into())
        .spawn(move || {
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(s) => s,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            // rodio logs to stderr when the stream is dropped, which would
            // scribble over the terminal UI.
            stream.log_on_drop(false);
            let _ = ready_tx.send(Ok(stream.mixer().clone()));

            // Park until release; a dropped sender also ends the thread.
            let _ = quit_rx.recv();
            tracing::debug!("audio output closed");
        })
        .map_err(|e| AudioError::NoDevice(e.to_string()))?;

    let mixer = match ready_rx.recv() {
        Ok(Ok(mixer)) => mixer,
        Ok(Err(msg)) => {
            let _ = join.join();
            return Err(AudioError::NoDevice(msg));
        }
        Err(_) => {
            let _ = join.join();
            return Err(AudioError::NoDevice("audio thread exited".into()));
        }
    };

    Ok((
        mixer,
        OutputThread {
            quit: quit_tx,
            join,
        },
    ))
}

pub struct RodioBackend {
    mixer: Option<Mixer>,
    output: Option<OutputThread>,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    prepared: Option<FileDecoder>,
    volume: f32,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open() -> Result<Self, AudioError> {
        let (mixer, output) = spawn_output_thread()?;
        tracing::info!("audio output opened");
        Ok(Self {
            mixer: Some(mixer),
            output: Some(output),
            sink: None,
            loaded: None,
            prepared: None,
            volume: 1.0,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        if self.mixer.is_none() {
            return Err(AudioError::NoDevice("audio output released".into()));
        }
        self.stop();
        self.loaded = None;
        self.prepared = Some(decode(path)?);
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self, loops: u32) -> Result<(), AudioError> {
        let Some(mixer) = self.mixer.clone() else {
            return Err(AudioError::NoDevice("audio output released".into()));
        };
        let Some(path) = self.loaded.clone() else {
            return Err(AudioError::NotLoaded);
        };

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let first = match self.prepared.take() {
            Some(d) => d,
            None => decode(&path)?,
        };

        let sink = Sink::connect_new(&mixer);
        sink.set_volume(self.volume);
        sink.append(first);
        for _ in 0..loops {
            sink.append(decode(&path)?);
        }
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn release(&mut self) {
        self.stop();
        self.prepared = None;
        self.loaded = None;
        self.mixer = None;
        if let Some(output) = self.output.take() {
            let _ = output.quit.send(());
            if output.join.join().is_err() {
                tracing::warn!("audio output thread panicked");
            }
            tracing::info!("audio output released");
        }
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.release();
    }
}
