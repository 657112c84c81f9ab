//! Error type shared by the audio backends.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    #[error("cannot determine the length of {}: {reason}", path.display())]
    Probe { path: PathBuf, reason: String },
    #[error("no audio output: {0}")]
    NoDevice(String),
    #[error("nothing is loaded")]
    NotLoaded,
}
