use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    #[error("no tracks to play")]
    Empty,
    #[error("{songs} songs but {covers} covers; the lists must pair up by index")]
    LengthMismatch { songs: usize, covers: usize },
}

/// One playable entry: an audio file and the image shown while it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub audio: PathBuf,
    pub cover: Option<PathBuf>,
}

impl Track {
    pub fn new(audio: impl Into<PathBuf>, cover: Option<PathBuf>) -> Self {
        Self {
            audio: audio.into(),
            cover,
        }
    }

    /// Name shown under the cover: the audio file name without its extension.
    pub fn label(&self) -> String {
        self.audio
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.audio.display().to_string())
    }

    pub fn cover(&self) -> Option<&Path> {
        self.cover.as_deref()
    }
}

/// Skip direction for moving through the list.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Non-empty, ordered list of tracks. Index arithmetic wraps at both ends.
#[derive(Debug, Clone)]
pub struct TrackList {
    tracks: Vec<Track>,
}

impl TrackList {
    pub fn new(tracks: Vec<Track>) -> Result<Self, LibraryError> {
        if tracks.is_empty() {
            return Err(LibraryError::Empty);
        }
        Ok(Self { tracks })
    }

    /// Pair two parallel lists by index.
    pub fn from_lists(songs: Vec<PathBuf>, covers: Vec<PathBuf>) -> Result<Self, LibraryError> {
        if songs.len() != covers.len() {
            return Err(LibraryError::LengthMismatch {
                songs: songs.len(),
                covers: covers.len(),
            });
        }
        let tracks = songs
            .into_iter()
            .zip(covers)
            .map(|(audio, cover)| Track::new(audio, Some(cover)))
            .collect();
        Self::new(tracks)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Pull an out-of-range index back to the start of the list.
    pub fn clamp(&self, index: usize) -> usize {
        if index < self.tracks.len() { index } else { 0 }
    }

    /// The index one step from `index` in `direction`, wrapping around.
    pub fn step(&self, index: usize, direction: Direction) -> usize {
        let len = self.tracks.len();
        let index = self.clamp(index);
        match direction {
            Direction::Forward => (index + 1) % len,
            Direction::Backward => (index + len - 1) % len,
        }
    }
}
