use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{LibraryError, Track, TrackList};

/// Stems that mark a directory-wide cover when no per-track image exists.
const FOLDER_COVER_STEMS: [&str; 3] = ["cover", "folder", "front"];

fn normalized_exts(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn stem_lower(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
}

/// Pick the cover for `audio` among the images found in its directory.
///
/// An image sharing the audio file's stem wins; otherwise a folder-wide
/// `cover.*`/`folder.*`/`front.*` image is used.
fn match_cover(audio: &Path, images: &[PathBuf]) -> Option<PathBuf> {
    let stem = stem_lower(audio)?;
    if let Some(img) = images
        .iter()
        .find(|img| stem_lower(img).as_deref() == Some(stem.as_str()))
    {
        return Some(img.clone());
    }
    FOLDER_COVER_STEMS.iter().find_map(|wanted| {
        images
            .iter()
            .find(|img| stem_lower(img).as_deref() == Some(*wanted))
            .cloned()
    })
}

/// Walk `dir` and pair every audio file with a cover image from its directory.
///
/// Hidden entries are skipped. Tracks are ordered by path, case-insensitively.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let audio_exts = normalized_exts(&settings.audio_extensions);
    let cover_exts = normalized_exts(&settings.cover_extensions);

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if let Some(d) = settings.max_depth {
        walker = walker.max_depth(d);
    }

    let mut audio_files: Vec<PathBuf> = Vec::new();
    let mut images: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();

    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if has_extension(path, &audio_exts) {
            audio_files.push(path.to_path_buf());
        } else if has_extension(path, &cover_exts) {
            let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
            images.entry(parent).or_default().push(path.to_path_buf());
        }
    }

    // Deterministic pick when several images share a stem.
    for list in images.values_mut() {
        list.sort();
    }

    let mut tracks: Vec<Track> = audio_files
        .into_iter()
        .map(|audio| {
            let cover = audio
                .parent()
                .and_then(|p| images.get(p))
                .and_then(|imgs| match_cover(&audio, imgs));
            Track::new(audio, cover)
        })
        .collect();

    tracks.sort_by(|a, b| {
        a.audio
            .to_string_lossy()
            .to_lowercase()
            .cmp(&b.audio.to_string_lossy().to_lowercase())
    });
    tracks
}

/// Build the track list the player starts with.
///
/// A directory given on the command line wins; then the explicit
/// `songs`/`covers` lists; then `library.dir`; then the current directory.
pub fn load_tracks(
    settings: &LibrarySettings,
    dir_override: Option<&Path>,
) -> Result<TrackList, LibraryError> {
    if let Some(dir) = dir_override {
        tracing::info!(dir = %dir.display(), "scanning music directory");
        return TrackList::new(scan(dir, settings));
    }

    if !settings.songs.is_empty() || !settings.covers.is_empty() {
        tracing::info!(count = settings.songs.len(), "using configured track list");
        return TrackList::from_lists(settings.songs.clone(), settings.covers.clone());
    }

    let dir = settings
        .dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::info!(dir = %dir.display(), "scanning music directory");
    TrackList::new(scan(&dir, settings))
}
