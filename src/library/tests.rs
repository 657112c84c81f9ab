use super::*;
use super::scan::scan;
use crate::config::LibrarySettings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn list(n: usize) -> TrackList {
    let songs = (0..n).map(|i| PathBuf::from(format!("audio/{i}.mp3"))).collect();
    let covers = (0..n).map(|i| PathBuf::from(format!("image/{i}.jpg"))).collect();
    TrackList::from_lists(songs, covers).unwrap()
}

#[test]
fn from_lists_rejects_empty_and_mismatched_lists() {
    assert_eq!(
        TrackList::from_lists(Vec::new(), Vec::new()).unwrap_err(),
        LibraryError::Empty
    );
    assert_eq!(
        TrackList::from_lists(vec!["a.mp3".into(), "b.mp3".into()], vec!["a.jpg".into()])
            .unwrap_err(),
        LibraryError::LengthMismatch {
            songs: 2,
            covers: 1
        }
    );
}

#[test]
fn from_lists_pairs_by_index() {
    let tracks = TrackList::from_lists(
        vec!["audio/lofi.mp3".into(), "audio/sad_guitar.mp3".into()],
        vec!["image/pic 2.jpeg".into(), "image/guitar.jpg".into()],
    )
    .unwrap();
    assert_eq!(tracks.len(), 2);
    let second = tracks.get(1).unwrap();
    assert_eq!(second.audio, PathBuf::from("audio/sad_guitar.mp3"));
    assert_eq!(second.cover(), Some(std::path::Path::new("image/guitar.jpg")));
}

#[test]
fn step_wraps_at_both_ends() {
    let two = list(2);
    assert_eq!(two.step(0, Direction::Forward), 1);
    assert_eq!(two.step(1, Direction::Forward), 0);
    assert_eq!(two.step(0, Direction::Backward), 1);

    let five = list(5);
    for i in 0..5 {
        assert_eq!(five.step(i, Direction::Forward), (i + 1) % 5);
        assert_eq!(five.step(i, Direction::Backward), (i + 5 - 1) % 5);
    }

    let one = list(1);
    assert_eq!(one.step(0, Direction::Forward), 0);
    assert_eq!(one.step(0, Direction::Backward), 0);
}

#[test]
fn clamp_resets_out_of_range_index() {
    let three = list(3);
    assert_eq!(three.clamp(2), 2);
    assert_eq!(three.clamp(3), 0);
    assert_eq!(three.clamp(usize::MAX), 0);
    assert_eq!(three.step(7, Direction::Forward), 1);
}

#[test]
fn label_strips_extension() {
    assert_eq!(Track::new("audio/lofi.mp3", None).label(), "lofi");
    assert_eq!(Track::new("audio/sad_guitar.mp3", None).label(), "sad_guitar");
    assert_eq!(Track::new("noext", None).label(), "noext");
}

#[test]
fn scan_pairs_audio_with_covers_and_sorts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("b.jpg"), b"not a real jpg").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].label(), "A");
    assert_eq!(tracks[0].cover, None);
    assert_eq!(tracks[1].label(), "b");
    assert_eq!(tracks[1].cover, Some(dir.path().join("b.jpg")));
}

#[test]
fn scan_uses_folder_cover_per_directory_and_skips_hidden() {
    let dir = tempdir().unwrap();
    let album = dir.path().join("album");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("one.mp3"), b"x").unwrap();
    fs::write(album.join("two.mp3"), b"x").unwrap();
    fs::write(album.join("folder.png"), b"x").unwrap();
    fs::write(dir.path().join("loose.mp3"), b"x").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    let labels: Vec<String> = tracks.iter().map(Track::label).collect();
    assert_eq!(labels, vec!["one", "two", "loose"]);
    assert_eq!(tracks[0].cover, Some(album.join("folder.png")));
    assert_eq!(tracks[1].cover, Some(album.join("folder.png")));
    // The folder cover does not leak into the parent directory.
    assert_eq!(tracks[2].cover, None);
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    fs::write(d1.join("one.mp3"), b"x").unwrap();
    fs::write(d2.join("two.mp3"), b"x").unwrap();

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2.
    let settings = LibrarySettings {
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    let labels: Vec<String> = scan(dir.path(), &settings).iter().map(Track::label).collect();
    assert!(labels.contains(&"root".to_string()));
    assert!(labels.contains(&"one".to_string()));
    assert!(!labels.contains(&"two".to_string()));
}

#[test]
fn load_tracks_prefers_override_then_configured_lists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.mp3"), b"x").unwrap();

    let settings = LibrarySettings {
        songs: vec!["audio/lofi.mp3".into(), "audio/sad_guitar.mp3".into()],
        covers: vec!["image/pic 2.jpeg".into(), "image/guitar.jpg".into()],
        ..LibrarySettings::default()
    };

    let scanned = load_tracks(&settings, Some(dir.path())).unwrap();
    assert_eq!(scanned.len(), 1);

    let configured = load_tracks(&settings, None).unwrap();
    assert_eq!(configured.len(), 2);
    assert_eq!(configured.get(0).unwrap().label(), "lofi");
}

#[test]
fn load_tracks_reports_empty_directory() {
    let dir = tempdir().unwrap();
    let settings = LibrarySettings {
        dir: Some(dir.path().to_path_buf()),
        ..LibrarySettings::default()
    };
    assert_eq!(load_tracks(&settings, None).unwrap_err(), LibraryError::Empty);
}
