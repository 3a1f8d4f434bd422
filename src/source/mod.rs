use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use walkdir::WalkDir;

use crate::core::models::{MediaFile, MediaKind, Playlist};

/// Validates user-selected paths into a playable session playlist.
///
/// This is the upstream file source the playback controllers trust:
/// extension checks, directory expansion, and the kind rules (audio
/// sessions take 1..N files, video sessions exactly one) all happen here
/// and nowhere downstream.
pub fn build_playlist(paths: &[PathBuf]) -> Result<Playlist> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_directory(path));
        } else if path.is_file() {
            if MediaKind::from_path(path).is_none() {
                bail!("unsupported file type: {}", path.display());
            }
            files.push(path.clone());
        } else {
            bail!("file not found: {}", path.display());
        }
    }

    let kind = classify(&files)?;
    let entries = files.iter().map(|p| MediaFile::from_path(p, kind)).collect();
    Playlist::new(kind, entries)
}

/// Determine the session kind for a set of already-screened paths.
/// Exactly one kind per session; the first file fixes it.
fn classify(files: &[PathBuf]) -> Result<MediaKind> {
    let Some(first) = files.first() else {
        bail!("no playable files selected");
    };
    let kind = match MediaKind::from_path(first) {
        Some(kind) => kind,
        None => bail!("unsupported file type: {}", first.display()),
    };
    for file in &files[1..] {
        if MediaKind::from_path(file) != Some(kind) {
            bail!("cannot mix audio and video in one session: {}", file.display());
        }
    }
    if kind == MediaKind::Video && files.len() > 1 {
        bail!("a video session takes exactly one file");
    }
    Ok(kind)
}

fn scan_directory(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && MediaKind::from_path(e.path()).is_some())
        .map(|e| e.path().to_path_buf())
        .collect();
    // Walk order is filesystem-dependent; the playlist order should not be.
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn classify_rejects_an_empty_selection() {
        assert!(classify(&[]).is_err());
    }

    #[test]
    fn classify_fixes_the_kind_from_the_first_file() {
        assert_eq!(
            classify(&paths(&["a.mp3", "b.flac", "c.ogg"])).unwrap(),
            MediaKind::Audio
        );
        assert_eq!(classify(&paths(&["clip.mp4"])).unwrap(), MediaKind::Video);
    }

    #[test]
    fn classify_rejects_mixed_kinds() {
        assert!(classify(&paths(&["a.mp3", "clip.mp4"])).is_err());
        assert!(classify(&paths(&["clip.mp4", "a.mp3"])).is_err());
    }

    #[test]
    fn classify_rejects_more_than_one_video() {
        assert!(classify(&paths(&["a.mp4", "b.mp4"])).is_err());
    }

    #[test]
    fn classify_rejects_unknown_extensions() {
        assert!(classify(&paths(&["notes.txt"])).is_err());
    }
}
