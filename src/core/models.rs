use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;
use serde::{Deserialize, Serialize};

use crate::utils::{AUDIO_EXTENSIONS, VIDEO_EXTENSIONS, format_duration};

/// Kind of media a session plays. Fixed once the playlist is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a path by extension. `None` means the file is not playable.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();
        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// What to do when the last playlist entry ends naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceMode {
    /// Wrap around to the first entry and keep going.
    #[default]
    Loop,
    /// Park the transport in the `Ended` state.
    Stop,
}

/// One user-selected file. Immutable once added to a playlist; `name` is
/// its identity key within the session.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub path: PathBuf,
    pub name: String,
    pub kind: MediaKind,
    pub title: String,
    pub artist: Option<String>,
    /// Duration hint from the tag probe. The device's metadata event is
    /// authoritative once a stream is open.
    pub duration: Option<Duration>,
}

impl MediaFile {
    pub fn from_path(path: &Path, kind: MediaKind) -> Self {
        match Self::extract_metadata(path, kind) {
            Ok(file) => file,
            Err(_) => Self::fallback(path, kind),
        }
    }

    pub fn format_duration(&self) -> String {
        self.duration
            .map(format_duration)
            .unwrap_or_else(|| "--:--".to_string())
    }

    fn extract_metadata(path: &Path, kind: MediaKind) -> Result<Self> {
        let tagged_file = Probe::open(path)?.read()?;
        let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());
        let title = tag
            .and_then(|t| t.title().map(|s| s.into_owned()))
            .unwrap_or_else(|| Self::extract_stem(path));
        let artist = tag.and_then(|t| t.artist().map(|s| s.into_owned()));
        let duration = Some(tagged_file.properties().duration());

        Ok(MediaFile {
            path: path.to_path_buf(),
            name: Self::extract_filename(path),
            kind,
            title,
            artist,
            duration,
        })
    }

    fn fallback(path: &Path, kind: MediaKind) -> Self {
        MediaFile {
            path: path.to_path_buf(),
            name: Self::extract_filename(path),
            kind,
            title: Self::extract_stem(path),
            artist: None,
            duration: None,
        }
    }

    fn extract_filename(path: &Path) -> String {
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown")
            .to_string()
    }

    fn extract_stem(path: &Path) -> String {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown")
            .to_string()
    }
}

impl fmt::Display for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} [{}]",
            self.artist.as_deref().unwrap_or("Unknown Artist"),
            self.title,
            self.format_duration()
        )
    }
}

/// Ordered, validated sequence of files for one playback session.
/// Never empty; a video playlist holds exactly one entry.
#[derive(Debug, Clone)]
pub struct Playlist {
    kind: MediaKind,
    entries: Vec<MediaFile>,
}

impl Playlist {
    pub fn new(kind: MediaKind, entries: Vec<MediaFile>) -> Result<Self> {
        if entries.is_empty() {
            bail!("a playlist needs at least one file");
        }
        if kind == MediaKind::Video && entries.len() > 1 {
            bail!("a video session takes exactly one file");
        }
        if let Some(file) = entries.iter().find(|f| f.kind != kind) {
            bail!("cannot mix audio and video in one session: {}", file.name);
        }
        Ok(Self { kind, entries })
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&MediaFile> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaFile> {
        self.entries.iter()
    }

    /// Index after `index`, wrapping past the end. Total over any playlist.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.entries.len()
    }

    /// Index before `index`, wrapping past the start. Total over any playlist.
    pub fn previous_index(&self, index: usize) -> usize {
        (index + self.entries.len() - 1) % self.entries.len()
    }

    /// True when `index` is the last entry.
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn audio_file(name: &str) -> MediaFile {
        MediaFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            kind: MediaKind::Audio,
            title: name.trim_end_matches(".mp3").to_string(),
            artist: None,
            duration: None,
        }
    }

    fn video_file(name: &str) -> MediaFile {
        MediaFile {
            kind: MediaKind::Video,
            ..audio_file(name)
        }
    }

    fn audio_playlist(names: &[&str]) -> Playlist {
        Playlist::new(MediaKind::Audio, names.iter().map(|n| audio_file(n)).collect()).unwrap()
    }

    // ── Construction rules ────────────────────────────────────────────────────

    #[test]
    fn empty_playlist_is_rejected() {
        assert!(Playlist::new(MediaKind::Audio, Vec::new()).is_err());
    }

    #[test]
    fn video_playlist_takes_exactly_one_entry() {
        assert!(Playlist::new(MediaKind::Video, vec![video_file("a.mp4")]).is_ok());
        assert!(Playlist::new(MediaKind::Video, vec![video_file("a.mp4"), video_file("b.mp4")]).is_err());
    }

    #[test]
    fn mixed_kinds_are_rejected() {
        let entries = vec![audio_file("a.mp3"), video_file("b.mp4")];
        assert!(Playlist::new(MediaKind::Audio, entries).is_err());
    }

    // ── Modular navigation ────────────────────────────────────────────────────

    #[test]
    fn next_index_wraps_past_the_end() {
        let p = audio_playlist(&["a.mp3", "b.mp3", "c.mp3"]);
        assert_eq!(p.next_index(0), 1);
        assert_eq!(p.next_index(2), 0);
    }

    #[test]
    fn previous_index_wraps_past_the_start() {
        let p = audio_playlist(&["a.mp3", "b.mp3", "c.mp3"]);
        assert_eq!(p.previous_index(1), 0);
        assert_eq!(p.previous_index(0), 2);
    }

    #[test]
    fn next_composed_len_times_is_identity() {
        for size in 1..6 {
            let names: Vec<String> = (0..size).map(|i| format!("{i}.mp3")).collect();
            let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
            let p = audio_playlist(&refs);
            for start in 0..size {
                let mut idx = start;
                for _ in 0..size {
                    idx = p.next_index(idx);
                }
                assert_eq!(idx, start, "cycle of length {size} must return to {start}");
            }
        }
    }

    #[test]
    fn single_entry_playlist_navigates_to_itself() {
        let p = audio_playlist(&["only.mp3"]);
        assert_eq!(p.next_index(0), 0);
        assert_eq!(p.previous_index(0), 0);
    }

    // ── Kind classification ───────────────────────────────────────────────────

    #[test]
    fn kind_from_extension() {
        assert_eq!(MediaKind::from_path(Path::new("x.mp3")), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_path(Path::new("x.FLAC")), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_path(Path::new("x.mp4")), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_path(Path::new("x.txt")), None);
        assert_eq!(MediaKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn fallback_file_uses_stem_as_title() {
        let f = MediaFile::from_path(Path::new("/nowhere/track one.mp3"), MediaKind::Audio);
        assert_eq!(f.name, "track one.mp3");
        assert_eq!(f.title, "track one");
        assert_eq!(f.format_duration(), "--:--");
    }
}
