use crate::core::errors::PlayerError;
use crate::core::models::{AdvanceMode, MediaFile, Playlist};
use crate::core::traits::MediaDevice;
use crate::playback::transport::{PlaybackState, Transport};

/// Ordered-playlist controller: the shared transport plus wrap-around
/// navigation and auto-advance over 1..N tracks.
pub struct AudioPlayer<D: MediaDevice> {
    transport: Transport<D>,
}

impl<D: MediaDevice> AudioPlayer<D> {
    pub fn new(device: D, playlist: Playlist, advance: AdvanceMode, volume: f32) -> Self {
        Self {
            transport: Transport::new(device, playlist, advance, volume),
        }
    }

    /// Mint the stream for the first track. Failures are non-fatal; the
    /// session starts idle and the user can retry.
    pub fn start(&mut self) -> Result<(), PlayerError> {
        self.transport.select_track(0)
    }

    /// Jump to the entry after the active one, wrapping past the end.
    /// Total over any playlist; never out of range.
    pub fn go_to_next(&mut self) -> Result<(), PlayerError> {
        let next = self
            .transport
            .playlist()
            .next_index(self.transport.snapshot().active_index);
        self.transport.select_track(next)
    }

    /// Jump to the entry before the active one, wrapping past the start.
    pub fn go_to_previous(&mut self) -> Result<(), PlayerError> {
        let previous = self
            .transport
            .playlist()
            .previous_index(self.transport.snapshot().active_index);
        self.transport.select_track(previous)
    }

    pub fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        self.transport.select_track(index)
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        self.transport.toggle_play_pause()
    }

    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.transport.seek_by(delta_seconds)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.transport.set_volume(volume)
    }

    pub fn toggle_mute(&mut self) {
        self.transport.toggle_mute()
    }

    pub fn pump(&mut self) -> Vec<PlayerError> {
        self.transport.pump()
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.transport.snapshot()
    }

    pub fn playlist(&self) -> &Playlist {
        self.transport.playlist()
    }

    pub fn active_file(&self) -> Option<&MediaFile> {
        self.transport.active_file()
    }

    pub fn shutdown(&mut self) {
        self.transport.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::MediaKind;
    use crate::device::mock::MockDevice;
    use std::path::PathBuf;

    fn player(names: &[&str]) -> AudioPlayer<MockDevice> {
        let entries = names
            .iter()
            .map(|n| MediaFile {
                path: PathBuf::from(n),
                name: n.to_string(),
                kind: MediaKind::Audio,
                title: n.to_string(),
                artist: None,
                duration: None,
            })
            .collect();
        let playlist = Playlist::new(MediaKind::Audio, entries).unwrap();
        let mut p = AudioPlayer::new(MockDevice::new(), playlist, AdvanceMode::Loop, 1.0);
        p.start().unwrap();
        p
    }

    #[test]
    fn next_wraps_from_the_last_track_to_the_first() {
        let mut p = player(&["a.mp3", "b.mp3", "c.mp3"]);
        p.select_track(2).unwrap();

        p.go_to_next().unwrap();
        assert_eq!(p.snapshot().active_index, 0);
    }

    #[test]
    fn previous_wraps_from_the_first_track_to_the_last() {
        let mut p = player(&["a.mp3", "b.mp3", "c.mp3"]);

        p.go_to_previous().unwrap();
        assert_eq!(p.snapshot().active_index, 2);
    }

    #[test]
    fn next_composed_playlist_length_times_returns_home() {
        let mut p = player(&["a.mp3", "b.mp3", "c.mp3", "d.mp3"]);
        let start = p.snapshot().active_index;

        for _ in 0..p.playlist().len() {
            p.go_to_next().unwrap();
        }
        assert_eq!(p.snapshot().active_index, start);
    }

    #[test]
    fn navigation_on_a_single_track_playlist_stays_put() {
        let mut p = player(&["only.mp3"]);
        p.go_to_next().unwrap();
        assert_eq!(p.snapshot().active_index, 0);
        p.go_to_previous().unwrap();
        assert_eq!(p.snapshot().active_index, 0);
    }
}
