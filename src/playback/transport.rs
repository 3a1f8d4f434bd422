use std::time::Duration;

use log::{debug, warn};

use crate::core::errors::PlayerError;
use crate::core::events::DeviceEvent;
use crate::core::models::{AdvanceMode, MediaFile, Playlist};
use crate::core::traits::MediaDevice;
use crate::playback::resources::{ResourceManager, StreamHandle};

/// Where the transport sits in the lifecycle of the active track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// No stream minted.
    Idle,
    /// Stream minted, waiting for metadata.
    Loading,
    /// Metadata known, paused.
    Ready,
    /// Audio is running.
    Playing,
    /// Ran off the end of the playlist with advance set to stop.
    Ended,
}

/// Read-only snapshot of the controller, handed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub active_index: usize,
    pub transport: TransportState,
    pub position: Duration,
    pub duration: Duration,
    pub volume: f32,
    pub muted: bool,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }
}

/// Shared transport core of the audio and video controllers.
///
/// Owns the playlist, the single live stream handle, and the snapshot, and
/// folds device events into them. Every mutation happens here, in reaction
/// to one user command or one device event at a time.
///
/// A resume after a track switch is gated on the `MetadataReady` event of
/// the stream it was requested for; events tagged with a revoked handle
/// are dropped, so a pending resume can never start the wrong track.
pub struct Transport<D: MediaDevice> {
    device: D,
    resources: ResourceManager,
    playlist: Playlist,
    state: PlaybackState,
    advance: AdvanceMode,
    /// Start playback as soon as metadata for the live stream arrives.
    resume_on_ready: bool,
    /// Last non-zero volume, restored on unmute.
    remembered_volume: f32,
}

impl<D: MediaDevice> Transport<D> {
    pub fn new(device: D, playlist: Playlist, advance: AdvanceMode, volume: f32) -> Self {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };
        let mut transport = Self {
            device,
            resources: ResourceManager::new(),
            playlist,
            state: PlaybackState {
                active_index: 0,
                transport: TransportState::Idle,
                position: Duration::ZERO,
                duration: Duration::ZERO,
                volume,
                muted: false,
            },
            advance,
            resume_on_ready: false,
            remembered_volume: if volume > 0.0 { volume } else { 1.0 },
        };
        transport.device.set_volume(volume);
        transport
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn active_file(&self) -> Option<&MediaFile> {
        self.playlist.get(self.state.active_index)
    }

    pub fn live_handle(&self) -> Option<&StreamHandle> {
        self.resources.live()
    }

    #[cfg(test)]
    pub(crate) fn device(&self) -> &D {
        &self.device
    }

    #[cfg(test)]
    pub(crate) fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Switch the active track.
    ///
    /// The previous stream is revoked before the new one is minted. If the
    /// controller was playing (or a resume was already pending), playback
    /// restarts once the new stream reports its metadata.
    pub fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.playlist.len() {
            return Err(PlayerError::playback(format!(
                "track index {index} out of range (playlist has {})",
                self.playlist.len()
            )));
        }
        let was_playing = self.state.transport == TransportState::Playing || self.resume_on_ready;
        let file = self
            .playlist
            .get(index)
            .cloned()
            .ok_or_else(|| PlayerError::playback("playlist entry vanished"))?;

        self.state.active_index = index;
        self.state.position = Duration::ZERO;
        self.state.duration = Duration::ZERO;

        match self.resources.acquire(&mut self.device, &file) {
            Ok(_) => {
                self.state.transport = TransportState::Loading;
                self.resume_on_ready = was_playing;
                // A fresh stream starts from the device's defaults; re-apply
                // the session's volume and mute.
                self.device.set_volume(self.state.volume);
                self.device.set_muted(self.state.muted);
                Ok(())
            }
            Err(err) => {
                self.state.transport = TransportState::Idle;
                self.resume_on_ready = false;
                Err(err)
            }
        }
    }

    /// Flip between playing and paused.
    ///
    /// A rejected play request surfaces as a [`PlayerError::Playback`] and
    /// leaves the transport paused; pausing always succeeds. Calling this
    /// twice with no intervening event restores the original state.
    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        match self.state.transport {
            TransportState::Playing => {
                self.device.pause();
                self.state.transport = TransportState::Ready;
                self.resume_on_ready = false;
                Ok(())
            }
            TransportState::Ready => {
                self.device.play()?;
                self.state.transport = TransportState::Playing;
                Ok(())
            }
            TransportState::Loading => {
                // Metadata has not arrived yet; flip the pending intent.
                self.resume_on_ready = !self.resume_on_ready;
                Ok(())
            }
            TransportState::Idle => {
                // No stream (initial state, or the last open failed): retry.
                self.select_track(self.state.active_index)?;
                self.resume_on_ready = true;
                Ok(())
            }
            TransportState::Ended => {
                // Replay the final track from the top.
                self.select_track(self.state.active_index)?;
                self.resume_on_ready = true;
                Ok(())
            }
        }
    }

    /// Optimistic seek: clamps `seconds` into `[0, duration]`, updates the
    /// snapshot immediately, then pushes the position to the device. Never
    /// fails for any numeric input; a device rejection is logged and left
    /// for the next position tick to reconcile.
    pub fn seek(&mut self, seconds: f64) {
        let seconds = if seconds.is_nan() { 0.0 } else { seconds };
        let clamped = seconds.clamp(0.0, self.state.duration.as_secs_f64());
        let target = Duration::from_secs_f64(clamped);

        self.state.position = target;
        if let Err(err) = self.device.set_position(target) {
            warn!("seek to {clamped:.1}s rejected: {err}");
        }
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek(self.state.position.as_secs_f64() + delta_seconds);
    }

    /// Set volume, clamped to `[0, 1]`. Setting zero mutes; any non-zero
    /// value is remembered for the next unmute.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        if volume > 0.0 {
            self.remembered_volume = volume;
        }
        self.state.volume = volume;
        self.state.muted = volume == 0.0;
        self.apply_volume();
    }

    /// Flip mute. Unmuting restores the remembered non-zero volume rather
    /// than resuming at zero.
    pub fn toggle_mute(&mut self) {
        if self.state.muted {
            self.state.muted = false;
            if self.state.volume == 0.0 {
                self.state.volume = self.remembered_volume;
            }
        } else {
            self.state.muted = true;
        }
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.device.set_volume(self.state.volume);
        self.device.set_muted(self.state.muted);
    }

    /// Drain device events and fold them into the snapshot. Returns the
    /// non-fatal errors to surface to the user.
    pub fn pump(&mut self) -> Vec<PlayerError> {
        let mut surfaced = Vec::new();
        for event in self.device.poll_events() {
            let Some(live) = self.resources.live().map(StreamHandle::id) else {
                debug!("dropping device event with no live stream: {event:?}");
                continue;
            };
            if event.handle() != live {
                debug!("dropping stale device event for revoked stream {}", event.handle());
                continue;
            }
            match event {
                DeviceEvent::MetadataReady { duration, .. } => {
                    self.on_metadata_ready(duration, &mut surfaced)
                }
                DeviceEvent::PositionChanged { position, .. } => self.on_position(position),
                DeviceEvent::Ended { .. } => self.on_ended(&mut surfaced),
                DeviceEvent::Error { reason, .. } => self.on_error(reason, &mut surfaced),
            }
        }
        surfaced
    }

    fn on_metadata_ready(&mut self, duration: Duration, surfaced: &mut Vec<PlayerError>) {
        self.state.duration = duration;
        if self.state.transport != TransportState::Loading {
            return;
        }
        if self.resume_on_ready {
            self.resume_on_ready = false;
            match self.device.play() {
                Ok(()) => self.state.transport = TransportState::Playing,
                Err(err) => {
                    self.state.transport = TransportState::Ready;
                    surfaced.push(err);
                }
            }
        } else {
            self.state.transport = TransportState::Ready;
        }
    }

    /// Position ticks arrive at device cadence; they touch nothing but the
    /// position itself.
    fn on_position(&mut self, position: Duration) {
        self.state.position = position;
    }

    /// Natural end of the active track: advance to the next index, wrapping
    /// to zero past the last entry, and keep playing. With advance set to
    /// stop, the final track parks the transport in `Ended` instead.
    fn on_ended(&mut self, surfaced: &mut Vec<PlayerError>) {
        if self.advance == AdvanceMode::Stop && self.playlist.is_last(self.state.active_index) {
            self.resources.release_current(&mut self.device);
            self.state.transport = TransportState::Ended;
            self.state.position = self.state.duration;
            self.resume_on_ready = false;
            return;
        }
        let next = self.playlist.next_index(self.state.active_index);
        if let Err(err) = self.select_track(next) {
            surfaced.push(err);
            return;
        }
        self.resume_on_ready = true;
    }

    /// Mid-stream device failure: pause, keep the handle, surface the error.
    fn on_error(&mut self, reason: String, surfaced: &mut Vec<PlayerError>) {
        self.device.pause();
        self.resume_on_ready = false;
        if matches!(self.state.transport, TransportState::Playing | TransportState::Loading) {
            self.state.transport = TransportState::Ready;
        }
        surfaced.push(PlayerError::Playback { reason });
    }

    /// Release the live stream and stop the device. Runs on drop as well,
    /// so an abandoned controller cannot leak its handle.
    pub fn shutdown(&mut self) {
        self.device.pause();
        if let Some(handle) = self.resources.live().cloned() {
            self.resources.release(&mut self.device, &handle);
        }
        self.state.transport = TransportState::Idle;
        self.resume_on_ready = false;
    }
}

impl<D: MediaDevice> Drop for Transport<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
