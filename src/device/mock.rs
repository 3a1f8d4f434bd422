use std::time::Duration;

use crate::core::errors::PlayerError;
use crate::core::events::{DeviceEvent, HandleId};
use crate::core::models::MediaFile;
use crate::core::traits::MediaDevice;

/// Scripted in-memory device for controller tests.
///
/// Records every call, tracks which device-side streams are open (the
/// leak check used by the resource-manager tests), and hands out whatever
/// events the test queued in `pending`.
#[derive(Debug, Default)]
pub(crate) struct MockDevice {
    pub next_id: HandleId,
    /// Streams minted and not yet closed, in mint order.
    pub open_streams: Vec<HandleId>,
    /// File names passed to `open`, in call order.
    pub opened: Vec<String>,
    /// Handles passed to `close`, in call order.
    pub closed: Vec<HandleId>,
    pub playing: bool,
    pub volume: f32,
    pub muted: bool,
    pub position: Duration,
    /// Events handed out by the next `poll_events`.
    pub pending: Vec<DeviceEvent>,

    /// Make the next `open` fail with this reason.
    pub fail_next_open: Option<String>,
    pub fail_play: bool,
    pub fail_seek: bool,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// The most recently minted, still-open stream.
    pub fn current(&self) -> Option<HandleId> {
        self.open_streams.last().copied()
    }
}

impl MediaDevice for MockDevice {
    fn open(&mut self, file: &MediaFile) -> Result<HandleId, PlayerError> {
        if let Some(reason) = self.fail_next_open.take() {
            return Err(PlayerError::Resource {
                name: file.name.clone(),
                reason,
            });
        }
        self.next_id += 1;
        self.open_streams.push(self.next_id);
        self.opened.push(file.name.clone());
        self.playing = false;
        self.position = Duration::ZERO;
        Ok(self.next_id)
    }

    fn close(&mut self, handle: HandleId) {
        self.open_streams.retain(|&id| id != handle);
        self.closed.push(handle);
        self.playing = false;
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        if self.fail_play {
            return Err(PlayerError::playback("no user gesture"));
        }
        if self.current().is_none() {
            return Err(PlayerError::playback("no stream loaded"));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_position(&mut self, position: Duration) -> Result<(), PlayerError> {
        if self.fail_seek {
            return Err(PlayerError::playback("seek unsupported"));
        }
        self.position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        std::mem::take(&mut self.pending)
    }
}
