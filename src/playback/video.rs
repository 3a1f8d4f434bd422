use std::time::{Duration, Instant};

use log::warn;

use crate::core::errors::PlayerError;
use crate::core::models::{AdvanceMode, MediaFile, Playlist};
use crate::core::traits::{MediaDevice, PresentationHost};
use crate::playback::activity::ActivityTracker;
use crate::playback::transport::{PlaybackState, Transport};

/// Single-file controller: the shared transport plus mute, exclusive
/// presentation, and activity-driven control visibility.
///
/// Fullscreen state is never assumed from our own request: after every
/// enter/exit attempt, and on every tick, the flag is reconciled against
/// what the host actually reports.
pub struct VideoPlayer<D: MediaDevice, P: PresentationHost> {
    transport: Transport<D>,
    presentation: P,
    activity: ActivityTracker,
    fullscreen: bool,
}

impl<D: MediaDevice, P: PresentationHost> VideoPlayer<D, P> {
    pub fn new(
        device: D,
        playlist: Playlist,
        presentation: P,
        hide_after: Duration,
        volume: f32,
        now: Instant,
    ) -> Self {
        Self {
            // A video session never auto-advances anywhere; the single
            // entry replays only on explicit user action.
            transport: Transport::new(device, playlist, AdvanceMode::Stop, volume),
            presentation,
            activity: ActivityTracker::new(hide_after, now),
            fullscreen: false,
        }
    }

    /// Mint the stream for the file. Failures are non-fatal.
    pub fn start(&mut self) -> Result<(), PlayerError> {
        self.transport.select_track(0)
    }

    /// Ask the host to enter or leave exclusive presentation. The request
    /// may be denied; either way the visible state follows the host's
    /// report, not the request.
    pub fn toggle_fullscreen(&mut self) -> Result<(), PlayerError> {
        let result = if self.presentation.is_active() {
            self.presentation.exit()
        } else {
            self.presentation.enter()
        };
        self.fullscreen = self.presentation.is_active();
        if let Err(ref err) = result {
            warn!("presentation request denied: {err}");
        }
        result
    }

    /// Record user pointer/key activity: controls come back and the idle
    /// window restarts.
    pub fn notify_activity(&mut self, now: Instant) {
        self.activity.notify_activity(now);
    }

    /// Advance the idle clock and reconcile presentation state. Driven
    /// from the application loop.
    pub fn tick(&mut self, now: Instant) {
        self.fullscreen = self.presentation.is_active();
        self.activity.tick(now, self.transport.snapshot().is_playing());
    }

    pub fn controls_visible(&self) -> bool {
        self.activity.controls_visible()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
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

    pub fn active_file(&self) -> Option<&MediaFile> {
        self.transport.active_file()
    }

    /// Release the stream and drop out of exclusive presentation.
    pub fn shutdown(&mut self) {
        if self.presentation.is_active() {
            if let Err(err) = self.presentation.exit() {
                warn!("could not leave presentation mode: {err}");
            }
        }
        self.fullscreen = self.presentation.is_active();
        self.transport.shutdown();
    }
}
