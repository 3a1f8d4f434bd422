use std::time::Duration;

use anyhow::Result;

use crate::application::state::ViewState;
use crate::core::errors::PlayerError;
use crate::core::events::{DeviceEvent, HandleId, UiEvent};
use crate::core::models::MediaFile;

/// Abstraction for the host playback device.
///
/// `open` mints a device-side stream and returns its handle id; the caller
/// (the resource manager) guarantees at most one stream is live at a time.
/// All failures are converted to [`PlayerError`] before they leave the
/// implementation.
pub trait MediaDevice: Send {
    /// Mint a stream for `file`. The previously minted stream, if any, has
    /// already been closed by the caller.
    fn open(&mut self, file: &MediaFile) -> Result<HandleId, PlayerError>;

    /// Revoke a stream. Idempotent: closing an unknown or already-closed
    /// handle is a no-op.
    fn close(&mut self, handle: HandleId);

    /// Start or resume the live stream.
    fn play(&mut self) -> Result<(), PlayerError>;

    /// Pause the live stream. Pausing with no stream is a no-op.
    fn pause(&mut self);

    /// Move the live stream to an absolute position.
    fn set_position(&mut self, position: Duration) -> Result<(), PlayerError>;

    /// Set output amplitude (0.0 - 1.0).
    fn set_volume(&mut self, volume: f32);

    /// Mute or unmute without touching the stored amplitude.
    fn set_muted(&mut self, muted: bool);

    /// Drain lifecycle events accumulated since the last poll.
    fn poll_events(&mut self) -> Vec<DeviceEvent>;
}

/// Abstraction for the host's exclusive full-viewport presentation mode.
///
/// Requests may be denied; callers must reconcile against [`is_active`]
/// rather than assume a request succeeded.
///
/// [`is_active`]: PresentationHost::is_active
pub trait PresentationHost: Send {
    fn enter(&mut self) -> Result<(), PlayerError>;

    fn exit(&mut self) -> Result<(), PlayerError>;

    /// The mode the host actually reports, not what was last requested.
    fn is_active(&self) -> bool;
}

/// Abstraction for UI rendering
pub trait UiRenderer: Send {
    /// Initialize the UI (setup terminal, etc.)
    fn init(&mut self) -> Result<()>;

    /// Cleanup the UI (restore terminal, etc.)
    fn cleanup(&mut self) -> Result<()>;

    /// Render current state
    fn render(&mut self, view: &ViewState) -> Result<()>;

    /// Poll for user input (non-blocking)
    /// Returns events generated from user input
    fn poll_input(&mut self) -> Result<Vec<UiEvent>>;
}
