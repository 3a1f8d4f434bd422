use thiserror::Error;

/// Non-fatal playback faults surfaced to the caller.
///
/// Every variant is recoverable by retry or user re-action; none tears down
/// the controller. Device-specific error values are converted into one of
/// these at the call site and never cross the controller boundary.
#[derive(Debug, Clone, Error)]
pub enum PlayerError {
    /// The device refused to open or stream a file.
    #[error("cannot open {name}: {reason}")]
    Resource { name: String, reason: String },

    /// The device rejected a transport command (play, pause, seek).
    #[error("playback rejected: {reason}")]
    Playback { reason: String },

    /// The host denied or does not support exclusive presentation.
    #[error("presentation request failed: {reason}")]
    Presentation { reason: String },
}

impl PlayerError {
    pub fn playback(reason: impl Into<String>) -> Self {
        PlayerError::Playback { reason: reason.into() }
    }

    pub fn presentation(reason: impl Into<String>) -> Self {
        PlayerError::Presentation { reason: reason.into() }
    }
}
