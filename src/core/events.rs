use std::time::Duration;

/// Monotonic identity of a minted stream. Device events carry the id they
/// were issued against so callbacks that outlive a track switch can be
/// recognized as stale and dropped.
pub type HandleId = u64;

/// All events that flow through the application bus.
#[derive(Debug, Clone)]
pub enum AppEvent {
    // User commands from the UI
    Ui(UiEvent),

    // Application lifecycle
    Shutdown,
}

/// Lifecycle events emitted by the playback device.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// Stream metadata is known; the duration is authoritative.
    MetadataReady { handle: HandleId, duration: Duration },

    /// Playback position moved. Emitted at device cadence, not on request.
    PositionChanged { handle: HandleId, position: Duration },

    /// The stream ran out naturally.
    Ended { handle: HandleId },

    /// The device failed mid-stream.
    Error { handle: HandleId, reason: String },
}

impl DeviceEvent {
    /// Handle the event was issued against.
    pub fn handle(&self) -> HandleId {
        match self {
            DeviceEvent::MetadataReady { handle, .. }
            | DeviceEvent::PositionChanged { handle, .. }
            | DeviceEvent::Ended { handle }
            | DeviceEvent::Error { handle, .. } => *handle,
        }
    }
}

/// User commands from the terminal UI.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Flip between playing and paused
    TogglePlayPauseRequested,

    /// Jump to the next playlist entry (audio sessions)
    NextTrackRequested,

    /// Jump to the previous playlist entry (audio sessions)
    PreviousTrackRequested,

    /// Play a specific playlist entry
    SelectTrackRequested { index: usize },

    /// Move the playback position by a signed number of seconds
    SeekBy { delta_seconds: f64 },

    /// User requested volume change (0-100)
    VolumeChangeRequested { volume: u8 },

    /// Flip mute on or off
    MuteToggled,

    /// Enter or leave exclusive presentation (video sessions)
    FullscreenToggled,

    /// List cursor moved
    SelectionChanged { index: usize },

    /// Display message to user
    ShowMessage { message: String },

    /// Display error to user
    ShowError { message: String },

    /// User requested quit
    QuitRequested,
}

/// Type alias for event sender
pub type EventSender = crossbeam_channel::Sender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = crossbeam_channel::Receiver<AppEvent>;
