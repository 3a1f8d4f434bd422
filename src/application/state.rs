use crate::core::models::MediaKind;
use crate::playback::transport::PlaybackState;

/// Everything the renderer needs for one frame.
///
/// Built fresh by the application on every tick from the controller
/// snapshot; the UI layer only ever reads it. Commands flow the other way,
/// as [`UiEvent`]s through the bus.
///
/// [`UiEvent`]: crate::core::events::UiEvent
#[derive(Debug, Clone)]
pub struct ViewState {
    pub kind: MediaKind,

    /// Display rows for the playlist sidebar, in playlist order.
    pub tracks: Vec<String>,
    pub active_index: usize,

    /// List cursor, which may differ from the playing track.
    pub selected_index: usize,

    /// Title line for the now-playing pane.
    pub now_playing: String,

    pub playback: PlaybackState,

    /// Video sessions hide the control row after idle time.
    pub controls_visible: bool,
    pub fullscreen: bool,

    pub status_message: String,
    pub error_message: Option<String>,
}
