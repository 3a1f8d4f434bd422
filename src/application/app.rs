use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::bounded;
use log::warn;

use crate::application::state::ViewState;
use crate::config::{Settings, SettingsStore};
use crate::core::errors::PlayerError;
use crate::core::events::{AppEvent, EventReceiver, EventSender, UiEvent};
use crate::core::models::{MediaFile, MediaKind};
use crate::core::traits::UiRenderer;
use crate::device::rodio_device::RodioDevice;
use crate::playback::audio::AudioPlayer;
use crate::playback::transport::PlaybackState;
use crate::playback::video::VideoPlayer;
use crate::ui::presentation::TerminalPresentation;
use crate::utils::volume_percent_to_amplitude;

/// The two session shapes: an ordered audio playlist, or one video file.
pub enum Session {
    Audio(AudioPlayer<RodioDevice>),
    Video(VideoPlayer<RodioDevice, TerminalPresentation>),
}

impl Session {
    fn kind(&self) -> MediaKind {
        match self {
            Session::Audio(_) => MediaKind::Audio,
            Session::Video(_) => MediaKind::Video,
        }
    }

    fn start(&mut self) -> Result<(), PlayerError> {
        match self {
            Session::Audio(p) => p.start(),
            Session::Video(p) => p.start(),
        }
    }

    fn pump(&mut self) -> Vec<PlayerError> {
        match self {
            Session::Audio(p) => p.pump(),
            Session::Video(p) => p.pump(),
        }
    }

    fn snapshot(&self) -> PlaybackState {
        match self {
            Session::Audio(p) => p.snapshot(),
            Session::Video(p) => p.snapshot(),
        }
    }

    fn active_file(&self) -> Option<&MediaFile> {
        match self {
            Session::Audio(p) => p.active_file(),
            Session::Video(p) => p.active_file(),
        }
    }

    fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        match self {
            Session::Audio(p) => p.toggle_play_pause(),
            Session::Video(p) => p.toggle_play_pause(),
        }
    }

    fn seek_by(&mut self, delta_seconds: f64) {
        match self {
            Session::Audio(p) => p.seek_by(delta_seconds),
            Session::Video(p) => p.seek_by(delta_seconds),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        match self {
            Session::Audio(p) => p.set_volume(volume),
            Session::Video(p) => p.set_volume(volume),
        }
    }

    fn toggle_mute(&mut self) {
        match self {
            Session::Audio(p) => p.toggle_mute(),
            Session::Video(p) => p.toggle_mute(),
        }
    }

    fn shutdown(&mut self) {
        match self {
            Session::Audio(p) => p.shutdown(),
            Session::Video(p) => p.shutdown(),
        }
    }
}

/// Main application orchestrator: owns the session controller, the UI
/// renderer, and the event bus, and runs the poll → process → pump →
/// render loop.
pub struct Application {
    session: Session,
    ui: Box<dyn UiRenderer>,
    event_tx: EventSender,
    event_rx: EventReceiver,
    settings: Settings,
    store: Option<SettingsStore>,
    view: ViewState,
    running: bool,
}

impl Application {
    pub fn new(session: Session, ui: Box<dyn UiRenderer>, settings: Settings, store: Option<SettingsStore>) -> Self {
        let (event_tx, event_rx) = bounded(100);

        let tracks = match &session {
            Session::Audio(p) => p.playlist().iter().map(|f| f.to_string()).collect(),
            Session::Video(p) => p
                .active_file()
                .map(|f| vec![f.title.clone()])
                .unwrap_or_default(),
        };
        let view = ViewState {
            kind: session.kind(),
            tracks,
            active_index: 0,
            selected_index: 0,
            now_playing: String::new(),
            playback: session.snapshot(),
            controls_visible: true,
            fullscreen: false,
            status_message: "Welcome".to_string(),
            error_message: None,
        };

        Self {
            session,
            ui,
            event_tx,
            event_rx,
            settings,
            store,
            view,
            running: false,
        }
    }

    /// Run until the user quits. The terminal is always restored and the
    /// stream always released, whatever the loop exits with.
    pub fn run(&mut self) -> Result<()> {
        self.ui.init()?;
        let result = self.event_loop();

        self.session.shutdown();
        let cleanup = self.ui.cleanup();
        self.persist_settings();

        result.and(cleanup)
    }

    fn event_loop(&mut self) -> Result<()> {
        self.running = true;

        // Mint the first stream. A refusal is not fatal: the session sits
        // idle and play retries the open.
        let started = self.session.start();
        self.surface(started.err());

        while self.running {
            // Poll UI for input
            let inputs = self.ui.poll_input()?;
            if !inputs.is_empty() {
                if let Session::Video(player) = &mut self.session {
                    player.notify_activity(Instant::now());
                }
            }
            for event in inputs {
                self.event_tx.send(AppEvent::Ui(event))?;
            }

            // Process all pending events
            self.process_events()?;

            // Fold device events into the controller; surface what failed.
            let faults = self.session.pump();
            for err in faults {
                self.surface(Some(err));
            }

            if let Session::Video(player) = &mut self.session {
                player.tick(Instant::now());
            }

            self.refresh_view();
            self.ui.render(&self.view)?;

            // Small sleep to prevent CPU spinning
            std::thread::sleep(Duration::from_millis(16));
        }

        Ok(())
    }

    /// Drain all events currently in the queue.
    fn process_events(&mut self) -> Result<()> {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::Ui(ui_event) => self.handle_ui_event(ui_event)?,
                AppEvent::Shutdown => self.running = false,
            }
        }
        Ok(())
    }

    fn handle_ui_event(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::TogglePlayPauseRequested => {
                let result = self.session.toggle_play_pause();
                self.surface(result.err());
            }

            UiEvent::NextTrackRequested => {
                if let Session::Audio(player) = &mut self.session {
                    let result = player.go_to_next();
                    self.surface(result.err());
                }
            }

            UiEvent::PreviousTrackRequested => {
                if let Session::Audio(player) = &mut self.session {
                    let result = player.go_to_previous();
                    self.surface(result.err());
                }
            }

            UiEvent::SelectTrackRequested { index } => {
                if let Session::Audio(player) = &mut self.session {
                    let result = player.select_track(index);
                    self.surface(result.err());
                }
            }

            UiEvent::SeekBy { delta_seconds } => {
                self.session.seek_by(delta_seconds);
            }

            UiEvent::VolumeChangeRequested { volume } => {
                let amplitude = volume_percent_to_amplitude(volume);
                self.session.set_volume(amplitude);
                self.settings.volume = amplitude;
                self.event_tx.send(AppEvent::Ui(UiEvent::ShowMessage {
                    message: format!("Volume set to {}%", volume),
                }))?;
            }

            UiEvent::MuteToggled => {
                self.session.toggle_mute();
            }

            UiEvent::FullscreenToggled => {
                if let Session::Video(player) = &mut self.session {
                    // Denied requests are non-fatal; the reconciled state
                    // lands in the view on the next refresh.
                    let result = player.toggle_fullscreen();
                    self.surface(result.err());
                }
            }

            UiEvent::SelectionChanged { index } => {
                self.view.selected_index = index;
            }

            UiEvent::ShowMessage { message } => {
                self.view.status_message = message;
                self.view.error_message = None;
            }

            UiEvent::ShowError { message } => {
                self.view.error_message = Some(message);
            }

            UiEvent::QuitRequested => {
                self.event_tx.send(AppEvent::Shutdown)?;
            }
        }

        Ok(())
    }

    fn surface(&mut self, error: Option<PlayerError>) {
        if let Some(err) = error {
            warn!("playback fault: {err}");
            let _ = self.event_tx.send(AppEvent::Ui(UiEvent::ShowError {
                message: err.to_string(),
            }));
        }
    }

    fn refresh_view(&mut self) {
        let snapshot = self.session.snapshot();
        self.view.playback = snapshot;
        self.view.active_index = snapshot.active_index;
        self.view.now_playing = self
            .session
            .active_file()
            .map(|f| f.title.clone())
            .unwrap_or_else(|| "Nothing loaded".to_string());

        match &self.session {
            Session::Audio(_) => {
                self.view.controls_visible = true;
                self.view.fullscreen = false;
            }
            Session::Video(player) => {
                self.view.controls_visible = player.controls_visible();
                self.view.fullscreen = player.is_fullscreen();
            }
        }
    }

    fn persist_settings(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.settings) {
                warn!("could not save settings: {err}");
            }
        }
    }
}
