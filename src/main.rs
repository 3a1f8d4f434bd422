mod application;
mod cli;
mod config;
mod core;
mod device;
mod playback;
mod source;
mod ui;
mod utils;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use log::warn;

use crate::application::app::{Application, Session};
use crate::cli::{Cli, Commands};
use crate::config::{Settings, SettingsStore};
use crate::core::models::MediaKind;
use crate::device::rodio_device::RodioDevice;
use crate::playback::audio::AudioPlayer;
use crate::playback::video::VideoPlayer;
use crate::ui::presentation::TerminalPresentation;
use crate::ui::tui::TuiRenderer;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play { paths } => run_player(paths),
    }
}

fn run_player(paths: Vec<PathBuf>) -> Result<()> {
    let playlist = source::build_playlist(&paths)?;

    let store = match SettingsStore::new() {
        Ok(store) => Some(store),
        Err(err) => {
            warn!("settings unavailable: {err}");
            None
        }
    };
    let settings = store
        .as_ref()
        .and_then(|s| match s.load() {
            Ok(settings) => Some(settings),
            Err(err) => {
                warn!("could not load settings: {err}");
                None
            }
        })
        .unwrap_or_else(Settings::default);

    let device = RodioDevice::new()?;
    let session = match playlist.kind() {
        MediaKind::Audio => Session::Audio(AudioPlayer::new(
            device,
            playlist,
            settings.advance,
            settings.volume,
        )),
        MediaKind::Video => Session::Video(VideoPlayer::new(
            device,
            playlist,
            TerminalPresentation::new(),
            Duration::from_secs(settings.hide_controls_secs),
            settings.volume,
            Instant::now(),
        )),
    };

    let mut app = Application::new(session, Box::new(TuiRenderer::new()), settings, store);
    app.run()
}
