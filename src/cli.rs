use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::APP_NAME;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Terminal player for local audio and video files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play local media files
    Play {
        /// Audio files (or directories of them), or a single video file
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}
