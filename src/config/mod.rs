use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::models::AdvanceMode;
use crate::utils::APP_NAME;

/// User settings, stored as TOML in the platform config directory.
///
/// Only preferences live here; playback sessions (playlist, position) are
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial amplitude, 0.0..=1.0.
    pub volume: f32,
    /// What to do when the last track ends naturally.
    pub advance: AdvanceMode,
    /// Seconds of inactivity before video controls hide.
    pub hide_controls_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            advance: AdvanceMode::Loop,
            hide_controls_secs: 3,
        }
    }
}

pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push(APP_NAME);

        fs::create_dir_all(&path)?;

        path.push("config.toml");
        Ok(Self { file_path: path })
    }

    pub fn load(&self) -> Result<Settings> {
        if !self.file_path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.file_path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content = toml::to_string_pretty(settings)?;
        fs::write(&self.file_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_loop_at_full_volume() {
        let s = Settings::default();
        assert_eq!(s.volume, 1.0);
        assert_eq!(s.advance, AdvanceMode::Loop);
        assert_eq!(s.hide_controls_secs, 3);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let s: Settings = toml::from_str("advance = \"stop\"").unwrap();
        assert_eq!(s.advance, AdvanceMode::Stop);
        assert_eq!(s.volume, 1.0);
    }

    #[test]
    fn settings_survive_a_toml_round_trip() {
        let original = Settings {
            volume: 0.4,
            advance: AdvanceMode::Stop,
            hide_controls_secs: 5,
        };
        let text = toml::to_string_pretty(&original).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.volume, original.volume);
        assert_eq!(back.advance, original.advance);
        assert_eq!(back.hide_controls_secs, original.hide_controls_secs);
    }
}
