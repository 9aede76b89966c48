//! Player preferences
//!
//! Persisted separately from runs: LocalStorage on the web, a JSON file on
//! native. Anything unreadable falls back to defaults.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base scroll speed presets, slowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum SpeedMode {
    Chill,
    #[default]
    Normal,
    Blitz,
}

impl SpeedMode {
    pub const ALL: [SpeedMode; 3] = [SpeedMode::Chill, SpeedMode::Normal, SpeedMode::Blitz];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedMode::Chill => "Chill",
            SpeedMode::Normal => "Normal",
            SpeedMode::Blitz => "Blitz",
        }
    }

    /// Starting scroll speed (px per normalized frame)
    pub fn base_speed(&self) -> f32 {
        match self {
            SpeedMode::Chill => 4.5,
            SpeedMode::Normal => 6.0,
            SpeedMode::Blitz => 8.0,
        }
    }
}

impl FromStr for SpeedMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chill" | "slow" => Ok(SpeedMode::Chill),
            "normal" | "medium" => Ok(SpeedMode::Normal),
            "blitz" | "fast" => Ok(SpeedMode::Blitz),
            _ => Err(SettingsError::UnknownSpeedMode(s.to_string())),
        }
    }
}

/// Native file store failures (settings and leaderboard)
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown speed mode {0:?}")]
    UnknownSpeedMode(String),
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Read at session start
    #[serde(default)]
    pub speed_mode: SpeedMode,
}

impl Settings {
    /// LocalStorage key / native file name
    const STORAGE_KEY: &'static str = "quiz_runner_settings";

    /// Parse stored preferences, silently falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::debug!("Ignoring stored settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(Self::native_path())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        if let Err(e) = self.save_to(Self::native_path()) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn native_path() -> std::path::PathBuf {
        std::path::PathBuf::from(format!("{}.json", Self::STORAGE_KEY))
    }

    /// Read a settings file; missing or broken files give defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => Self::from_json(&json),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
