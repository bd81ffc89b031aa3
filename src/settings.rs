//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/tetrs-engine/settings.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors from loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Drop timer settings
    pub timing: TimingSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
}

/// Drop timer settings, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Interval of the first tick after a (re)start
    pub initial_interval_ms: u64,
    /// How much every spawn shortens the interval
    pub interval_step_ms: u64,
    /// Fastest the interval may get
    pub min_interval_ms: u64,
}

/// Gameplay settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Fixed randomizer seed; random per game when unset
    pub seed: Option<u64>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            initial_interval_ms: 800,
            interval_step_ms: 20,
            min_interval_ms: 250,
        }
    }
}

impl TimingSettings {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn interval_step(&self) -> Duration {
        Duration::from_millis(self.interval_step_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs-engine")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the config dir, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load and validate settings from a file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the config dir
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a file, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)?;

        Ok(())
    }

    /// Check that the timing values make sense together
    pub fn validate(&self) -> Result<(), SettingsError> {
        let timing = &self.timing;
        if timing.min_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "min_interval_ms must be greater than 0".to_string(),
            ));
        }
        if timing.initial_interval_ms < timing.min_interval_ms {
            return Err(SettingsError::Invalid(format!(
                "initial_interval_ms ({}) is below min_interval_ms ({})",
                timing.initial_interval_ms, timing.min_interval_ms
            )));
        }
        Ok(())
    }
}
