//! TOML-based application settings.
//!
//! Stored at `~/.config/pomotrack/config.toml`:
//!
//! ```toml
//! [durations]
//! pomodoro = 25
//! short_break = 5
//! long_break = 15
//! ```
//!
//! Durations are whole minutes. Zero means "use the default".

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{data_dir, Repository};
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::IntervalConfig;

/// Interval durations in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSettings {
    #[serde(default = "default_pomodoro")]
    pub pomodoro: u64,
    #[serde(default = "default_short_break")]
    pub short_break: u64,
    #[serde(default = "default_long_break")]
    pub long_break: u64,
}

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub durations: DurationSettings,
}

fn default_pomodoro() -> u64 {
    25
}
fn default_short_break() -> u64 {
    5
}
fn default_long_break() -> u64 {
    15
}

impl Default for DurationSettings {
    fn default() -> Self {
        Self {
            pomodoro: default_pomodoro(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 3] = [
        "durations.pomodoro",
        "durations.short_break",
        "durations.long_break",
    ];

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Load from `path`, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a value by dot-separated key.
    pub fn get(&self, key: &str) -> Option<u64> {
        match key {
            "durations.pomodoro" => Some(self.durations.pomodoro),
            "durations.short_break" => Some(self.durations.short_break),
            "durations.long_break" => Some(self.durations.long_break),
            _ => None,
        }
    }

    /// Set a value by dot-separated key. Does not save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let minutes: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{value}' is not a whole number of minutes"),
        })?;
        let slot = match key {
            "durations.pomodoro" => &mut self.durations.pomodoro,
            "durations.short_break" => &mut self.durations.short_break,
            "durations.long_break" => &mut self.durations.long_break,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "unknown config key".into(),
                }
                .into())
            }
        };
        *slot = minutes;
        Ok(())
    }

    /// Build the runtime interval config on top of `repo`.
    pub fn interval_config(&self, repo: Arc<dyn Repository>) -> IntervalConfig {
        IntervalConfig::new(
            repo,
            minutes(self.durations.pomodoro),
            minutes(self.durations.short_break),
            minutes(self.durations.long_break),
        )
    }
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m.saturating_mul(60))
}
