//! TOML-based application configuration.
//!
//! Stores user preferences for the timers:
//! - duration-selection bounds and step for the plain countdown
//! - Pomodoro phase durations
//! - default alarm mode
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::timer::AlarmMode;

/// Plain countdown configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Upper bound of the duration selection, in minutes.
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
    /// Selection step: durations snap down to a multiple of this.
    #[serde(default = "default_unit_minutes")]
    pub unit_minutes: u32,
    /// Alarm mode a fresh session starts with.
    #[serde(default)]
    pub alarm_mode: AlarmMode,
}

impl TimerConfig {
    /// Snap a selected duration to the configured step and upper bound.
    pub fn snap_minutes(&self, minutes: u32) -> u32 {
        let unit = self.unit_minutes.max(1);
        ((minutes / unit) * unit).min(self.max_minutes)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            max_minutes: default_max_minutes(),
            unit_minutes: default_unit_minutes(),
            alarm_mode: AlarmMode::default(),
        }
    }
}

/// Pomodoro cycle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
}

impl Config {
    pub fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(config)
    }

    /// Write the configuration to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn focus_ms(&self) -> u64 {
        u64::from(self.pomodoro.focus_minutes) * 60 * 1000
    }

    pub fn break_ms(&self) -> u64 {
        u64::from(self.pomodoro.break_minutes) * 60 * 1000
    }
}

fn default_max_minutes() -> u32 {
    120
}

fn default_unit_minutes() -> u32 {
    1
}

fn default_focus_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}
