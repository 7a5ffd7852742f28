//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Reminder lead time
//! - Calendar display limit and first weekday
//! - Summary window and upcoming list size
//! - Recurrence step cap
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::{WeekStart, DEFAULT_DISPLAY_LIMIT};
use crate::error::ConfigError;
use crate::recurrence::{RecurrenceEngine, DEFAULT_MAX_STEPS};
use crate::reminder::{DEFAULT_MINUTES_BEFORE, MAX_MINUTES_BEFORE};
use crate::summary::{DEFAULT_UPCOMING_LIMIT, DEFAULT_WINDOW_DAYS};

/// Reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_minutes_before")]
    pub minutes_before: i64,
}

/// Calendar view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    #[serde(default)]
    pub week_starts_on: WeekStart,
}

/// Sidebar summary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u64,
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
}

/// Recurrence expansion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub recurrence: RecurrenceConfig,
}

fn default_true() -> bool {
    true
}
fn default_minutes_before() -> i64 {
    DEFAULT_MINUTES_BEFORE
}
fn default_display_limit() -> usize {
    DEFAULT_DISPLAY_LIMIT
}
fn default_window_days() -> u64 {
    DEFAULT_WINDOW_DAYS
}
fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}
fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minutes_before: default_minutes_before(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
            week_starts_on: WeekStart::default(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            upcoming_limit: default_upcoming_limit(),
        }
    }
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<i64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Reject values that parse but cannot be used.
    fn validate(&self) -> Result<(), ConfigError> {
        let minutes = self.reminders.minutes_before;
        if !(0..=MAX_MINUTES_BEFORE).contains(&minutes) {
            return Err(ConfigError::InvalidValue {
                key: "reminders.minutes_before".to_string(),
                message: format!("{minutes} is outside 0..={MAX_MINUTES_BEFORE}"),
            });
        }
        Ok(())
    }

    /// Default location of `config.toml`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed or holds an
    /// unusable value, or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not fit the
    /// field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Engine on the local clock with the configured step cap.
    pub fn engine(&self) -> RecurrenceEngine<chrono::Local> {
        RecurrenceEngine::local().with_max_steps(self.recurrence.max_steps)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
