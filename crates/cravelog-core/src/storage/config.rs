//! TOML-based application configuration.
//!
//! Stores the settings the digest depends on:
//! - Calendar timezone used for week boundaries
//! - Weekday and time at which the current week's digest unlocks
//!
//! Configuration is stored at `~/.config/cravelog/config.toml`.

use std::path::PathBuf;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::calendar::ZonedCalendar;
use crate::digest::UnlockSchedule;
use crate::error::{ConfigError, Result};

/// Calendar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// IANA timezone name, e.g. `Europe/Berlin`.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// When the current week's digest becomes available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockConfig {
    #[serde(default = "default_unlock_weekday")]
    pub weekday: String,
    #[serde(default = "default_unlock_hour")]
    pub hour: u32,
    #[serde(default = "default_unlock_minute")]
    pub minute: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cravelog/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub unlock: UnlockConfig,
}

fn default_timezone() -> String {
    "UTC".into()
}
fn default_unlock_weekday() -> String {
    "Mon".into()
}
fn default_unlock_hour() -> u32 {
    12
}
fn default_unlock_minute() -> u32 {
    15
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            weekday: default_unlock_weekday(),
            hour: default_unlock_hour(),
            minute: default_unlock_minute(),
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
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: format!("cannot parse '{value}' as number"),
                        })?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown())
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

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                }
                .into()
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
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

    /// Every settable dot-separated key, sorted, e.g. `unlock.hour`.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            Self::collect_keys(&json, "", &mut keys);
        }
        keys
    }

    fn collect_keys(value: &serde_json::Value, prefix: &str, keys: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(map) => {
                for (name, child) in map {
                    let path = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{prefix}.{name}")
                    };
                    Self::collect_keys(child, &path, keys);
                }
            }
            _ => keys.push(prefix.to_string()),
        }
    }

    /// Set a config value by key, validate the result and save it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// or fails validation, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let updated = self.with_value(key, value)?;
        *self = updated;
        self.save()
    }

    /// A copy of this config with `key` set to `value`, validated.
    fn with_value(&self, key: &str, value: &str) -> Result<Self> {
        let mut json = serde_json::to_value(self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.calendar()?;
        updated.unlock_schedule()?;
        Ok(updated)
    }

    /// Calendar for the configured timezone.
    pub fn calendar(&self) -> Result<ZonedCalendar, ConfigError> {
        ZonedCalendar::from_name(&self.calendar.timezone).ok_or_else(|| ConfigError::InvalidValue {
            key: "calendar.timezone".to_string(),
            message: format!("unknown timezone '{}'", self.calendar.timezone),
        })
    }

    /// Unlock schedule from the `[unlock]` table.
    pub fn unlock_schedule(&self) -> Result<UnlockSchedule, ConfigError> {
        let weekday = self
            .unlock
            .weekday
            .parse::<Weekday>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "unlock.weekday".to_string(),
                message: format!("unknown weekday '{}'", self.unlock.weekday),
            })?;
        UnlockSchedule::new(weekday, self.unlock.hour, self.unlock.minute).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "unlock".to_string(),
                message: format!(
                    "{}:{:02} is not a valid time of day",
                    self.unlock.hour, self.unlock.minute
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.calendar.timezone, "UTC");
        assert_eq!(parsed.unlock.hour, 12);
        assert_eq!(parsed.unlock.minute, 15);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[calendar]\ntimezone = \"Europe/Berlin\"\n").unwrap();
        assert_eq!(parsed.calendar.timezone, "Europe/Berlin");
        assert_eq!(parsed.unlock.weekday, "Mon");
    }

    #[test]
    fn test_get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("calendar.timezone").as_deref(), Some("UTC"));
        assert_eq!(cfg.get("unlock.hour").as_deref(), Some("12"));
        assert!(cfg.get("unlock.missing_key").is_none());
    }

    #[test]
    fn test_keys_lists_leaf_paths() {
        let keys = Config::default().keys();
        assert_eq!(
            keys,
            vec!["calendar.timezone", "unlock.hour", "unlock.minute", "unlock.weekday"]
        );
        for key in &keys {
            assert!(Config::default().get(key).is_some());
        }
    }

    #[test]
    fn test_with_value_updates_nested_number() {
        let cfg = Config::default().with_value("unlock.hour", "18").unwrap();
        assert_eq!(cfg.unlock.hour, 18);
    }

    #[test]
    fn test_with_value_updates_nested_string() {
        let cfg = Config::default()
            .with_value("calendar.timezone", "Asia/Tokyo")
            .unwrap();
        assert_eq!(cfg.calendar.timezone, "Asia/Tokyo");
    }

    #[test]
    fn test_with_value_rejects_unknown_key() {
        assert!(Config::default().with_value("unlock.second", "3").is_err());
        assert!(Config::default().with_value("", "3").is_err());
    }

    #[test]
    fn test_with_value_rejects_invalid_values() {
        assert!(Config::default().with_value("unlock.hour", "noon").is_err());
        assert!(Config::default().with_value("unlock.hour", "24").is_err());
        assert!(Config::default().with_value("unlock.weekday", "Funday").is_err());
        assert!(Config::default().with_value("calendar.timezone", "Mars/Base").is_err());
    }

    #[test]
    fn test_default_unlock_schedule() {
        let schedule = Config::default().unlock_schedule().unwrap();
        assert_eq!(schedule, UnlockSchedule::default());
    }

    #[test]
    fn test_long_weekday_names_parse() {
        let mut cfg = Config::default();
        cfg.unlock.weekday = "friday".to_string();
        assert_eq!(cfg.unlock_schedule().unwrap().weekday, Weekday::Fri);
    }
}
