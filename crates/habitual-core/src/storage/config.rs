//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Location of the habits document
//! - Default colour for new habits
//! - Streak policy
//!
//! Configuration is stored at `~/.config/habitual/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::habit::{self, DEFAULT_COLOR};
use crate::streak::StreakPolicy;

/// Where habits are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Relative to the data directory unless absolute.
    #[serde(default = "default_habits_file")]
    pub habits_file: String,
}

/// Defaults applied to new habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitsConfig {
    #[serde(default = "default_color")]
    pub default_color: String,
}

/// Streak calculation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakConfig {
    #[serde(default)]
    pub policy: StreakPolicy,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitual/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub habits: HabitsConfig,
    #[serde(default)]
    pub streak: StreakConfig,
}

fn default_habits_file() -> String {
    "habits.json".into()
}
fn default_color() -> String {
    DEFAULT_COLOR.into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            habits_file: default_habits_file(),
        }
    }
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
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
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            // sections take a JSON object; every leaf is a string
            let new_value = match existing {
                serde_json::Value::Object(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Location of `config.toml` in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// [`Config::load`] against an explicit file.
    ///
    /// Only a missing file is replaced with defaults; any other read failure
    /// is returned so an unreadable config is never overwritten.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// [`Config::save`] against an explicit file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        habit::validate_color(&updated.habits.default_color).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Absolute path of the habits document.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn habits_path(&self) -> Result<PathBuf, ConfigError> {
        let file = Path::new(&self.storage.habits_file);
        if file.is_absolute() {
            Ok(file.to_path_buf())
        } else {
            Ok(data_dir()?.join(file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.storage.habits_file, "habits.json");
        assert_eq!(parsed.habits.default_color, "#4299e1");
        assert_eq!(parsed.streak.policy, StreakPolicy::Strict);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[streak]\npolicy = \"lenient\"\n").unwrap();
        assert_eq!(parsed.streak.policy, StreakPolicy::Lenient);
        assert_eq!(parsed.storage.habits_file, "habits.json");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("streak.policy").as_deref(), Some("strict"));
        assert_eq!(cfg.get("habits.default_color").as_deref(), Some("#4299e1"));
        assert!(cfg.get("habits.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_policy() {
        let mut cfg = Config::default();
        cfg.apply("streak.policy", "lenient").unwrap();
        assert_eq!(cfg.streak.policy, StreakPolicy::Lenient);
    }

    #[test]
    fn apply_rejects_unknown_policy() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("streak.policy", "weekly"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.streak.policy, StreakPolicy::Strict);
    }

    #[test]
    fn apply_rejects_bad_color() {
        let mut cfg = Config::default();
        assert!(cfg.apply("habits.default_color", "blue").is_err());
        cfg.apply("habits.default_color", "#FF5733").unwrap();
        assert_eq!(cfg.habits.default_color, "#FF5733");
    }

    #[test]
    fn apply_accepts_whole_section_as_json() {
        let mut cfg = Config::default();
        cfg.apply("streak", r#"{"policy": "lenient"}"#).unwrap();
        assert_eq!(cfg.streak.policy, StreakPolicy::Lenient);
        assert!(matches!(
            cfg.apply("streak", "not json"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "storage.nonexistent", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn load_from_writes_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.streak.policy, StreakPolicy::Strict);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[streak\npolicy =").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn load_from_keeps_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be: read fails, but not NotFound
        let path = dir.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
        assert!(path.is_dir());
    }

    #[test]
    fn absolute_habits_file_is_used_verbatim() {
        let mut cfg = Config::default();
        let dir = tempfile::tempdir().unwrap();
        let abs = dir.path().join("elsewhere.json");
        cfg.storage.habits_file = abs.to_string_lossy().into_owned();
        assert_eq!(cfg.habits_path().unwrap(), abs);
    }
}
