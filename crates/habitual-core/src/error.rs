//! Core error types for habitual-core.
//!
//! Validation and lookup failures never mutate the store. A missing or
//! malformed habits document is not an error at all (see
//! [`HabitStore::load`](crate::storage::HabitStore::load)); a failed write is.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitual-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No habit with the given id
    #[error("Habit not found: {id}")]
    NotFound { id: String },

    /// Persisting the habits document failed
    #[error("Failed to write habits to {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit name missing
    #[error("Habit name cannot be empty")]
    EmptyName,

    /// Completion date later than today
    #[error("Cannot mark {date} complete: it is after today ({today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    /// Colour tag not in `#RRGGBB` form
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    /// Month outside 1..=12
    #[error("Invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Data directory could not be created
    #[error("Failed to access data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl CoreError {
    /// Convenience constructor for [`CoreError::NotFound`].
    pub fn not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound { id: id.into() }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_converts_into_core_error() {
        let err: CoreError = ValidationError::EmptyName.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyName)));
        assert_eq!(err.to_string(), "Validation error: Habit name cannot be empty");
    }

    #[test]
    fn future_date_message_names_both_dates() {
        let err = ValidationError::FutureDate {
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            today: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-03-02"));
        assert!(msg.contains("2024-03-01"));
    }

    #[test]
    fn not_found_display() {
        assert_eq!(CoreError::not_found("abc").to_string(), "Habit not found: abc");
    }
}
