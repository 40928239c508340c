//! Core error types for momentum-core.
//!
//! This module defines the error taxonomy for the streak engine using
//! thiserror. The upstream transport layer maps these onto status codes
//! (validation -> 400, not-found -> 404, rate-limited -> 429).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for momentum-core.
#[derive(Error, Debug)]
pub enum StreakError {
    /// Validation errors (malformed arguments or corrupt stored state)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced user has no streak record
    #[error("User streak not found: {user_id}")]
    NotFound { user_id: String },

    /// Update attempted sooner than the rate-limit window after the last
    /// committed update. Expected outcome for losing concurrent races;
    /// the record is left untouched.
    #[error(
        "Rate limit exceeded: {elapsed_secs}s since last update, minimum is {window_secs}s"
    )]
    RateLimited { elapsed_secs: i64, window_secs: i64 },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Anything else. Fatal to the single request; never leaves a
    /// partially-mutated record.
    #[error("{0}")]
    Internal(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value for a named argument
    #[error("Invalid {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A stored record failed its structural invariants
    #[error("Invalid streak data: {message}")]
    CorruptRecord { message: String },
}

impl ValidationError {
    /// Invalid argument value, naming the argument that failed.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Structurally corrupt stored record.
    pub fn corrupt(message: impl Into<String>) -> Self {
        ValidationError::CorruptRecord {
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for StreakError
pub type Result<T, E = StreakError> = std::result::Result<T, E>;
