//! Core error types for goodtimer-core.
//!
//! Three families matter to callers:
//! - [`ValidationError`]: a user action was rejected before any state changed.
//! - [`ConfigError`]: settings or application config failed validation or I/O.
//! - [`PersistenceError`]: the store could not write the document.
//!
//! Read failures at the store boundary are not errors at all; they are
//! reported as `None` and the caller falls back to defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for goodtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors. The rejected operation leaves all state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Tracking was started without a project selected
    #[error("Select a project before starting to track time")]
    MissingProject,

    /// A project id does not resolve to a known project
    #[error("Unknown project id {0}")]
    UnknownProject(u64),

    /// Project name is blank
    #[error("Project name must not be empty")]
    EmptyProjectName,

    /// A tracking session is already running
    #[error("A tracking session is already active")]
    TrackingActive,

    /// Report range whose end precedes its start
    #[error("Invalid date range: end ({end}) is before start ({start})")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
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

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Persistence errors surfaced from store conveniences.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// The document could not be written
    #[error("Failed to save the time document")]
    SaveFailed,

    /// Export collaborator reported failure
    #[error("Export failed")]
    ExportFailed,

    /// Import collaborator returned no document
    #[error("Import failed: no readable document")]
    ImportFailed,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
