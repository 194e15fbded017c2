//! Core error types for intake-core.
//!
//! This module defines the error hierarchy using thiserror. Engine-internal
//! degradation (unknown answer types, unresolvable module references,
//! unparseable conditions) never surfaces here; those paths degrade and are
//! counted in [`crate::diagnostics::Diagnostics`]. Hard errors are reserved
//! for the artifact and configuration boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for intake-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Artifact-related errors
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors reading or writing JSON artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Failed to read an artifact file
    #[error("Failed to read artifact at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an artifact file
    #[error("Failed to write artifact at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact contents could not be parsed
    #[error("Failed to parse artifact at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Duplicate question identifier across the catalog
    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(String),

    /// Question claims a module it does not belong to
    #[error("Question '{question_id}' carries module '{actual}', expected '{expected}'")]
    ModuleMismatch {
        question_id: String,
        expected: String,
        actual: String,
    },

    /// Day number outside the 14-day window
    #[error("Day {0} is outside the schedule window (1-14)")]
    DayOutOfRange(u32),

    /// Unknown persona name
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
