//! Error types for Corechat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Corechat operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, provider interactions, session persistence,
/// share-link handling, and telemetry polling.
#[derive(Error, Debug)]
pub enum CorechatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Session storage errors (durable slot operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Share-link encoding/decoding errors
    #[error("Share link error: {0}")]
    Share(String),

    /// Telemetry fetch errors
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// Session lookup failures (stale or unknown identifier)
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Corechat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
