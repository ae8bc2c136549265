//! Error types for chatlist
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for chatlist operations
///
/// Fetch failures are the only errors the conversation list itself cares
/// about; the remaining variants cover configuration, the local message
/// store and the serialization layers underneath the sources.
#[derive(Error, Debug)]
pub enum ChatListError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend could not produce a conversation record collection
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Local message store errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

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

/// Result type alias for chatlist operations
///
/// Uses `anyhow::Error` as the error type, allowing for rich error context
/// and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
