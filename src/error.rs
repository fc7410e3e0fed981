// src/error.rs

//! Unified error handling for the monitor.
//!
//! Fetch, extraction and persistence failures propagate to the top-level
//! error path. Summarization and notification failures are captured at
//! their component boundary and never leave it as an `Err`.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document download failed (network, timeout, non-2xx status)
    #[error("Failed to download {url}: {message}")]
    Fetch { url: String, message: String },

    /// Document bytes could not be parsed at all
    #[error("Failed to extract PDF text: {0}")]
    Extraction(String),

    /// Language-model call failed
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// Email delivery failed
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Snapshot could not be written
    #[error("Failed to persist snapshot to {path}: {message}")]
    Persistence { path: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction error.
    pub fn extraction(message: impl fmt::Display) -> Self {
        Self::Extraction(message.to_string())
    }

    /// Create a summarization error.
    pub fn summarization(message: impl fmt::Display) -> Self {
        Self::Summarization(message.to_string())
    }

    /// Create a notification error.
    pub fn notification(message: impl fmt::Display) -> Self {
        Self::Notification(message.to_string())
    }

    /// Create a persistence error for the given path.
    pub fn persistence(path: &Path, message: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
