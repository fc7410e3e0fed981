// src/models/mod.rs

//! Domain models for the monitor.
//!
//! This module contains the data structures shared by the services and the
//! pipeline, organized by their primary purpose.

mod config;
mod report;
mod secrets;
mod snapshot;

// Re-export all public types
pub use config::{Config, EmailConfig, HttpConfig, LoggingConfig, StorageConfig, SummaryConfig};
pub use report::{Report, SUBJECT_CHANGES, SUBJECT_ERROR, SUBJECT_NO_CHANGES};
pub use secrets::Secrets;
pub use snapshot::Snapshot;

/// Environment variable names read by [`Secrets::from_env`].
pub mod env {
    pub use super::secrets::{
        CLAUDE_API_KEY, PDF_URL, RECIPIENT_EMAIL, SENDER_EMAIL, SENDER_PASSWORD,
    };
}
