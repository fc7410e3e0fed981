//! Snapshot persistence.
//!
//! Exactly one snapshot is kept: the text of the most recent successful
//! run. Absence of a snapshot is a valid state meaning "no prior run".
//!
//! Runs are expected to be scheduled without overlap. There is no locking;
//! two concurrent runs would race on the snapshot file.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about the stored snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Size in bytes
    pub bytes: usize,
    /// Hex SHA-256 of the stored text
    pub digest: String,
    /// Last modification time, when the filesystem reports one
    pub modified: Option<DateTime<Local>>,
}

/// Trait for snapshot storage backends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the previous snapshot, `None` if no run has stored one yet.
    async fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
