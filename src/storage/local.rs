//! Local filesystem storage implementation.
//!
//! The snapshot is a single UTF-8 text file. Writes go to a sibling
//! `.tmp` file first and are renamed into place, so a crash mid-write
//! leaves the previous baseline intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::{SnapshotInfo, SnapshotStore};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Describe the stored snapshot without loading it into the pipeline.
    pub async fn info(&self) -> Result<Option<SnapshotInfo>> {
        let Some(snapshot) = self.load().await? else {
            return Ok(None);
        };
        let modified = tokio::fs::metadata(&self.path)
            .await?
            .modified()
            .ok()
            .map(DateTime::<Local>::from);

        Ok(Some(SnapshotInfo {
            bytes: snapshot.len(),
            digest: snapshot.digest(),
            modified,
        }))
    }
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn load(&self) -> Result<Option<Snapshot>> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let text = match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(e) => {
                        log::warn!(
                            "Snapshot {} is not valid UTF-8, decoding lossily",
                            self.path.display()
                        );
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                };
                Ok(Some(Snapshot::from(text)))
            }
            None => {
                log::info!("No previous snapshot at {}", self.path.display());
                Ok(None)
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.write_bytes(snapshot.text().as_bytes())
            .await
            .map_err(|e| AppError::persistence(&self.path, e))?;
        log::info!(
            "Snapshot saved to {} ({} bytes, sha256 {})",
            self.path.display(),
            snapshot.len(),
            snapshot.short_digest()
        );
        Ok(())
    }
}
