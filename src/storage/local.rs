//! Local filesystem snapshot storage.
//!
//! Keeps the snapshot as a pretty-printed JSON array. A missing file is an
//! empty snapshot, which makes the first run report every listing as new.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Listing;
use crate::storage::SnapshotStore;

/// Local filesystem snapshot backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn read_listings(&self) -> Result<Vec<Listing>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::info!("No snapshot at {}, starting empty", self.path.display());
                Ok(Vec::new())
            }
        }
    }

    async fn write_listings(&self, listings: &[Listing]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(listings)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Wrote {} listings to {}",
            listings.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn load_snapshot(&self) -> Result<Vec<Listing>> {
        self.read_listings()
            .await
            .map_err(|e| AppError::store("load", e))
    }

    async fn save_snapshot(&self, listings: &[Listing]) -> Result<()> {
        self.write_listings(listings)
            .await
            .map_err(|e| AppError::store("save", e))
    }
}
