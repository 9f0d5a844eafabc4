//! One JSON document per listing, named by idempotency key.
//!
//! A listing is written and synced under a unique temporary name in the same
//! directory, then hard-linked to `{key}.json`. The link fails if the final
//! name exists, so two publishes of the same draft can never both commit and
//! the loser reads the winner's listing id. A cancelled or crashed attempt
//! leaves at most a stray temporary file, never a partial `{key}.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use craftvista_core::{
    application::{ListingStore, NewListing, StoreError},
    domain::{DraftId, ListingId},
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use super::StoredListing;

/// File-backed listing store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &DraftId) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn staging_path_for(&self, key: &DraftId) -> PathBuf {
        self.root
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()))
    }

    /// Read back the listing stored for `key`.
    pub async fn load(&self, key: &DraftId) -> Result<StoredListing, StoreError> {
        let path = self.path_for(key);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| io_error(&path, "read", e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Unavailable(format!("corrupt listing {}: {e}", path.display())))
    }

    async fn duplicate_of(&self, key: &DraftId) -> StoreError {
        match self.load(key).await {
            Ok(existing) => {
                debug!(listing = %existing.id, "Listing file already present");
                StoreError::DuplicateListing {
                    listing_id: existing.id,
                }
            }
            Err(err) => err,
        }
    }
}

#[async_trait]
impl ListingStore for JsonFileStore {
    async fn create(&self, listing: &NewListing) -> Result<ListingId, StoreError> {
        let key = &listing.idempotency_key;
        let path = self.path_for(key);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(self.duplicate_of(key).await);
        }

        let stored = StoredListing::assign(listing);
        let bytes = serde_json::to_vec_pretty(&stored)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(&self.root, "create directory", e))?;

        let staging = Staging::new(self.staging_path_for(key));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(staging.path())
            .await
            .map_err(|e| io_error(staging.path(), "create", e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| io_error(staging.path(), "write", e))?;
        file.sync_all()
            .await
            .map_err(|e| io_error(staging.path(), "sync", e))?;
        drop(file);

        match tokio::fs::hard_link(staging.path(), &path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(self.duplicate_of(key).await);
            }
            Err(e) => return Err(io_error(&path, "commit", e)),
        }

        info!(listing = %stored.id, path = %path.display(), "Listing written");
        Ok(stored.id)
    }
}

/// A temporary file removed when dropped, including when the owning future
/// is cancelled mid-write.
struct Staging {
    path: PathBuf,
}

impl Staging {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Could not remove staging file");
            }
        }
    }
}

fn io_error(path: &Path, operation: &str, e: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("failed to {operation} {}: {e}", path.display()))
}
