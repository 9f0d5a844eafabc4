//! In-memory listing store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use craftvista_core::{
    application::{ListingStore, NewListing, StoreError},
    domain::{DraftId, ListingId},
};
use tracing::debug;

use super::StoredListing;

/// Thread-safe in-memory store keyed by idempotency key.
#[derive(Clone, Default)]
pub struct InMemoryListingStore {
    inner: Arc<RwLock<HashMap<DraftId, StoredListing>>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The listing created for `key`, if any.
    pub fn get(&self, key: &DraftId) -> Option<StoredListing> {
        self.inner.read().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn create(&self, listing: &NewListing) -> Result<ListingId, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("listing store lock poisoned".into()))?;

        if let Some(existing) = inner.get(&listing.idempotency_key) {
            return Err(StoreError::DuplicateListing {
                listing_id: existing.id.clone(),
            });
        }

        let stored = StoredListing::assign(listing);
        let id = stored.id.clone();
        inner.insert(listing.idempotency_key, stored);
        debug!(listing = %id, "Listing stored in memory");
        Ok(id)
    }
}
