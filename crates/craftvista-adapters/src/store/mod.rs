//! Listing store adapters.

pub mod json_file;
pub mod memory;

use chrono::{DateTime, Utc};
use craftvista_core::{
    application::NewListing,
    domain::ListingId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use json_file::JsonFileStore;
pub use memory::InMemoryListingStore;

/// A listing as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredListing {
    pub id: ListingId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub listing: NewListing,
}

impl StoredListing {
    fn assign(listing: &NewListing) -> Self {
        Self {
            id: ListingId::new(format!("lst-{}", Uuid::new_v4().simple())),
            created_at: Utc::now(),
            listing: listing.clone(),
        }
    }
}
