//! Infrastructure adapters for CraftVista.
//!
//! This crate implements the ports defined in `craftvista_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod generator;
pub mod identity;
pub mod store;

// Re-export commonly used adapters
pub use generator::{GeminiGenerator, TemplateGenerator};
pub use identity::{GoogleIdentityProvider, StaticIdentityProvider};
pub use store::{InMemoryListingStore, JsonFileStore, StoredListing};
