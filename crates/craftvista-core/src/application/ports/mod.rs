//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `craftvista-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `IdentityProvider`: Credential exchange
//!   - `ContentGenerator`: AI listing copy
//!   - `ListingStore`: Listing persistence
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (`SessionManager` and `ListingWorkflow` are used directly by the CLI)

pub mod output;

pub use output::{
    ContentGenerator, Credential, GenerationRequest, IdentityProvider, ListingStore, NewListing,
    StoryRequest,
};

#[cfg(test)]
pub use output::{MockContentGenerator, MockIdentityProvider, MockListingStore};
