//! Application layer for CraftVista.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (SessionManager, ListingWorkflow)
//! - **Ports**: Interface definitions (traits) for external collaborators
//! - **Errors**: Application and port error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{ListingWorkflow, SessionManager, SessionState, WorkflowConfig};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ContentGenerator, Credential, GenerationRequest, IdentityProvider, ListingStore, NewListing,
    StoryRequest,
};

pub use error::{ApplicationError, AuthError, GenerationError, StoreError};
