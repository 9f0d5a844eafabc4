//! Listing-authoring core for CraftVista.
//!
//! Two services carry the behaviour: [`application::SessionManager`] owns the
//! signed-in artisan, and [`application::ListingWorkflow`] walks one draft from
//! seller input to a published listing. Everything outside the process sits
//! behind three ports (identity, content generation, listing storage) that
//! `craftvista-adapters` implements.
//!
//! ```text
//!  craftvista-cli ──drives──▶ SessionManager / ListingWorkflow
//!                                   │ awaits
//!                                   ▼
//!         IdentityProvider · ContentGenerator · ListingStore   (ports)
//!                                   ▲ implements
//!                                   │
//!                           craftvista-adapters
//! ```
//!
//! [`domain`] is synchronous and I/O free; the services add the async edges,
//! timeouts and stale-response handling.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo(
//! #     identity: std::sync::Arc<dyn craftvista_core::application::IdentityProvider>,
//! #     generator: std::sync::Arc<dyn craftvista_core::application::ContentGenerator>,
//! #     store: std::sync::Arc<dyn craftvista_core::application::ListingStore>,
//! # ) -> craftvista_core::error::CraftResult<()> {
//! use std::sync::Arc;
//! use craftvista_core::prelude::*;
//!
//! let session = Arc::new(SessionManager::new(identity));
//! session.sign_in(&Credential::new("id-token")).await?;
//!
//! let workflow = ListingWorkflow::new(session, generator, store, WorkflowConfig::default());
//! let input = DraftInput::new(Category::Pottery, "handmade bowl").with_material("clay");
//! workflow.request_generation(input).await?;
//! workflow.edit_generated(ContentField::SuggestedPrice, 900.0.into())?;
//! let listing_id = workflow.publish().await?;
//! # let _ = listing_id;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        ApplicationError, AuthError, ContentGenerator, Credential, GenerationError,
        GenerationRequest, IdentityProvider, ListingStore, ListingWorkflow, NewListing,
        SessionManager, StoreError, StoryRequest, WorkflowConfig,
    };
    pub use crate::domain::{
        Category, ContentField, DomainError, DraftId, DraftInput, DraftStatus, FieldValue,
        GeneratedContent, ListingDraft, ListingId, Operation, Principal, PrincipalId, Role,
    };
    pub use crate::error::{CraftError, CraftResult};
}
