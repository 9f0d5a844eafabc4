// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for CraftVista.
//!
//! This module contains the listing-draft business rules with no I/O.
//! Identity, content generation and persistence are reached through ports
//! (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: `tracing` belongs to the application and CLI layers
//! - **All-or-nothing transitions**: a failed transition never mutates
//! - **Rich domain model**: Behavior lives in entities, not services
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    content::{FieldValue, GeneratedContent, Provenance, ReviewedContent, validate_price},
    draft_input::{DraftInput, VoiceNoteRef},
    listing_draft::{
        DraftId, DraftPhase, FailureRecord, GenerationTicket, ListingDraft, ListingId,
        PublishTicket, StoryTicket,
    },
    principal::{Principal, PrincipalId},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{Category, ContentField, DraftStatus, Operation, Role};

pub use validation::DomainValidator;
