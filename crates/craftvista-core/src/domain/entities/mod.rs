pub mod content;
pub mod draft_input;
pub mod listing_draft;
pub mod principal;

pub use crate::domain::DomainError;
pub use content::{FieldValue, GeneratedContent, Provenance, ReviewedContent};
pub use draft_input::{DraftInput, VoiceNoteRef};
pub use listing_draft::{
    DraftId, DraftPhase, FailureRecord, GenerationTicket, ListingDraft, ListingId, PublishTicket,
    StoryTicket,
};
pub use principal::{Principal, PrincipalId};
