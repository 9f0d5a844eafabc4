//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `craftvista-adapters` crate provides implementations.
//!
//! Each port reports its own error type; the services decide what a failure
//! means for the draft.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::error::{AuthError, GenerationError, StoreError};
use crate::domain::{
    Category, ContentField, DraftId, DraftInput, GeneratedContent, ListingId, Principal,
    PrincipalId, PublishTicket, StoryTicket, VoiceNoteRef,
};

/// An opaque sign-in credential (an ID token, a demo key).
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Port for exchanging a credential for a verified principal.
///
/// Implemented by:
/// - `craftvista_adapters::identity::GoogleIdentityProvider` (ID token check)
/// - `craftvista_adapters::identity::StaticIdentityProvider` (demo accounts)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_credential(&self, credential: &Credential) -> Result<Principal, AuthError>;
}

/// What the generator is asked to write about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub category: Category,
    pub description: String,
    pub materials: Vec<String>,
    pub voice_note_ref: Option<VoiceNoteRef>,
    /// Display name of the author, used to personalise the copy.
    pub artisan_name: Option<String>,
}

impl GenerationRequest {
    pub fn from_input(input: &DraftInput, artisan_name: Option<String>) -> Self {
        Self {
            category: input.category,
            description: input.description.clone(),
            materials: input.materials.clone(),
            voice_note_ref: input.voice_note_ref.clone(),
            artisan_name,
        }
    }
}

/// The reviewed listing a story is written about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub materials: Vec<String>,
    pub artisan_name: Option<String>,
}

impl StoryRequest {
    pub fn from_ticket(ticket: &StoryTicket, artisan_name: Option<String>) -> Self {
        Self {
            title: ticket.content.title.clone(),
            description: ticket.content.description.clone(),
            category: ticket.input.category,
            materials: ticket.input.materials.clone(),
            artisan_name,
        }
    }
}

/// Port for AI content generation.
///
/// Implemented by:
/// - `craftvista_adapters::generator::GeminiGenerator` (hosted LLM)
/// - `craftvista_adapters::generator::TemplateGenerator` (offline, deterministic)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent, GenerationError>;

    /// A few paragraphs of prose about the piece and its maker.
    async fn generate_story(&self, request: &StoryRequest) -> Result<String, GenerationError>;
}

/// A listing as handed to the store.
///
/// `idempotency_key` is the draft id; a store must never create two listings
/// for the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub idempotency_key: DraftId,
    pub author_id: PrincipalId,
    pub author_name: String,
    pub category: Category,
    pub materials: Vec<String>,
    pub title: String,
    pub description: String,
    pub cultural_context: String,
    pub price: f64,
    pub keywords: Vec<String>,
    pub voice_note_ref: Option<VoiceNoteRef>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub story: String,
    pub ai_generated: BTreeMap<ContentField, bool>,
}

impl NewListing {
    pub fn from_ticket(ticket: &PublishTicket, author: &Principal) -> Self {
        let current = ticket.content.current();
        Self {
            idempotency_key: ticket.draft_id,
            author_id: author.id.clone(),
            author_name: author.display_name.clone(),
            category: ticket.input.category,
            materials: ticket.input.materials.clone(),
            title: current.title.clone(),
            description: current.description.clone(),
            cultural_context: current.cultural_context.clone(),
            price: current.suggested_price,
            keywords: current.keywords.clone(),
            voice_note_ref: ticket.input.voice_note_ref.clone(),
            story: current.story.clone(),
            ai_generated: ticket.content.ai_generated_flags(),
        }
    }
}

/// Port for persisting published listings.
///
/// Implemented by:
/// - `craftvista_adapters::store::InMemoryListingStore` (tests, demos)
/// - `craftvista_adapters::store::JsonFileStore` (one JSON document per listing)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Create the listing, or report `StoreError::DuplicateListing` with the
    /// existing id when the idempotency key was seen before.
    async fn create(&self, listing: &NewListing) -> Result<ListingId, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingDraft, Role};

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("ya29.secret");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(credential.expose(), "ya29.secret");
    }

    #[test]
    fn new_listing_carries_edits_and_flags() {
        let mut draft = ListingDraft::new();
        let input = DraftInput::new(Category::Woodwork, "carved box").with_material("sheesham");
        let ticket = draft.begin_generation(&input).unwrap();
        draft
            .complete_generation(
                ticket.sequence,
                GeneratedContent::new("Carved Box", "Hand carved.", "Saharanpur craft.", 1200.0),
            )
            .unwrap();
        draft
            .edit(ContentField::Title, "Sheesham Jewellery Box".into())
            .unwrap();

        let publish = draft.begin_publish().unwrap();
        let author = Principal::new("u1", "maker@craftvista.com", "Meera", Role::Artisan);
        let listing = NewListing::from_ticket(&publish, &author);

        assert_eq!(listing.idempotency_key, draft.id());
        assert_eq!(listing.title, "Sheesham Jewellery Box");
        assert_eq!(listing.materials, vec!["sheesham"]);
        assert!(!listing.ai_generated[&ContentField::Title]);
        assert!(listing.ai_generated[&ContentField::Description]);
        assert!(listing.story.is_empty());
        assert!(!listing.ai_generated.contains_key(&ContentField::Story));
    }

    #[test]
    fn story_request_describes_the_reviewed_copy() {
        let mut draft = ListingDraft::new();
        let input = DraftInput::new(Category::Metalwork, "dhokra horse").with_material("brass");
        let ticket = draft.begin_generation(&input).unwrap();
        draft
            .complete_generation(
                ticket.sequence,
                GeneratedContent::new("Dhokra Horse", "Lost-wax cast.", "Bastar craft.", 2400.0),
            )
            .unwrap();
        draft
            .edit(ContentField::Title, "Bastar Dhokra Horse".into())
            .unwrap();

        let request = StoryRequest::from_ticket(&draft.story_ticket().unwrap(), None);
        assert_eq!(request.title, "Bastar Dhokra Horse");
        assert_eq!(request.category, Category::Metalwork);
        assert_eq!(request.materials, vec!["brass"]);
    }
}
