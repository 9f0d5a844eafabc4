//! The `ListingDraft` aggregate root and its state machine.
//!
//! ```text
//!  Collecting ──request──▶ Generating ──ok──▶ Reviewing ──publish──▶ Publishing ──ok──▶ Published
//!      ▲                      │                 │   ▲                    │
//!      │                      └──err/timeout──▶ Failed ◀──err/timeout────┘
//!      └───────────── restart ──────────────────┘
//! ```
//!
//! Every transition is a synchronous method that either applies completely
//! or returns a [`DomainError`] and leaves the draft untouched. Outbound
//! calls are represented by tickets carrying the request sequence number;
//! completing a ticket whose sequence is no longer current is rejected as
//! [`DomainError::Superseded`].
//!
//! # Domain purity
//!
//! This module must not import `tracing` or any async machinery. The
//! workflow service owns timing, cancellation and logging.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        content::{FieldValue, GeneratedContent, ReviewedContent},
        draft_input::DraftInput,
    },
    error::DomainError,
    value_objects::{ContentField, DraftStatus, Operation},
};

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Identifies a draft; doubles as the publish idempotency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(Uuid);

impl DraftId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the listing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Phase ─────────────────────────────────────────────────────────────────────

/// The data-carrying state of a draft.
///
/// Content only exists inside the variants that can have it, so editing
/// before generation is unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DraftPhase {
    Collecting,
    Generating,
    Reviewing {
        content: ReviewedContent,
    },
    Publishing {
        content: ReviewedContent,
    },
    Published {
        content: ReviewedContent,
        listing_id: ListingId,
    },
    Failed {
        /// Present when publishing failed; generation failures have none.
        content: Option<ReviewedContent>,
    },
}

impl DraftPhase {
    pub const fn status(&self) -> DraftStatus {
        match self {
            Self::Collecting => DraftStatus::Collecting,
            Self::Generating => DraftStatus::Generating,
            Self::Reviewing { .. } => DraftStatus::Reviewing,
            Self::Publishing { .. } => DraftStatus::Publishing,
            Self::Published { .. } => DraftStatus::Published,
            Self::Failed { .. } => DraftStatus::Failed,
        }
    }

    pub const fn content(&self) -> Option<&ReviewedContent> {
        match self {
            Self::Reviewing { content }
            | Self::Publishing { content }
            | Self::Published { content, .. } => Some(content),
            Self::Failed { content } => content.as_ref(),
            Self::Collecting | Self::Generating => None,
        }
    }
}

/// Why the last outbound call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub operation: Operation,
    pub reason: String,
    pub timed_out: bool,
    pub retryable: bool,
    pub sequence: u64,
}

// ── Tickets ───────────────────────────────────────────────────────────────────

/// Issued when a generation request starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTicket {
    pub sequence: u64,
    pub input: DraftInput,
}

/// Issued when a story is requested for content under review.
///
/// Asking for a story leaves the draft in `Reviewing`; the ticket pins the
/// sequence so a story for superseded content is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryTicket {
    pub sequence: u64,
    pub input: DraftInput,
    pub content: GeneratedContent,
}

/// Issued when a publish request starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishTicket {
    pub sequence: u64,
    pub draft_id: DraftId,
    pub input: DraftInput,
    pub content: ReviewedContent,
}

// ── Aggregate root ────────────────────────────────────────────────────────────

/// One seller's in-progress listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    id: DraftId,
    /// Last input accepted for generation.
    input: Option<DraftInput>,
    phase: DraftPhase,
    sequence: u64,
    last_failure: Option<FailureRecord>,
    abandoned: bool,
}

impl ListingDraft {
    pub fn new() -> Self {
        Self::with_id(DraftId::new())
    }

    pub fn with_id(id: DraftId) -> Self {
        Self {
            id,
            input: None,
            phase: DraftPhase::Collecting,
            sequence: 0,
            last_failure: None,
            abandoned: false,
        }
    }

    // Getters

    pub const fn id(&self) -> DraftId {
        self.id
    }
    pub const fn input(&self) -> Option<&DraftInput> {
        self.input.as_ref()
    }
    pub const fn status(&self) -> DraftStatus {
        self.phase.status()
    }
    pub const fn content(&self) -> Option<&ReviewedContent> {
        self.phase.content()
    }
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
    pub const fn last_failure(&self) -> Option<&FailureRecord> {
        self.last_failure.as_ref()
    }
    pub const fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// `true` when the draft failed and the failed call may be retried.
    pub fn is_retryable(&self) -> bool {
        self.status() == DraftStatus::Failed
            && self.last_failure.as_ref().is_some_and(|f| f.retryable)
    }

    pub fn listing_id(&self) -> Option<&ListingId> {
        match &self.phase {
            DraftPhase::Published { listing_id, .. } => Some(listing_id),
            _ => None,
        }
    }

    // ── Generation ───────────────────────────────────────────────────────────

    /// `Collecting | Failed(generation) → Generating`.
    pub fn begin_generation(&mut self, input: &DraftInput) -> Result<GenerationTicket, DomainError> {
        self.ensure_open()?;
        match &self.phase {
            DraftPhase::Collecting | DraftPhase::Failed { content: None } => {}
            DraftPhase::Generating => {
                return Err(DomainError::AlreadyInProgress {
                    operation: Operation::Generate,
                });
            }
            other => {
                return Err(DomainError::InvalidState {
                    action: "request generation",
                    status: other.status(),
                });
            }
        }

        let input = input.normalized()?;

        self.sequence += 1;
        self.input = Some(input.clone());
        self.phase = DraftPhase::Generating;
        self.last_failure = None;

        Ok(GenerationTicket {
            sequence: self.sequence,
            input,
        })
    }

    /// `Generating → Reviewing` for the current request only.
    pub fn complete_generation(
        &mut self,
        sequence: u64,
        content: GeneratedContent,
    ) -> Result<(), DomainError> {
        self.ensure_current(sequence)?;
        if self.phase != DraftPhase::Generating {
            return Err(DomainError::InvalidState {
                action: "accept generated content",
                status: self.status(),
            });
        }
        self.phase = DraftPhase::Reviewing {
            content: ReviewedContent::new(content),
        };
        Ok(())
    }

    // ── Review ───────────────────────────────────────────────────────────────

    /// `Reviewing → Reviewing`: overwrite one field of the generated content.
    pub fn edit(&mut self, field: ContentField, value: FieldValue) -> Result<(), DomainError> {
        self.ensure_open()?;
        match &mut self.phase {
            DraftPhase::Reviewing { content } => content.apply(field, value),
            other => Err(DomainError::InvalidState {
                action: "edit generated content",
                status: other.status(),
            }),
        }
    }

    /// Snapshot the reviewed content for a story request.
    pub fn story_ticket(&self) -> Result<StoryTicket, DomainError> {
        self.ensure_open()?;
        match (&self.phase, &self.input) {
            (DraftPhase::Reviewing { content }, Some(input)) => Ok(StoryTicket {
                sequence: self.sequence,
                input: input.clone(),
                content: content.current().clone(),
            }),
            (other, _) => Err(DomainError::InvalidState {
                action: "request a story",
                status: other.status(),
            }),
        }
    }

    /// Attach the story produced for `sequence`.
    ///
    /// Dropped as superseded once the draft has left review.
    pub fn attach_story(
        &mut self,
        sequence: u64,
        story: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_current(sequence)?;
        match &mut self.phase {
            DraftPhase::Reviewing { content } => {
                content.attach_story(story);
                Ok(())
            }
            _ => Err(DomainError::Superseded {
                sequence,
                current: self.sequence,
            }),
        }
    }

    /// Return to input collection, discarding any generated content.
    ///
    /// From `Generating` the outstanding request is superseded. Refused once
    /// a publish is in flight or done.
    pub fn restart_input(&mut self) -> Result<(), DomainError> {
        self.ensure_open()?;
        match &self.phase {
            DraftPhase::Collecting => return Ok(()),
            DraftPhase::Generating => self.sequence += 1,
            DraftPhase::Reviewing { .. } | DraftPhase::Failed { .. } => {}
            other => {
                return Err(DomainError::InvalidState {
                    action: "restart input",
                    status: other.status(),
                });
            }
        }
        self.phase = DraftPhase::Collecting;
        self.last_failure = None;
        Ok(())
    }

    // ── Publish ──────────────────────────────────────────────────────────────

    /// `Reviewing | Failed(publish) → Publishing`.
    pub fn begin_publish(&mut self) -> Result<PublishTicket, DomainError> {
        self.ensure_open()?;
        let content = match &self.phase {
            DraftPhase::Reviewing { content }
            | DraftPhase::Failed {
                content: Some(content),
            } => content.clone(),
            DraftPhase::Publishing { .. } => {
                return Err(DomainError::AlreadyInProgress {
                    operation: Operation::Publish,
                });
            }
            other => {
                return Err(DomainError::InvalidState {
                    action: "publish",
                    status: other.status(),
                });
            }
        };

        let input = match &self.input {
            Some(input) => input.normalized()?,
            None => {
                return Err(DomainError::validation(
                    "description",
                    "no input was collected",
                ));
            }
        };
        content.current().validate()?;

        self.sequence += 1;
        self.phase = DraftPhase::Publishing {
            content: content.clone(),
        };
        self.last_failure = None;

        Ok(PublishTicket {
            sequence: self.sequence,
            draft_id: self.id,
            input,
            content,
        })
    }

    /// `Publishing → Published` for the current request only.
    pub fn complete_publish(&mut self, sequence: u64, listing_id: ListingId) -> Result<(), DomainError> {
        self.ensure_current(sequence)?;
        let content = match &self.phase {
            DraftPhase::Publishing { content } => content.clone(),
            other => {
                return Err(DomainError::InvalidState {
                    action: "record publish result",
                    status: other.status(),
                });
            }
        };
        self.phase = DraftPhase::Published {
            content,
            listing_id,
        };
        Ok(())
    }

    // ── Failure and abandonment ──────────────────────────────────────────────

    /// `Generating | Publishing → Failed` for the current request only.
    ///
    /// Content survives a publish failure so the seller can retry without
    /// regenerating. `retryable` is the caller's judgement of the cause; a
    /// non-retryable failure still accepts a new attempt.
    pub fn fail(
        &mut self,
        sequence: u64,
        reason: impl Into<String>,
        timed_out: bool,
        retryable: bool,
    ) -> Result<(), DomainError> {
        self.ensure_current(sequence)?;
        let (operation, content) = match &self.phase {
            DraftPhase::Generating => (Operation::Generate, None),
            DraftPhase::Publishing { content } => (Operation::Publish, Some(content.clone())),
            other => {
                return Err(DomainError::InvalidState {
                    action: "record a failure",
                    status: other.status(),
                });
            }
        };
        self.phase = DraftPhase::Failed { content };
        self.last_failure = Some(FailureRecord {
            operation,
            reason: reason.into(),
            timed_out,
            retryable,
            sequence,
        });
        Ok(())
    }

    /// Close the draft. Idempotent.
    ///
    /// Any outstanding request becomes stale; a transient phase falls back
    /// to the stable phase it started from.
    pub fn abandon(&mut self) {
        if self.abandoned {
            return;
        }
        self.sequence += 1;
        self.abandoned = true;
        let phase = std::mem::replace(&mut self.phase, DraftPhase::Collecting);
        self.phase = match phase {
            DraftPhase::Generating => DraftPhase::Collecting,
            DraftPhase::Publishing { content } => DraftPhase::Reviewing { content },
            other => other,
        };
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.abandoned {
            return Err(DomainError::DraftAbandoned);
        }
        Ok(())
    }

    fn ensure_current(&self, sequence: u64) -> Result<(), DomainError> {
        if self.abandoned || sequence != self.sequence {
            return Err(DomainError::Superseded {
                sequence,
                current: self.sequence,
            });
        }
        Ok(())
    }
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Category;

    fn bowl_input() -> DraftInput {
        DraftInput::new(Category::Pottery, "handmade bowl").with_material("clay")
    }

    fn bowl_content() -> GeneratedContent {
        GeneratedContent::new("Handmade Bowl", "A bowl.", "Clay craft.", 500.0)
    }

    fn reviewing_draft() -> ListingDraft {
        let mut draft = ListingDraft::new();
        let ticket = draft.begin_generation(&bowl_input()).unwrap();
        draft.complete_generation(ticket.sequence, bowl_content()).unwrap();
        draft
    }

    #[test]
    fn story_attaches_only_while_reviewing_the_same_content() {
        let mut draft = reviewing_draft();
        let ticket = draft.story_ticket().unwrap();
        assert_eq!(ticket.content.title, bowl_content().title);
        assert_eq!(draft.status(), DraftStatus::Reviewing);

        draft
            .attach_story(ticket.sequence, "Fired in a village kiln.")
            .unwrap();
        assert_eq!(
            draft.content().unwrap().current().story,
            "Fired in a village kiln."
        );

        let stale = draft.story_ticket().unwrap();
        draft.restart_input().unwrap();
        assert!(matches!(
            draft.attach_story(stale.sequence, "Too late."),
            Err(DomainError::Superseded { .. })
        ));
    }

    #[test]
    fn story_needs_reviewed_content() {
        let draft = ListingDraft::new();
        assert!(matches!(
            draft.story_ticket(),
            Err(DomainError::InvalidState {
                status: DraftStatus::Collecting,
                ..
            })
        ));
    }

    #[test]
    fn new_draft_is_collecting_without_content() {
        let draft = ListingDraft::new();
        assert_eq!(draft.status(), DraftStatus::Collecting);
        assert!(draft.content().is_none());
        assert!(draft.input().is_none());
    }

    #[test]
    fn empty_description_keeps_collecting() {
        let mut draft = ListingDraft::new();
        let err = draft
            .begin_generation(&DraftInput::new(Category::Pottery, "  "))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(draft.status(), DraftStatus::Collecting);
        assert_eq!(draft.sequence(), 0);
    }

    #[test]
    fn second_generation_is_rejected_while_generating() {
        let mut draft = ListingDraft::new();
        draft.begin_generation(&bowl_input()).unwrap();
        assert_eq!(
            draft.begin_generation(&bowl_input()).unwrap_err(),
            DomainError::AlreadyInProgress {
                operation: Operation::Generate
            }
        );
    }

    #[test]
    fn generation_success_moves_to_reviewing() {
        let draft = reviewing_draft();
        assert_eq!(draft.status(), DraftStatus::Reviewing);
        assert_eq!(draft.content().unwrap().current().title, "Handmade Bowl");
        assert_eq!(draft.input().unwrap().materials, vec!["clay"]);
    }

    #[test]
    fn stale_generation_result_is_discarded_after_restart() {
        let mut draft = ListingDraft::new();
        let ticket = draft.begin_generation(&bowl_input()).unwrap();
        draft.restart_input().unwrap();

        let err = draft
            .complete_generation(ticket.sequence, bowl_content())
            .unwrap_err();
        assert!(matches!(err, DomainError::Superseded { .. }));
        assert_eq!(draft.status(), DraftStatus::Collecting);
        assert!(draft.content().is_none());
    }

    #[test]
    fn generation_failure_is_retryable_and_has_no_content() {
        let mut draft = ListingDraft::new();
        let ticket = draft.begin_generation(&bowl_input()).unwrap();
        draft
            .fail(ticket.sequence, "model overloaded", false, true)
            .unwrap();

        assert_eq!(draft.status(), DraftStatus::Failed);
        assert!(draft.is_retryable());
        assert!(draft.content().is_none());
        let failure = draft.last_failure().unwrap();
        assert_eq!(failure.operation, Operation::Generate);

        // retry the same request
        let retry = draft.begin_generation(&bowl_input()).unwrap();
        assert!(retry.sequence > ticket.sequence);
        assert!(draft.last_failure().is_none());
    }

    #[test]
    fn edit_outside_reviewing_is_invalid_state() {
        let mut draft = ListingDraft::new();
        let err = draft
            .edit(ContentField::Title, "x".into())
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidState {
                status: DraftStatus::Collecting,
                ..
            }
        ));
    }

    #[test]
    fn permanent_failure_is_not_retryable_but_can_start_over() {
        let mut draft = ListingDraft::new();
        let ticket = draft.begin_generation(&bowl_input()).unwrap();
        draft
            .fail(ticket.sequence, "no API key", false, false)
            .unwrap();

        assert_eq!(draft.status(), DraftStatus::Failed);
        assert!(!draft.is_retryable());
        assert!(!draft.last_failure().unwrap().retryable);
        assert!(draft.begin_generation(&bowl_input()).is_ok());
    }

    #[test]
    fn publish_failure_preserves_content_for_retry() {
        let mut draft = reviewing_draft();
        draft
            .edit(ContentField::SuggestedPrice, 650.0.into())
            .unwrap();
        let ticket = draft.begin_publish().unwrap();
        draft
            .fail(ticket.sequence, "store unavailable", true, true)
            .unwrap();

        assert_eq!(draft.status(), DraftStatus::Failed);
        assert_eq!(draft.content().unwrap().current().suggested_price, 650.0);
        assert!(draft.last_failure().unwrap().timed_out);

        // generation is not the way out of a publish failure
        assert!(matches!(
            draft.begin_generation(&bowl_input()),
            Err(DomainError::InvalidState { .. })
        ));

        let retry = draft.begin_publish().unwrap();
        draft
            .complete_publish(retry.sequence, ListingId::new("lst-1"))
            .unwrap();
        assert_eq!(draft.listing_id().unwrap().as_str(), "lst-1");
    }

    #[test]
    fn publish_requires_non_empty_title() {
        let mut draft = reviewing_draft();
        draft.edit(ContentField::Title, "".into()).unwrap();
        assert!(matches!(
            draft.begin_publish(),
            Err(DomainError::Validation { field: "title", .. })
        ));
        assert_eq!(draft.status(), DraftStatus::Reviewing);
    }

    #[test]
    fn published_draft_refuses_publish_and_restart() {
        let mut draft = reviewing_draft();
        let ticket = draft.begin_publish().unwrap();
        assert_eq!(
            draft.begin_publish().unwrap_err(),
            DomainError::AlreadyInProgress {
                operation: Operation::Publish
            }
        );
        assert!(draft.restart_input().is_err());
        draft
            .complete_publish(ticket.sequence, ListingId::new("lst-9"))
            .unwrap();

        assert!(matches!(
            draft.begin_publish(),
            Err(DomainError::InvalidState {
                status: DraftStatus::Published,
                ..
            })
        ));
        assert!(draft.restart_input().is_err());
    }

    #[test]
    fn abandon_makes_in_flight_tickets_stale() {
        let mut draft = reviewing_draft();
        let ticket = draft.begin_publish().unwrap();
        draft.abandon();

        assert!(draft.is_abandoned());
        assert_eq!(draft.status(), DraftStatus::Reviewing);
        assert!(matches!(
            draft.complete_publish(ticket.sequence, ListingId::new("late")),
            Err(DomainError::Superseded { .. })
        ));
        assert_eq!(
            draft.edit(ContentField::Title, "x".into()).unwrap_err(),
            DomainError::DraftAbandoned
        );

        let sequence = draft.sequence();
        draft.abandon();
        assert_eq!(draft.sequence(), sequence);
    }
}
