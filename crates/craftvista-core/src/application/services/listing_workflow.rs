//! Listing Workflow - drives one draft from seed input to a published listing.
//!
//! The draft's transitions are pure (`crate::domain::ListingDraft`); this
//! service adds the session gate, the outbound calls and their bounded waits.
//!
//! Every outbound call races three things:
//! 1. the collaborator future, wrapped in `tokio::time::timeout`
//! 2. the draft's request sequence moving on (restart, abandon)
//! 3. the session epoch moving on (sign-out, re-sign-in)
//!
//! Whichever finishes first decides; the losing collaborator future is
//! dropped, so an abandoned draft never completes a store write.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        error::{GenerationError, StoreError},
        ports::{ContentGenerator, GenerationRequest, ListingStore, NewListing, StoryRequest},
        services::session_manager::SessionManager,
    },
    domain::{
        ContentField, DomainError, DomainValidator as validator, DraftId, DraftInput,
        DraftStatus, FailureRecord, FieldValue, GeneratedContent, ListingDraft, ListingId,
        Operation, Principal, Role,
    },
    error::{CraftError, CraftResult},
};

/// Bounded waits and authoring policy.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    pub generation_timeout: Duration,
    pub publish_timeout: Duration,
    /// Only principals with the artisan role may author when set.
    pub require_artisan: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(30),
            publish_timeout: Duration::from_secs(15),
            require_artisan: true,
        }
    }
}

struct WorkflowState {
    draft: ListingDraft,
    /// Session epoch the draft was first authorised under.
    session_epoch: Option<u64>,
}

/// How an outbound call ended.
enum Outbound<T> {
    Completed(T),
    TimedOut,
    Superseded,
    SessionEnded,
}

/// One authoring session over one draft.
pub struct ListingWorkflow {
    id: DraftId,
    session: Arc<SessionManager>,
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn ListingStore>,
    config: WorkflowConfig,
    state: Mutex<WorkflowState>,
    sequence: watch::Sender<u64>,
}

impl ListingWorkflow {
    pub fn new(
        session: Arc<SessionManager>,
        generator: Arc<dyn ContentGenerator>,
        store: Arc<dyn ListingStore>,
        config: WorkflowConfig,
    ) -> Self {
        let draft = ListingDraft::new();
        let (sequence, _) = watch::channel(draft.sequence());
        Self {
            id: draft.id(),
            session,
            generator,
            store,
            config,
            state: Mutex::new(WorkflowState {
                draft,
                session_epoch: None,
            }),
            sequence,
        }
    }

    pub fn draft_id(&self) -> DraftId {
        self.id
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// A cloned view of the draft.
    pub fn snapshot(&self) -> CraftResult<ListingDraft> {
        Ok(self.lock()?.draft.clone())
    }

    pub fn status(&self) -> CraftResult<DraftStatus> {
        Ok(self.lock()?.draft.status())
    }

    pub fn last_failure(&self) -> CraftResult<Option<FailureRecord>> {
        Ok(self.lock()?.draft.last_failure().cloned())
    }

    // ── Generation ───────────────────────────────────────────────────────────

    /// Ask the generator for listing copy and move the draft to review.
    ///
    /// The session gate runs before anything else: without a principal the
    /// generator is never called and the draft is not touched.
    #[instrument(skip_all, fields(draft = %self.id, category = %input.category))]
    pub async fn request_generation(&self, input: DraftInput) -> CraftResult<GeneratedContent> {
        let (principal, epoch) = self.authorize(Operation::Generate)?;
        let ticket = self.with_draft(|draft| draft.begin_generation(&input))?;
        info!(sequence = ticket.sequence, "Requesting generated content");

        let request = GenerationRequest::from_input(&ticket.input, Some(principal.display_name));
        let limit = self.config.generation_timeout;
        let outcome = self
            .outbound(ticket.sequence, epoch, limit, self.generator.generate(&request))
            .await;

        match outcome {
            Outbound::Completed(Ok(content)) => {
                if let Err(invalid) = validator::validate_generated(&content) {
                    let err = GenerationError::InvalidContent(invalid.to_string());
                    warn!(error = %err, "Generator returned unusable content");
                    let err = ApplicationError::Generation(err);
                    return self.record_failure(ticket.sequence, err, false);
                }
                self.with_draft(|draft| draft.complete_generation(ticket.sequence, content.clone()))?;
                info!(title = %content.title, "Generated content ready for review");
                Ok(content)
            }
            Outbound::Completed(Err(err)) => {
                warn!(error = %err, "Content generation failed");
                self.record_failure(ticket.sequence, ApplicationError::Generation(err), false)
            }
            Outbound::TimedOut => self.timed_out(Operation::Generate, ticket.sequence, limit),
            Outbound::Superseded => Err(self.superseded(ticket.sequence)),
            Outbound::SessionEnded => Err(self.end_session(Operation::Generate)),
        }
    }

    // ── Review ───────────────────────────────────────────────────────────────

    /// Overwrite one field of the generated content.
    pub fn edit_generated(&self, field: ContentField, value: FieldValue) -> CraftResult<()> {
        self.with_draft(|draft| draft.edit(field, value))?;
        debug!(draft = %self.id, %field, "Field edited");
        Ok(())
    }

    /// Return to input collection; an outstanding generation becomes stale.
    pub fn restart_input(&self) -> CraftResult<()> {
        self.with_draft(ListingDraft::restart_input)?;
        info!(draft = %self.id, "Input restarted");
        Ok(())
    }

    /// Ask the generator for an artisan story about the content under review.
    ///
    /// The draft stays in review whatever the outcome; without a story the
    /// listing is still publishable.
    #[instrument(skip_all, fields(draft = %self.id))]
    pub async fn request_story(&self) -> CraftResult<String> {
        let (principal, epoch) = self.authorize(Operation::Story)?;
        let ticket = self.with_draft(|draft| draft.story_ticket())?;
        info!(sequence = ticket.sequence, "Requesting artisan story");

        let request = StoryRequest::from_ticket(&ticket, Some(principal.display_name));
        let limit = self.config.generation_timeout;
        let outcome = self
            .outbound(ticket.sequence, epoch, limit, self.generator.generate_story(&request))
            .await;

        match outcome {
            Outbound::Completed(Ok(story)) if story.trim().is_empty() => {
                let err = GenerationError::InvalidContent("the story is empty".into());
                warn!(error = %err, "Generator returned an empty story");
                Err(ApplicationError::Generation(err).into())
            }
            Outbound::Completed(Ok(story)) => {
                let story = story.trim().to_string();
                self.with_draft(|draft| draft.attach_story(ticket.sequence, story.as_str()))?;
                info!(chars = story.chars().count(), "Story attached");
                Ok(story)
            }
            Outbound::Completed(Err(err)) => {
                warn!(error = %err, "Story generation failed");
                Err(ApplicationError::Generation(err).into())
            }
            Outbound::TimedOut => {
                warn!(timeout_secs = limit.as_secs_f32(), "Story request timed out");
                Err(ApplicationError::Timeout {
                    operation: Operation::Story,
                    after: limit,
                }
                .into())
            }
            Outbound::Superseded => Err(self.superseded(ticket.sequence)),
            Outbound::SessionEnded => Err(self.end_session(Operation::Story)),
        }
    }

    // ── Publish ──────────────────────────────────────────────────────────────

    /// Write the reviewed listing to the store.
    ///
    /// The draft id is the idempotency key: a `DuplicateListing` answer is
    /// the listing an earlier attempt already created.
    #[instrument(skip_all, fields(draft = %self.id))]
    pub async fn publish(&self) -> CraftResult<ListingId> {
        let (principal, epoch) = self.authorize(Operation::Publish)?;
        let ticket = self.with_draft(ListingDraft::begin_publish)?;
        info!(sequence = ticket.sequence, author = %principal.id, "Publishing listing");

        let listing = NewListing::from_ticket(&ticket, &principal);
        let limit = self.config.publish_timeout;
        let outcome = self
            .outbound(ticket.sequence, epoch, limit, self.store.create(&listing))
            .await;

        let result = match outcome {
            Outbound::Completed(result) => result,
            Outbound::TimedOut => return self.timed_out(Operation::Publish, ticket.sequence, limit),
            Outbound::Superseded => return Err(self.superseded(ticket.sequence)),
            Outbound::SessionEnded => return Err(self.end_session(Operation::Publish)),
        };

        let listing_id = match result {
            Ok(id) if !id.is_empty() => id,
            Ok(_) => {
                let err = StoreError::Rejected("store returned an empty listing id".into());
                return self.record_failure(ticket.sequence, err.into(), false);
            }
            Err(StoreError::DuplicateListing { listing_id }) => {
                info!(listing = %listing_id, "Listing already existed for this draft");
                listing_id
            }
            Err(err) => {
                warn!(error = %err, "Publishing failed");
                return self.record_failure(ticket.sequence, err.into(), false);
            }
        };

        self.with_draft(|draft| draft.complete_publish(ticket.sequence, listing_id.clone()))?;
        info!(listing = %listing_id, "Listing published");
        Ok(listing_id)
    }

    // ── Abandonment ──────────────────────────────────────────────────────────

    /// Close the draft. Any in-flight call is cancelled. Idempotent.
    pub fn abandon(&self) -> CraftResult<()> {
        self.with_draft(|draft| {
            draft.abandon();
            Ok(())
        })?;
        info!(draft = %self.id, "Draft abandoned");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Session gate. Binds the draft to the first session that authors it;
    /// a later sign-out or switch of principal abandons the draft.
    fn authorize(&self, operation: Operation) -> CraftResult<(Principal, u64)> {
        let session = self.session.snapshot();
        let mut state = self.lock()?;

        if state.session_epoch.is_some_and(|bound| bound != session.epoch()) {
            drop(state);
            return Err(self.end_session(operation));
        }

        let Some(principal) = session.principal().cloned() else {
            return Err(ApplicationError::Unauthenticated.into());
        };
        if !validator::may_author(&principal, self.config.require_artisan) {
            return Err(ApplicationError::Forbidden {
                required: Role::Artisan,
                actual: principal.role,
            }
            .into());
        }

        state.session_epoch.get_or_insert(session.epoch());
        Ok((principal, session.epoch()))
    }

    async fn outbound<T, F>(&self, sequence: u64, epoch: u64, limit: Duration, call: F) -> Outbound<T>
    where
        F: Future<Output = T>,
    {
        let mut current = self.sequence.subscribe();
        let mut session = self.session.subscribe();

        tokio::select! {
            biased;
            _ = current.wait_for(|seq| *seq != sequence) => Outbound::Superseded,
            _ = session.wait_for(|s| s.epoch() != epoch) => Outbound::SessionEnded,
            result = tokio::time::timeout(limit, call) => match result {
                Ok(value) => Outbound::Completed(value),
                Err(_) => Outbound::TimedOut,
            },
        }
    }

    fn timed_out<T>(&self, operation: Operation, sequence: u64, after: Duration) -> CraftResult<T> {
        warn!(%operation, timeout_secs = after.as_secs_f32(), "Outbound call timed out");
        self.record_failure(sequence, ApplicationError::Timeout { operation, after }, true)
    }

    /// Move the draft to `Failed` and hand back `err`. The record is
    /// retryable exactly when the error is.
    fn record_failure<T>(
        &self,
        sequence: u64,
        err: ApplicationError,
        timed_out: bool,
    ) -> CraftResult<T> {
        let reason = match &err {
            ApplicationError::Generation(inner) => inner.to_string(),
            ApplicationError::Store(inner) => inner.to_string(),
            other => other.to_string(),
        };
        let retryable = err.is_retryable();
        self.with_draft(|draft| draft.fail(sequence, reason, timed_out, retryable))?;
        Err(err.into())
    }

    fn superseded(&self, sequence: u64) -> CraftError {
        let current = *self.sequence.borrow();
        debug!(sequence, current, "Discarding response to superseded request");
        DomainError::Superseded { sequence, current }.into()
    }

    /// The session changed under the draft; abandon it.
    fn end_session(&self, operation: Operation) -> CraftError {
        match self.with_draft(|draft| {
            draft.abandon();
            Ok(())
        }) {
            Ok(()) => {
                warn!(draft = %self.id, %operation, "Session ended; draft abandoned");
                ApplicationError::SessionEnded { operation }.into()
            }
            Err(err) => err,
        }
    }

    fn lock(&self) -> CraftResult<MutexGuard<'_, WorkflowState>> {
        self.state
            .lock()
            .map_err(|_| ApplicationError::StateLockPoisoned.into())
    }

    /// Run one draft transition and publish the resulting sequence number.
    fn with_draft<T>(
        &self,
        transition: impl FnOnce(&mut ListingDraft) -> Result<T, DomainError>,
    ) -> CraftResult<T> {
        let mut state = self.lock()?;
        let result = transition(&mut state.draft);
        let sequence = state.draft.sequence();
        drop(state);

        self.sequence.send_if_modified(|current| {
            if *current == sequence {
                return false;
            }
            *current = sequence;
            true
        });
        result.map_err(CraftError::Domain)
    }
}
