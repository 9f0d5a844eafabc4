//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the collaborators
//! behind the ports, not business rules. Business rule violations are
//! `DomainError` from `crate::domain`.

use std::time::Duration;

use thiserror::Error;

use crate::domain::{ListingId, Operation, Role};
use crate::error::ErrorCategory;

/// Failures reported by an identity collaborator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("credential rejected")]
    InvalidCredentials,

    #[error("identity provider rejected the credential: {0}")]
    Rejected(String),

    #[error("identity provider returned an unusable principal: {0}")]
    InvalidPrincipal(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// A sign-out (or another sign-in) landed while this exchange was pending.
    #[error("sign-in was superseded by a concurrent session change")]
    Superseded,
}

/// Failures reported by a content generator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("content generator unavailable: {0}")]
    Unavailable(String),

    #[error("content generator is rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("content generator returned a malformed answer: {0}")]
    MalformedResponse(String),

    #[error("generated content is unusable: {0}")]
    InvalidContent(String),

    #[error("content generator not configured: {0}")]
    NotConfigured(String),
}

/// Failures reported by a listing store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// The idempotency key was already used; carries the first listing.
    #[error("listing already exists for this draft: {listing_id}")]
    DuplicateListing { listing_id: ListingId },

    #[error("listing store rejected the listing: {0}")]
    Rejected(String),

    #[error("listing store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No principal is signed in.
    #[error("not signed in")]
    Unauthenticated,

    /// The principal lacks the role the workflow requires.
    #[error("role '{actual}' may not author listings (requires '{required}')")]
    Forbidden { required: Role, actual: Role },

    /// The session changed while the draft was open; the draft was abandoned.
    #[error("session ended during {operation}; the draft was abandoned")]
    SessionEnded { operation: Operation },

    #[error("sign-in failed: {0}")]
    Auth(#[from] AuthError),

    #[error("content generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("publishing failed: {0}")]
    Store(#[from] StoreError),

    /// An outbound call exceeded its bounded wait.
    #[error("{operation} timed out after {}s", after.as_secs_f32())]
    Timeout { operation: Operation, after: Duration },

    /// Draft state lock poisoned by a panicking holder.
    #[error("draft state is unavailable")]
    StateLockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Unauthenticated => vec![
                "Sign in before authoring a listing".into(),
                "Pass --credential or set CRAFTVISTA_CREDENTIAL".into(),
            ],
            Self::Forbidden { required, .. } => vec![
                format!("Only the '{required}' role may author listings"),
                "Sign in with a seller account".into(),
            ],
            Self::SessionEnded { .. } => vec![
                "Sign in again and start a new draft".into(),
            ],
            Self::Auth(AuthError::InvalidCredentials | AuthError::Rejected(_)) => vec![
                "Check the credential and try again".into(),
            ],
            Self::Auth(_) => vec!["The identity provider may be down; try again shortly".into()],
            Self::Generation(GenerationError::NotConfigured(what)) => vec![
                format!("Configure the content generator: {what}"),
                "Or use the offline template generator (generator.provider = \"template\")".into(),
            ],
            Self::Generation(_) => vec![
                "Retry generation; the same input can be resubmitted safely".into(),
                "Or restart the input step and adjust the description".into(),
            ],
            Self::Store(_) => vec![
                "Retry publishing; your reviewed content was kept".into(),
            ],
            Self::Timeout { operation, .. } => vec![
                format!("Retry the {operation} step"),
                "Increase the timeout in the [workflow] config section".into(),
            ],
            Self::StateLockPoisoned => vec!["Start a new draft".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthenticated | Self::Forbidden { .. } | Self::SessionEnded { .. } => {
                ErrorCategory::Authentication
            }
            Self::Auth(AuthError::Unavailable(_)) => ErrorCategory::Unavailable,
            Self::Auth(_) => ErrorCategory::Authentication,
            Self::Generation(GenerationError::NotConfigured(_)) => ErrorCategory::Configuration,
            Self::Generation(_) | Self::Store(_) | Self::Timeout { .. } => {
                ErrorCategory::Unavailable
            }
            Self::StateLockPoisoned => ErrorCategory::Internal,
        }
    }

    /// Collaborator failures and timeouts leave a retryable draft behind.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Generation(GenerationError::NotConfigured(_)) => false,
            Self::Generation(_) | Self::Store(_) | Self::Timeout { .. } => true,
            Self::Auth(AuthError::Unavailable(_)) => true,
            _ => false,
        }
    }
}
