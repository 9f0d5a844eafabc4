// ============================================================================
// domain/error.rs - DRAFT DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::{DraftStatus, Operation};

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the draft records the last failure)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Returning a `DomainError` from a draft transition guarantees the draft
/// was not mutated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    // ========================================================================
    // State Errors (409-level equivalent)
    // ========================================================================
    #[error("cannot {action} while the draft is {status}")]
    InvalidState {
        action: &'static str,
        status: DraftStatus,
    },

    #[error("a {operation} request is already in progress")]
    AlreadyInProgress { operation: Operation },

    #[error("the draft has been abandoned")]
    DraftAbandoned,

    // ========================================================================
    // Ordering Violations
    // ========================================================================
    #[error("response to request #{sequence} is stale (current is #{current})")]
    Superseded { sequence: u64, current: u64 },
}

impl DomainError {
    /// Shorthand for a [`DomainError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation { field, reason } => vec![
                format!("Check the {field}: {reason}"),
                match *field {
                    "category" => "Run `craftvista categories` to see the catalogue".into(),
                    "description" => "Describe the piece in at least a few words".into(),
                    "suggestedPrice" => "Prices must be a non-negative number of rupees".into(),
                    _ => "Fix the value and try again".into(),
                },
            ],
            Self::InvalidState { action, status } => vec![
                format!("'{action}' is not available while the draft is {status}"),
                "Restart the input step to begin again".into(),
            ],
            Self::AlreadyInProgress { operation } => vec![
                format!("Wait for the current {operation} request to finish"),
            ],
            Self::DraftAbandoned => vec!["Start a new draft".into()],
            Self::Superseded { .. } => {
                vec!["The request was replaced by a newer one; nothing to do".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::InvalidState { .. }
            | Self::AlreadyInProgress { .. }
            | Self::DraftAbandoned
            | Self::Superseded { .. } => ErrorCategory::Conflict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
}
