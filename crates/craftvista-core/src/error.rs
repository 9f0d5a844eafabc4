//! The error type every public core operation returns.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for CraftVista Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CraftError {
    /// Errors from the domain layer (business rule violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and collaborators).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CraftError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in CraftVista".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Coarse class used by the CLI to pick an exit code.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Conflict => ErrorCategory::Conflict,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Application(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Authentication,
    Unavailable,
    Configuration,
    Internal,
}

pub type CraftResult<T> = Result<T, CraftError>;
