//! Errors surfaced to the terminal, with hints and an exit status.

use std::{error::Error, fmt::Write as _};

use owo_colors::{OwoColorize, Style};
use thiserror::Error;

use craftvista_core::error::CraftError;

pub use craftvista_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The config file or environment could not be read, parsed or written.
    #[error("configuration: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("no configuration key named '{key}'")]
    UnknownConfigKey { key: String },

    /// Raised by the session or the draft workflow.
    #[error("{0}")]
    Core(#[from] CraftError),

    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The seller declined to publish.
    #[error("publishing cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn config(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { .. } => vec![
                "Run 'craftvista config path' to locate the config file".into(),
                "Run 'craftvista init' to write a fresh default config".into(),
            ],

            Self::UnknownConfigKey { key } => vec![
                format!("'{key}' is not a configuration key"),
                "List every key with 'craftvista config list'".into(),
            ],

            Self::Core(core_err) => {
                let mut suggestions = core_err.suggestions();
                if core_err.is_retryable() {
                    suggestions.push("Run the same command again to retry".into());
                }
                suggestions
            }

            Self::IoError { source, .. } => match source.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    vec!["Check that the directory is writable by you".into()]
                }
                std::io::ErrorKind::AlreadyExists => vec!["Pass --force to overwrite".into()],
                _ => Vec::new(),
            },

            Self::Cancelled => vec![
                "Nothing was published".into(),
                "Pass --yes to publish without the confirmation prompt".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::UnknownConfigKey { .. } => ErrorCategory::NotFound,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::Conflict => ErrorCategory::UserError,
                CoreCategory::Authentication => ErrorCategory::UserError,
                CoreCategory::Unavailable => ErrorCategory::Unavailable,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Unavailable => 5,
            ErrorCategory::Internal => 1,
        }
    }

    /// Message, optional cause chain, then suggestions. `color` switches
    /// the ANSI styling on.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: Style| {
            if color {
                text.style(style).to_string()
            } else {
                text.to_owned()
            }
        };

        let mut out = String::new();
        let _ = writeln!(out, "\n{} {self}", paint("error:", Style::new().red().bold()));

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let _ = writeln!(out, "  caused by: {}", paint(&err.to_string(), Style::new().dimmed()));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(out, "\n{}", paint("hint:", Style::new().yellow().bold()));
            for hint in &suggestions {
                let _ = writeln!(out, "  - {hint}");
            }
        }

        if !verbose {
            let _ = writeln!(out, "\n{}", paint("(-v shows the underlying cause)", Style::new().dimmed()));
        }
        out
    }

    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, "{self}")
            }
            _ => tracing::warn!(?category, "{self}"),
        }
        if let Some(cause) = self.source() {
            tracing::debug!(%cause, "underlying error");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input, rejected credentials, or an out-of-order action.
    UserError,
    NotFound,
    Configuration,
    /// A collaborator failed or timed out; retrying may help.
    Unavailable,
    Internal,
}

/// Attach a message while converting a foreign error into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for anyhow::Result<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::config(f(), e))
    }
}
