//! Error types shared by the quiz, joke, and student record components.
//!
//! Every fallible core operation returns [`Result`], so the presentation
//! layer can decide whether to re-prompt, report, or abort without string
//! matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by classkit core operations.
#[derive(Debug, Error)]
pub enum ClasskitError {
    /// The user typed something that is not a valid answer or value.
    #[error("invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// A backing file could not be opened or read at load time.
    #[error("source unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rewriting a backing file failed. In-memory state is retained.
    #[error("failed to write {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A domain rule was violated; nothing was mutated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No student record carries the given identifier.
    #[error("no student with id '{0}'")]
    UnknownStudent(String),

    /// An answer was submitted while no question was on screen.
    #[error("no question is awaiting an answer")]
    NoActiveQuestion,
}

impl ClasskitError {
    pub(crate) fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ClasskitError::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the user can recover by re-entering input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClasskitError::InvalidInput { .. }
                | ClasskitError::Validation(_)
                | ClasskitError::UnknownStudent(_)
        )
    }
}

/// Result alias for classkit core operations.
pub type Result<T> = std::result::Result<T, ClasskitError>;
