//! Typed errors for the board core.
//!
//! The library uses `thiserror`; the `board` binary and configuration loading
//! wrap these in `anyhow` at the edge.

use std::time::Duration;

use thiserror::Error;

use crate::common::PostingId;

/// Minimum trimmed length of a club name.
pub const MIN_CLUB_NAME_CHARS: usize = 2;

/// Minimum trimmed length of a posting description.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// A user input rule failed. Never reaches the backend.
///
/// The display text is the message shown to the person submitting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Club name must be at least {} characters.", MIN_CLUB_NAME_CHARS)]
    ClubNameTooShort,

    #[error("Please enter the role title.")]
    MissingTitle,

    #[error(
        "Description too short: please add at least {} characters (currently {}).",
        MIN_DESCRIPTION_CHARS,
        .length
    )]
    DescriptionTooShort { length: usize },

    #[error("Please pick a deadline date.")]
    MissingDeadline,

    #[error("Deadline must be a date in YYYY-MM-DD format, got '{value}'.")]
    InvalidDeadline { value: String },

    #[error("Invalid apply link: please paste a valid http:// or https:// URL.")]
    InvalidApplyUrl,

    #[error("Invalid IG post URL: please paste a valid http:// or https:// URL.")]
    InvalidSourcePostUrl,

    #[error("Unknown {kind} category '{value}'.")]
    UnknownCategory { kind: &'static str, value: String },
}

/// Errors surfaced by the board's operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// User input failed a rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend failed or rejected the call; carries its message verbatim
    #[error("{0}")]
    Remote(String),

    /// A detail lookup returned no row
    #[error("posting not found: {id}")]
    NotFound { id: PostingId },

    /// A backend call did not complete in time
    #[error("backend did not respond within {0:?}")]
    Timeout(Duration),
}

impl BoardError {
    pub fn remote(message: impl std::fmt::Display) -> Self {
        Self::Remote(message.to_string())
    }

    /// Text to show the user. Backend messages are passed through untouched.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "Couldn't load this posting.".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether offering a manual retry of the triggering action makes sense.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

impl From<sqlx::Error> for BoardError {
    fn from(e: sqlx::Error) -> Self {
        Self::Remote(match e {
            sqlx::Error::Database(db) => db.message().to_string(),
            other => other.to_string(),
        })
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(e: reqwest::Error) -> Self {
        Self::remote(e)
    }
}

/// Result type alias for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
