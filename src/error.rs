//! Error types for the rating pipeline
//!
//! Library functions return the `anyhow`-based [`Result`] alias; the typed
//! [`RatingError`] variants below are converted with `.into()` and can be
//! recovered by callers with `downcast_ref::<RatingError>()`.

use crate::types::ParticipantId;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Participant not found: {participant_id}")]
    NotFound { participant_id: ParticipantId },

    #[error("Participant already initialized: {participant_id}")]
    DuplicateKey { participant_id: ParticipantId },

    #[error("Invalid outcome: {tag}")]
    InvalidOutcome { tag: String },

    #[error("Invalid match {match_id}: {reason}")]
    InvalidMatch { match_id: u64, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Persistence failed: {message}")]
    Persistence { message: String },
}

/// Extract the typed rating error from an `anyhow` chain, if there is one
pub fn rating_error(err: &anyhow::Error) -> Option<&RatingError> {
    err.downcast_ref::<RatingError>()
}
