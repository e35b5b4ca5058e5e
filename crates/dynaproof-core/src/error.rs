//! Error types for the assessment core.
//!
//! Only `ProfileNotFound` and `NoCurrentQuestion` are meant to reach a
//! learner-facing caller; everything else is recovered close to where it
//! happens (corrupt store content, failed event-log appends).

use thiserror::Error;

/// Errors surfaced by the assessment flow.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// The learner identifier is unknown; the caller must restart the flow.
    #[error("learner profile not found: {0}")]
    ProfileNotFound(String),

    /// An answer was submitted while no unanswered question is pending.
    #[error("no current question; request a question first")]
    NoCurrentQuestion,

    /// Persisted state could not be interpreted.
    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(String),

    /// An I/O error from a storage backend.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AssessmentError {
    /// Returns `true` if the learner has to start over from registration.
    pub fn requires_restart(&self) -> bool {
        matches!(self, AssessmentError::ProfileNotFound(_))
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(e: serde_json::Error) -> Self {
        AssessmentError::Serialization(e.to_string())
    }
}

/// Errors from an event-log backend.
///
/// These never propagate out of the assessment service; they are logged and
/// dropped so a locked or unwritable log cannot cost a learner their score.
#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("event log append failed: {0}")]
    AppendFailure(String),
}
