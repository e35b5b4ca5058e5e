//! Collaborator traits for learner storage and the answer event log.
//!
//! These are implemented by the `dynaproof-store` crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AssessmentError, EventLogError};
use crate::model::{DifficultyTier, LearnerId, LearnerProfile};

// ---------------------------------------------------------------------------
// Profile store
// ---------------------------------------------------------------------------

/// Keyed storage for learner profiles.
///
/// Implementations must make [`ProfileStore::update`] atomic per learner:
/// two concurrent updates for the same id may not lose each other's writes.
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile.
    fn get(&self, id: &str) -> Result<LearnerProfile, AssessmentError>;

    /// Insert or replace a profile.
    fn put(&self, id: &str, profile: LearnerProfile) -> Result<(), AssessmentError>;

    /// Register a new learner and return its freshly allocated id.
    fn create(
        &self,
        name: &str,
        surname: &str,
        class_label: &str,
    ) -> Result<(LearnerId, LearnerProfile), AssessmentError>;

    /// Read-modify-write a profile under the store's lock.
    ///
    /// The profile is written back only when `apply` returns `Ok`.
    fn update(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut LearnerProfile) -> Result<(), AssessmentError>,
    ) -> Result<LearnerProfile, AssessmentError>;
}

/// Allocate a short learner id: the first eight hex digits of a UUID v4.
pub fn new_learner_id() -> LearnerId {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// One answered question, as written to the tabular event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub timestamp: DateTime<Utc>,
    pub learner_id: LearnerId,
    pub full_name: String,
    pub class_label: String,
    pub question_text: String,
    pub answer_text: String,
    pub score: u32,
    pub difficulty: DifficultyTier,
    pub ordinal: u32,
    /// Single-line feedback; newlines are replaced by `" | "`.
    pub feedback: String,
}

/// Append-only sink for answered questions.
pub trait EventLog: Send + Sync {
    /// Append one row.
    fn try_append(&self, row: &EventRow) -> Result<(), EventLogError>;

    /// Read every row that can be parsed.
    fn read_all(&self) -> Vec<EventRow>;

    /// Append one row, logging and discarding any failure.
    fn append(&self, row: &EventRow) {
        if let Err(e) = self.try_append(row) {
            tracing::warn!(learner = %row.learner_id, ordinal = row.ordinal, "{e}");
        }
    }
}
