//! In-memory backends for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use dynaproof_core::error::{AssessmentError, EventLogError};
use dynaproof_core::model::{LearnerId, LearnerProfile};
use dynaproof_core::traits::{new_learner_id, EventLog, EventRow, ProfileStore};

/// Profiles held in a `HashMap` behind a single lock.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<LearnerId, LearnerProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<LearnerId, LearnerProfile>> {
        self.profiles.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, id: &str) -> Result<LearnerProfile, AssessmentError> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| AssessmentError::ProfileNotFound(id.to_string()))
    }

    fn put(&self, id: &str, profile: LearnerProfile) -> Result<(), AssessmentError> {
        self.lock().insert(id.to_string(), profile);
        Ok(())
    }

    fn create(
        &self,
        name: &str,
        surname: &str,
        class_label: &str,
    ) -> Result<(LearnerId, LearnerProfile), AssessmentError> {
        let mut profiles = self.lock();
        let mut id = new_learner_id();
        while profiles.contains_key(&id) {
            id = new_learner_id();
        }
        let profile = LearnerProfile::new(name, surname, class_label);
        profiles.insert(id.clone(), profile.clone());
        Ok((id, profile))
    }

    fn update(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut LearnerProfile) -> Result<(), AssessmentError>,
    ) -> Result<LearnerProfile, AssessmentError> {
        let mut profiles = self.lock();
        let mut profile = profiles
            .get(id)
            .cloned()
            .ok_or_else(|| AssessmentError::ProfileNotFound(id.to_string()))?;
        apply(&mut profile)?;
        profiles.insert(id.to_string(), profile.clone());
        Ok(profile)
    }
}

/// Event rows kept in a `Vec`.
///
/// Can be switched into a failing mode to exercise the swallow-on-failure
/// path of [`EventLog::append`].
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    rows: Mutex<Vec<EventRow>>,
    failing: AtomicBool,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log whose appends always fail.
    pub fn failing() -> Self {
        let log = Self::default();
        log.set_failing(true);
        log
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

impl EventLog for MemoryEventLog {
    fn try_append(&self, row: &EventRow) -> Result<(), EventLogError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(EventLogError::AppendFailure("event log is locked".into()));
        }
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());
        Ok(())
    }

    fn read_all(&self) -> Vec<EventRow> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
