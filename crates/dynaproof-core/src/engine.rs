//! Assessment service orchestrator.
//!
//! Ties the session logic to a profile store and an event log. Each public
//! method is one logical request: read the profile, change it in memory,
//! write it back atomically.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::model::{DifficultyTier, LearnerId, LearnerProfile, QuestionRecord, QUESTIONS_PER_SESSION};
use crate::scoring::{AnswerScorer, ScoringConfig, ScoringResult};
use crate::session::{NextStep, Session};
use crate::statistics::SessionSummary;
use crate::synthesizer::{QuestionSynthesizer, SynthesizerConfig};
use crate::traits::{EventLog, EventRow, ProfileStore};

/// Configuration for the assessment service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub synthesizer: SynthesizerConfig,
    pub scoring: ScoringConfig,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// What a front end needs to show a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub ordinal: u32,
    pub total: u32,
    pub learner_name: String,
    pub class_label: String,
    pub difficulty: DifficultyTier,
    pub question_text: String,
}

/// Build the presentation shape for a question.
pub fn render_question(profile: &LearnerProfile, record: &QuestionRecord) -> QuestionView {
    QuestionView {
        ordinal: record.ordinal,
        total: QUESTIONS_PER_SESSION,
        learner_name: profile.full_name(),
        class_label: profile.class_label.clone(),
        difficulty: record.difficulty,
        question_text: record.question_text.clone(),
    }
}

/// Outcome of a next-question request.
#[derive(Debug, Clone, PartialEq)]
pub enum NextQuestion {
    Question(QuestionView),
    Completed(SessionSummary),
}

/// An answer as submitted by a front end.
///
/// The echoed question fields are what the learner saw; the answer is always
/// scored against the profile's pending question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    pub answer_text: String,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub ordinal: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<DifficultyTier>,
}

impl Submission {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer_text: text.into(),
            ..Self::default()
        }
    }
}

/// The central assessment service.
pub struct AssessmentService {
    store: Arc<dyn ProfileStore>,
    events: Arc<dyn EventLog>,
    session: Session,
    rng: Mutex<ChaCha8Rng>,
}

impl AssessmentService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        events: Arc<dyn EventLog>,
        config: ServiceConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            store,
            events,
            session: Session::new(
                QuestionSynthesizer::new(config.synthesizer),
                AnswerScorer::new(config.scoring),
            ),
            rng: Mutex::new(rng),
        }
    }

    /// Register a new learner.
    pub fn register(
        &self,
        name: &str,
        surname: &str,
        class_label: &str,
    ) -> Result<(LearnerId, LearnerProfile), AssessmentError> {
        let (id, profile) = self.store.create(name, surname, class_label)?;
        tracing::info!(learner = %id, class = %profile.class_label, "learner registered");
        Ok((id, profile))
    }

    pub fn profile(&self, id: &str) -> Result<LearnerProfile, AssessmentError> {
        self.store.get(id)
    }

    /// Return the learner's pending question, generating it on first request.
    pub fn next_question(&self, id: &str) -> Result<NextQuestion, AssessmentError> {
        let mut step = NextStep::Completed;
        let profile = self.store.update(id, &mut |profile| {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            step = self.session.next_question(profile, &mut *rng);
            Ok(())
        })?;

        Ok(match step {
            NextStep::Question { record, generated } => {
                if generated {
                    tracing::debug!(learner = %id, ordinal = record.ordinal, "question issued");
                }
                NextQuestion::Question(render_question(&profile, &record))
            }
            NextStep::Completed => NextQuestion::Completed(SessionSummary::from_profile(&profile)),
        })
    }

    /// Score an answer to the pending question and log it.
    pub fn submit_answer(
        &self,
        id: &str,
        submission: &Submission,
    ) -> Result<ScoringResult, AssessmentError> {
        let mut outcome = None;
        let profile = self.store.update(id, &mut |profile| {
            outcome = Some(self.session.submit_answer(profile, &submission.answer_text)?);
            Ok(())
        })?;
        let (record, result) = outcome.ok_or(AssessmentError::NoCurrentQuestion)?;

        if submission.ordinal.is_some_and(|o| o != record.ordinal) {
            tracing::warn!(
                learner = %id,
                submitted = submission.ordinal,
                pending = record.ordinal,
                "answer submitted for a different ordinal; scored against the pending question"
            );
        }

        self.events.append(&EventRow {
            timestamp: Utc::now(),
            learner_id: id.to_string(),
            full_name: profile.full_name(),
            class_label: profile.class_label.clone(),
            question_text: record.question_text.clone(),
            answer_text: submission.answer_text.trim().to_string(),
            score: result.total_score,
            difficulty: record.difficulty,
            ordinal: record.ordinal,
            feedback: result.feedback.replace('\n', " | "),
        });

        if profile.questions_answered >= QUESTIONS_PER_SESSION {
            let summary = SessionSummary::from_profile(&profile);
            tracing::info!(learner = %id, mean = summary.mean_score, "session completed");
        }

        Ok(result)
    }

    /// Summary of everything answered so far.
    pub fn summary(&self, id: &str) -> Result<SessionSummary, AssessmentError> {
        Ok(SessionSummary::from_profile(&self.store.get(id)?))
    }

    /// Every logged answer.
    pub fn events(&self) -> Vec<EventRow> {
        self.events.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::error::EventLogError;
    use crate::scoring::ScoreTier;
    use crate::traits::new_learner_id;

    #[derive(Default)]
    struct MapStore {
        profiles: Mutex<HashMap<String, LearnerProfile>>,
    }

    impl ProfileStore for MapStore {
        fn get(&self, id: &str) -> Result<LearnerProfile, AssessmentError> {
            self.profiles
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| AssessmentError::ProfileNotFound(id.to_string()))
        }

        fn put(&self, id: &str, profile: LearnerProfile) -> Result<(), AssessmentError> {
            self.profiles.lock().unwrap().insert(id.to_string(), profile);
            Ok(())
        }

        fn create(
            &self,
            name: &str,
            surname: &str,
            class_label: &str,
        ) -> Result<(LearnerId, LearnerProfile), AssessmentError> {
            let id = new_learner_id();
            let profile = LearnerProfile::new(name, surname, class_label);
            self.put(&id, profile.clone())?;
            Ok((id, profile))
        }

        fn update(
            &self,
            id: &str,
            apply: &mut dyn FnMut(&mut LearnerProfile) -> Result<(), AssessmentError>,
        ) -> Result<LearnerProfile, AssessmentError> {
            let mut profiles = self.profiles.lock().unwrap();
            let mut profile = profiles
                .get(id)
                .cloned()
                .ok_or_else(|| AssessmentError::ProfileNotFound(id.to_string()))?;
            apply(&mut profile)?;
            profiles.insert(id.to_string(), profile.clone());
            Ok(profile)
        }
    }

    #[derive(Default)]
    struct VecLog {
        rows: Mutex<Vec<EventRow>>,
    }

    impl EventLog for VecLog {
        fn try_append(&self, row: &EventRow) -> Result<(), EventLogError> {
            self.rows.lock().unwrap().push(row.clone());
            Ok(())
        }

        fn read_all(&self) -> Vec<EventRow> {
            self.rows.lock().unwrap().clone()
        }
    }

    fn service() -> AssessmentService {
        AssessmentService::new(
            Arc::new(MapStore::default()),
            Arc::new(VecLog::default()),
            ServiceConfig {
                seed: Some(2024),
                ..ServiceConfig::default()
            },
        )
    }

    #[test]
    fn end_to_end_first_question() {
        let svc = service();
        let (id, _) = svc.register("Ada", "Kaya", "7-A").unwrap();

        let NextQuestion::Question(view) = svc.next_question(&id).unwrap() else {
            panic!("expected a question");
        };
        assert_eq!(view.ordinal, 1);
        assert_eq!(view.total, 10);
        assert_eq!(view.learner_name, "Ada Kaya");

        let result = svc
            .submit_answer(&id, &Submission::answer("çünkü payda eşitlenir ve sonuç bulunur"))
            .unwrap();
        assert!(result.total_score >= 40);
        assert_eq!(svc.profile(&id).unwrap().questions_answered, 1);

        let events = svc.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ordinal, 1);
        assert_eq!(events[0].question_text, view.question_text);
    }

    #[test]
    fn unknown_learner() {
        let svc = service();
        let err = svc.next_question("missing").unwrap_err();
        assert!(err.requires_restart());
        assert!(matches!(
            svc.submit_answer("missing", &Submission::answer("x")),
            Err(AssessmentError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn answer_before_question_is_rejected_and_not_logged() {
        let svc = service();
        let (id, _) = svc.register("Ada", "Kaya", "7-A").unwrap();
        let err = svc.submit_answer(&id, &Submission::answer("cevap")).unwrap_err();
        assert!(matches!(err, AssessmentError::NoCurrentQuestion));
        assert!(svc.events().is_empty());
    }

    #[test]
    fn full_session_reaches_summary() {
        let svc = service();
        let (id, _) = svc.register("Ada", "Kaya", "7-A").unwrap();

        for _ in 0..QUESTIONS_PER_SESSION {
            assert!(matches!(svc.next_question(&id).unwrap(), NextQuestion::Question(_)));
            svc.submit_answer(&id, &Submission::answer("bilmiyorum")).unwrap();
        }

        match svc.next_question(&id).unwrap() {
            NextQuestion::Completed(summary) => {
                assert_eq!(summary.answered, 10);
                assert_eq!(summary.mean_score, 20.0);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(svc.events().len(), 10);
    }

    #[test]
    fn blank_answer_is_logged_with_none_tier() {
        let svc = service();
        let (id, _) = svc.register("Ada", "Kaya", "7-A").unwrap();
        svc.next_question(&id).unwrap();
        let result = svc.submit_answer(&id, &Submission::answer("")).unwrap();
        assert_eq!(result.tier, ScoreTier::None);
        assert_eq!(svc.events()[0].score, 0);
    }

    #[test]
    fn logged_answer_is_trimmed() {
        let svc = service();
        let (id, _) = svc.register("Ada", "Kaya", "7-A").unwrap();
        svc.next_question(&id).unwrap();
        svc.submit_answer(&id, &Submission::answer("  payda eşitlenir\n"))
            .unwrap();
        assert_eq!(svc.events()[0].answer_text, "payda eşitlenir");
    }
}
