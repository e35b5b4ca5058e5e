//! Session progression for a single learner.
//!
//! A session walks a profile through [`QUESTIONS_PER_SESSION`] question and
//! answer cycles. All mutation of a profile's question list happens here.

use rand::Rng;

use crate::difficulty::next_tier;
use crate::error::AssessmentError;
use crate::model::{LearnerProfile, QuestionRecord, Topic, QUESTIONS_PER_SESSION};
use crate::scoring::{AnswerScorer, ScoringResult};
use crate::synthesizer::QuestionSynthesizer;

/// Where a profile is in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// Working on question `ordinal`, which may not have been issued yet.
    InProgress { ordinal: u32 },
    Completed,
}

impl SessionState {
    pub fn of(profile: &LearnerProfile) -> Self {
        if profile.questions_answered >= QUESTIONS_PER_SESSION {
            SessionState::Completed
        } else if profile.questions_answered == 0 && profile.questions_asked.is_empty() {
            SessionState::NotStarted
        } else {
            SessionState::InProgress {
                ordinal: profile.questions_answered + 1,
            }
        }
    }
}

/// Result of asking for the next question.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// The pending question, and whether it was generated by this call.
    Question {
        record: QuestionRecord,
        generated: bool,
    },
    Completed,
}

/// Question synthesis and scoring wired to profile mutation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    synthesizer: QuestionSynthesizer,
    scorer: AnswerScorer,
}

impl Session {
    pub fn new(synthesizer: QuestionSynthesizer, scorer: AnswerScorer) -> Self {
        Self {
            synthesizer,
            scorer,
        }
    }

    pub fn scorer(&self) -> &AnswerScorer {
        &self.scorer
    }

    /// Return the pending question, generating it if it does not exist yet.
    ///
    /// Repeated calls for the same ordinal return the same record.
    pub fn next_question<R: Rng + ?Sized>(
        &self,
        profile: &mut LearnerProfile,
        rng: &mut R,
    ) -> NextStep {
        if SessionState::of(profile) == SessionState::Completed {
            return NextStep::Completed;
        }

        let ordinal = profile.questions_answered + 1;
        if let Some(last) = profile.last_question() {
            if last.ordinal == ordinal {
                return NextStep::Question {
                    record: last.clone(),
                    generated: false,
                };
            }
        }

        let difficulty = next_tier(&profile.score_history);
        let question = self.synthesizer.generate(rng);
        let record = QuestionRecord {
            ordinal,
            topic: Topic::Rational,
            difficulty,
            question_text: question.text,
            expected_answer: Some(question.result.to_string()),
            score: None,
        };
        profile.questions_asked.push(record.clone());

        NextStep::Question {
            record,
            generated: true,
        }
    }

    /// Score an answer to the pending question and record the result.
    pub fn submit_answer(
        &self,
        profile: &mut LearnerProfile,
        answer: &str,
    ) -> Result<(QuestionRecord, ScoringResult), AssessmentError> {
        let expected_ordinal = profile.questions_answered + 1;
        let record = match profile.questions_asked.last_mut() {
            Some(record)
                if record.ordinal == expected_ordinal
                    && !record.is_answered()
                    && expected_ordinal <= QUESTIONS_PER_SESSION =>
            {
                record
            }
            _ => return Err(AssessmentError::NoCurrentQuestion),
        };

        let result = self.scorer.score(answer, &record.question_text);
        record.score = Some(result.total_score);
        let record = record.clone();

        profile.score_history.push(result.total_score);
        profile.questions_answered += 1;

        Ok((record, result))
    }
}
