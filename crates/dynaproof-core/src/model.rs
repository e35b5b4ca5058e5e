//! Learner profile data model.
//!
//! Profiles written by the earlier Flask deployment used Turkish keys and
//! left fields out when they did not exist yet. Serde aliases and defaults
//! read those files directly; [`LearnerProfile::migrate`] then repairs the
//! values the old format could not express.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque learner identifier.
pub type LearnerId = String;

/// Number of questions in one assessment session.
pub const QUESTIONS_PER_SESSION: u32 = 10;

/// Highest attainable answer score.
pub const MAX_SCORE: u32 = 100;

/// Curriculum topic a question belongs to. Only rational-number
/// operations are generated today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[serde(alias = "rasyonel")]
    Rational,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Rational => write!(f, "rational"),
        }
    }
}

/// Difficulty label attached to the next question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    #[serde(alias = "temel")]
    Basic,
    #[serde(alias = "orta")]
    Intermediate,
    #[serde(alias = "ileri")]
    Advanced,
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyTier::Basic => write!(f, "basic"),
            DifficultyTier::Intermediate => write!(f, "intermediate"),
            DifficultyTier::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "temel" => Ok(DifficultyTier::Basic),
            "intermediate" | "orta" => Ok(DifficultyTier::Intermediate),
            "advanced" | "ileri" => Ok(DifficultyTier::Advanced),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

/// One issued question and, once answered, its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 1-based position in the session.
    #[serde(alias = "soru_no")]
    pub ordinal: u32,
    #[serde(alias = "konu", default = "default_topic")]
    pub topic: Topic,
    #[serde(alias = "zorluk", default)]
    pub difficulty: DifficultyTier,
    #[serde(alias = "soru")]
    pub question_text: String,
    /// Display form of the exact result, when the question was synthesized.
    #[serde(default)]
    pub expected_answer: Option<String>,
    #[serde(alias = "puan", default)]
    pub score: Option<u32>,
}

fn default_topic() -> Topic {
    Topic::Rational
}

impl QuestionRecord {
    pub fn is_answered(&self) -> bool {
        self.score.is_some()
    }
}

/// Everything known about one learner's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    #[serde(alias = "ad")]
    pub name: String,
    #[serde(alias = "soyad")]
    pub surname: String,
    #[serde(alias = "sinif", default)]
    pub class_label: String,
    #[serde(alias = "gecmis_sorular", default)]
    pub questions_asked: Vec<QuestionRecord>,
    #[serde(alias = "gecmis_puanlar", default)]
    pub score_history: Vec<u32>,
    #[serde(alias = "soru_sayisi", default)]
    pub questions_answered: u32,
    #[serde(alias = "kayit_zamani", default, deserialize_with = "lenient_timestamp")]
    pub registered_at: Option<DateTime<Utc>>,
}

/// Accept RFC 3339 timestamps as well as the naive ISO strings the old
/// deployment wrote; anything unparseable becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

impl LearnerProfile {
    /// A fresh profile with an empty history.
    pub fn new(name: &str, surname: &str, class_label: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            surname: surname.trim().to_string(),
            class_label: class_label.trim().to_string(),
            questions_asked: Vec::new(),
            score_history: Vec::new(),
            questions_answered: 0,
            registered_at: Some(Utc::now()),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// The most recently issued question.
    pub fn last_question(&self) -> Option<&QuestionRecord> {
        self.questions_asked.last()
    }

    /// Bring a deserialized profile up to the current invariants.
    ///
    /// Old records stored `0` as a placeholder score for questions that had
    /// not been answered yet; any record past `questions_answered` is treated
    /// as unanswered. A missing score history is rebuilt from the records.
    pub fn migrate(&mut self) {
        self.questions_answered = self.questions_answered.min(QUESTIONS_PER_SESSION);
        self.questions_asked.sort_by_key(|q| q.ordinal);
        self.questions_asked.dedup_by_key(|q| q.ordinal);

        for record in &mut self.questions_asked {
            if record.ordinal > self.questions_answered {
                record.score = None;
            }
            if let Some(score) = record.score.as_mut() {
                *score = (*score).min(MAX_SCORE);
            }
        }

        if self.score_history.is_empty() {
            self.score_history = self.questions_asked.iter().filter_map(|q| q.score).collect();
        }
    }
}
