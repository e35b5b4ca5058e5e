//! Heuristic scoring of free-text answers.
//!
//! The score rewards effort, use of mathematical vocabulary and the shape
//! of an explanation (length, causal connectives). It does not check that
//! the explanation is actually correct.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::MAX_SCORE;
use crate::normalize::normalize;
use crate::similarity::{SequenceRatio, Similarity};

/// Flat score for any answer long enough to count.
pub const EFFORT_POINTS: u32 = 20;
/// Added at each vocabulary milestone.
pub const VOCABULARY_POINTS: u32 = 20;
/// Distinct keyword counts at which vocabulary points are awarded.
pub const VOCABULARY_MILESTONES: [usize; 3] = [1, 3, 5];
/// Added for more than [`LONG_ANSWER_TOKENS`] tokens, and again for a connective.
pub const STRUCTURE_POINTS: u32 = 10;
pub const LONG_ANSWER_TOKENS: usize = 5;
/// Normalized answers shorter than this are treated as blank.
pub const MIN_ANSWER_CHARS: usize = 3;

/// Keyword lists and matching threshold for the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Token similarity above which a keyword counts as present.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    /// Rational-number vocabulary; also the source of feedback hints.
    #[serde(default = "default_rational_terms")]
    pub rational_terms: Vec<String>,
    #[serde(default = "default_algebra_terms")]
    pub algebra_terms: Vec<String>,
    #[serde(default = "default_logic_terms")]
    pub logic_terms: Vec<String>,
    /// Kept from the earlier geometry question bank.
    #[serde(default = "default_geometry_terms")]
    pub geometry_terms: Vec<String>,
    /// Causal connectives ("because", "therefore", "for").
    #[serde(default = "default_connectives")]
    pub connectives: Vec<String>,
}

fn default_fuzzy_threshold() -> f64 {
    0.80
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_rational_terms() -> Vec<String> {
    terms(&[
        "payda", "pay", "esitle", "genislet", "sadelestir", "kesir", "tam sayi", "toplam",
        "cikar", "bolum",
    ])
}
fn default_algebra_terms() -> Vec<String> {
    terms(&[
        "degisken", "bilinmeyen", "x", "katsayi", "terim", "benzer", "parantez", "dagilma",
    ])
}
fn default_logic_terms() -> Vec<String> {
    terms(&["cunku", "bu yuzden", "dolayi", "esittir", "sonuc", "elde edilir", "yani"])
}
fn default_geometry_terms() -> Vec<String> {
    terms(&["hipotenus", "pisagor", "dik", "kare"])
}
fn default_connectives() -> Vec<String> {
    terms(&["cunku", "yuzden", "icin"])
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            rational_terms: default_rational_terms(),
            algebra_terms: default_algebra_terms(),
            logic_terms: default_logic_terms(),
            geometry_terms: default_geometry_terms(),
            connectives: default_connectives(),
        }
    }
}

impl ScoringConfig {
    /// Every topical keyword, in list order.
    pub fn all_keywords(&self) -> impl Iterator<Item = &String> {
        self.rational_terms
            .iter()
            .chain(&self.algebra_terms)
            .chain(&self.logic_terms)
            .chain(&self.geometry_terms)
    }
}

/// Quality label for a scored answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    None,
    Weak,
    Developing,
    Good,
    Excellent,
}

impl ScoreTier {
    /// Tier for a clamped total of a non-blank answer.
    pub fn from_total(total: u32) -> Self {
        if total >= 85 {
            ScoreTier::Excellent
        } else if total >= 65 {
            ScoreTier::Good
        } else if total >= 40 {
            ScoreTier::Developing
        } else {
            ScoreTier::Weak
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTier::None => write!(f, "none"),
            ScoreTier::Weak => write!(f, "weak"),
            ScoreTier::Developing => write!(f, "developing"),
            ScoreTier::Good => write!(f, "good"),
            ScoreTier::Excellent => write!(f, "excellent"),
        }
    }
}

/// Outcome of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub total_score: u32,
    pub tier: ScoreTier,
    pub max_score: u32,
    pub feedback: String,
    /// Keywords recognized in the answer, in discovery order.
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}

impl ScoringResult {
    fn blank() -> Self {
        Self {
            total_score: 0,
            tier: ScoreTier::None,
            max_score: MAX_SCORE,
            feedback: "Henüz bir cevap yazmadın.".to_string(),
            matched_keywords: Vec::new(),
        }
    }
}

/// Scores answers against configured vocabulary.
#[derive(Clone)]
pub struct AnswerScorer {
    config: ScoringConfig,
    similarity: Arc<dyn Similarity>,
    // normalized once so config files may spell keywords with diacritics
    keywords: Vec<String>,
    rational_terms: Vec<String>,
    connectives: Vec<String>,
}

impl fmt::Debug for AnswerScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerScorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for AnswerScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl AnswerScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_similarity(config, Arc::new(SequenceRatio))
    }

    /// Use a different similarity measure for fuzzy keyword matching.
    pub fn with_similarity(config: ScoringConfig, similarity: Arc<dyn Similarity>) -> Self {
        let normalized = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|k| normalize(k))
                .filter(|k| !k.is_empty())
                .collect()
        };
        let mut seen = HashSet::new();
        let keywords = config
            .all_keywords()
            .map(|k| normalize(k))
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();

        Self {
            rational_terms: normalized(&config.rational_terms),
            connectives: normalized(&config.connectives),
            keywords,
            similarity,
            config,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score an answer. The question text is accepted for future
    /// question-aware grading and is not consulted yet.
    pub fn score(&self, answer: &str, _question: &str) -> ScoringResult {
        let text = normalize(answer);
        if text.chars().count() < MIN_ANSWER_CHARS {
            return ScoringResult::blank();
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let found = self.matched_keywords(&text, &tokens);

        let mut total = EFFORT_POINTS;
        total += VOCABULARY_MILESTONES
            .iter()
            .filter(|&&milestone| found.len() >= milestone)
            .count() as u32
            * VOCABULARY_POINTS;

        if tokens.len() > LONG_ANSWER_TOKENS {
            total += STRUCTURE_POINTS;
        }
        if self.connectives.iter().any(|c| text.contains(c.as_str())) {
            total += STRUCTURE_POINTS;
        }

        let total = total.min(MAX_SCORE);
        let tier = ScoreTier::from_total(total);
        let feedback = self.feedback(tier, &text, &found);

        ScoringResult {
            total_score: total,
            tier,
            max_score: MAX_SCORE,
            feedback,
            matched_keywords: found,
        }
    }

    /// Keywords present as a substring, or close to some token.
    fn matched_keywords(&self, text: &str, tokens: &[&str]) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|keyword| {
                text.contains(keyword.as_str())
                    || tokens.iter().any(|token| {
                        self.similarity.ratio(keyword, token) > self.config.fuzzy_threshold
                    })
            })
            .cloned()
            .collect()
    }

    fn feedback(&self, tier: ScoreTier, text: &str, found: &[String]) -> String {
        match tier {
            ScoreTier::None => ScoringResult::blank().feedback,
            ScoreTier::Excellent => {
                "Mükemmel! Matematiksel dil ve mantık yürütme becerin çok yüksek. Devam et!"
                    .to_string()
            }
            ScoreTier::Good => "Çok iyi! Mantık yürütmen doğru ancak daha fazla matematiksel \
                 terim kullanabilirsin. Cevabını daha resmi bir dille yazmayı dene."
                .to_string(),
            ScoreTier::Developing => {
                let missing: Vec<&str> = self
                    .rational_terms
                    .iter()
                    .filter(|k| !text.contains(k.as_str()))
                    .take(3)
                    .map(String::as_str)
                    .collect();
                format!(
                    "Gelişmekte. Cevabında {} gibi terimler var. Ancak daha fazla adım ve \
                     sebep-sonuç ilişkisi kurmalısın. Özellikle rasyonel sayılarla ilgili şu \
                     terimleri kullanmayı dene: {}.",
                    found.join(" "),
                    missing.join(", ")
                )
            }
            ScoreTier::Weak => "Yetersiz. Cevabını adım adım, matematiksel terimler (payda, pay, \
                 eşitleme) kullanarak ve 'çünkü' ile sebep belirterek tekrar yazmalısın."
                .to_string(),
        }
    }
}
