//! Rational-number question synthesis.
//!
//! Questions are produced by rejection sampling: draw two operands and an
//! operator, compute the exact result, and keep the draw only when the
//! result is small enough to work out by hand.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rational::Rational;

/// Bounds for generated questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Largest accepted result denominator (lowest terms).
    #[serde(default = "default_max_denominator")]
    pub max_denominator: i64,
    /// Accepted result numerators lie in `[-numerator_limit, numerator_limit]`.
    #[serde(default = "default_numerator_limit")]
    pub numerator_limit: i64,
    /// Draws before falling back to the fixed question.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_denominator() -> i64 {
    12
}
fn default_numerator_limit() -> i64 {
    10
}
fn default_max_attempts() -> u32 {
    10_000
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            max_denominator: default_max_denominator(),
            numerator_limit: default_numerator_limit(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// The four arithmetic operations a question can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Apply the operator; `None` when dividing by zero.
    pub fn apply(&self, left: Rational, right: Rational) -> Option<Rational> {
        match self {
            Operator::Add => Some(left + right),
            Operator::Subtract => Some(left - right),
            Operator::Multiply => Some(left * right),
            Operator::Divide => left.checked_div(right).ok(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A synthesized question together with its exact answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub text: String,
    pub left: Rational,
    pub operator: Operator,
    pub right: Rational,
    pub result: Rational,
}

impl GeneratedQuestion {
    fn new(left: Rational, operator: Operator, right: Rational, result: Rational) -> Self {
        Self {
            text: format!(
                "({left}) {operator} ({right}) işleminin sonucunun neden {result} olduğunu adım adım açıkla."
            ),
            left,
            operator,
            right,
            result,
        }
    }

    /// The question served when sampling keeps failing: 1/2 + 1/3 = 5/6.
    pub fn fallback() -> Self {
        let half = Rational::new(1, 2).unwrap_or(Rational::ZERO);
        let third = Rational::new(1, 3).unwrap_or(Rational::ZERO);
        Self {
            text: FALLBACK_QUESTION.to_string(),
            left: half,
            operator: Operator::Add,
            right: third,
            result: half + third,
        }
    }
}

/// Fixed question text used when no acceptable draw was found.
pub const FALLBACK_QUESTION: &str = "1/2 + 1/3 işleminin sonucunu adım adım açıkla.";

/// Generates rational-arithmetic questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionSynthesizer {
    config: SynthesizerConfig,
}

impl QuestionSynthesizer {
    pub fn new(config: SynthesizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Draw questions until one satisfies the result bounds.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedQuestion {
        for attempt in 1..=self.config.max_attempts {
            let operator = *Operator::ALL.choose(rng).unwrap_or(&Operator::Add);
            let left = nonzero_or(random_operand(rng), 1, 2);
            let right = nonzero_or(random_operand(rng), 1, 3);

            let Some(result) = operator.apply(left, right) else {
                continue;
            };

            if self.accepts(result) {
                tracing::debug!(attempt, %left, %operator, %right, %result, "question synthesized");
                return GeneratedQuestion::new(left, operator, right, result);
            }
        }

        tracing::warn!(
            max_attempts = self.config.max_attempts,
            "no acceptable question found, using fallback"
        );
        GeneratedQuestion::fallback()
    }

    /// Whether a result is simple enough to ask about.
    pub fn accepts(&self, result: Rational) -> bool {
        let limit = self.config.numerator_limit;
        result.denom() <= self.config.max_denominator && (-limit..=limit).contains(&result.numer())
    }
}

fn random_operand<R: Rng + ?Sized>(rng: &mut R) -> Rational {
    let numer = rng.gen_range(-5..=5);
    let denom = rng.gen_range(2..=6);
    Rational::new(numer, denom).unwrap_or(Rational::ZERO)
}

fn nonzero_or(value: Rational, numer: i64, denom: i64) -> Rational {
    if value.is_zero() {
        Rational::new(numer, denom).unwrap_or(value)
    } else {
        value
    }
}
