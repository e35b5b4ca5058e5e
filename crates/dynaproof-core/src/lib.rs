//! dynaproof-core: Question synthesis, answer scoring and session logic.
//!
//! This crate holds the assessment domain: exact rational arithmetic, the
//! question synthesizer, text normalization and scoring, difficulty
//! adaptation and the per-learner session state machine. Storage backends
//! live in `dynaproof-store`.

pub mod difficulty;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod rational;
pub mod report;
pub mod scoring;
pub mod session;
pub mod similarity;
pub mod statistics;
pub mod synthesizer;
pub mod traits;
