//! Cohort report built from the event log, with JSON persistence.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DifficultyTier, LearnerId};
use crate::statistics::{mean, round1};
use crate::traits::EventRow;

/// One answered question inside a learner report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub ordinal: u32,
    pub difficulty: DifficultyTier,
    pub question_text: String,
    pub answer_text: String,
    pub score: u32,
    pub feedback: String,
}

/// Everything the log holds about one learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerReport {
    pub learner_id: LearnerId,
    pub full_name: String,
    pub class_label: String,
    /// Timestamp of the learner's first logged answer.
    pub started_at: DateTime<Utc>,
    pub answers: Vec<AnswerEntry>,
    pub mean_score: f64,
    pub best_score: u32,
    pub worst_score: u32,
}

/// Per-learner breakdown of every logged answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortReport {
    pub created_at: DateTime<Utc>,
    pub learners: Vec<LearnerReport>,
    pub total_answers: usize,
}

impl CohortReport {
    /// Group rows by learner in first-seen order, answers sorted by ordinal.
    pub fn from_events(rows: &[EventRow]) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut grouped: HashMap<&str, Vec<&EventRow>> = HashMap::new();
        for row in rows {
            let entry = grouped.entry(row.learner_id.as_str()).or_default();
            if entry.is_empty() {
                order.push(row.learner_id.as_str());
            }
            entry.push(row);
        }

        let learners = order
            .into_iter()
            .filter_map(|id| grouped.remove(id))
            .filter_map(learner_report)
            .collect();

        Self {
            created_at: Utc::now(),
            learners,
            total_answers: rows.len(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }
}

fn learner_report(mut rows: Vec<&EventRow>) -> Option<LearnerReport> {
    rows.sort_by_key(|r| r.ordinal);
    let first = *rows.first()?;
    let scores: Vec<u32> = rows.iter().map(|r| r.score).collect();
    let started_at = rows.iter().map(|r| r.timestamp).min().unwrap_or(first.timestamp);

    Some(LearnerReport {
        learner_id: first.learner_id.clone(),
        full_name: first.full_name.clone(),
        class_label: first.class_label.clone(),
        started_at,
        answers: rows
            .iter()
            .map(|r| AnswerEntry {
                ordinal: r.ordinal,
                difficulty: r.difficulty,
                question_text: r.question_text.clone(),
                answer_text: r.answer_text.clone(),
                score: r.score,
                feedback: r.feedback.clone(),
            })
            .collect(),
        mean_score: round1(mean(&scores)),
        best_score: scores.iter().copied().max().unwrap_or(0),
        worst_score: scores.iter().copied().min().unwrap_or(0),
    })
}
