//! Subcommand implementations and shared setup.

pub mod answer;
pub mod init;
pub mod question;
pub mod quiz;
pub mod report;
pub mod start;
pub mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use dynaproof_core::engine::{AssessmentService, QuestionView};
use dynaproof_core::error::AssessmentError;
use dynaproof_core::scoring::ScoringResult;
use dynaproof_core::statistics::{round1, SessionSummary};
use dynaproof_store::config::{load_config_from, open_stores, DynaproofConfig};

/// Global options that override the loaded config.
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn load_config(&self) -> Result<DynaproofConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }

    /// Load config and open the service over the file-backed stores.
    pub fn service(&self) -> Result<(DynaproofConfig, AssessmentService)> {
        let config = self.load_config()?;
        tracing::debug!(data_dir = %config.data_dir.display(), seed = ?config.seed, "opening stores");
        let (store, events) = open_stores(&config)?;
        let service = AssessmentService::new(store, events, config.service_config());
        Ok((config, service))
    }
}

/// Attach a restart hint to unknown-learner errors.
pub fn with_hint<T>(result: Result<T, AssessmentError>) -> Result<T> {
    match result {
        Err(e) if e.requires_restart() => {
            Err(e).context("register again with `dynaproof start`")
        }
        other => other.map_err(Into::into),
    }
}

pub fn print_question(view: &QuestionView) {
    println!(
        "Question {}/{} [{}] for {} ({})",
        view.ordinal, view.total, view.difficulty, view.learner_name, view.class_label
    );
    println!("{}", view.question_text);
}

pub fn print_result(result: &ScoringResult) {
    println!(
        "Score: {}/{} ({})",
        result.total_score, result.max_score, result.tier
    );
    println!("{}", result.feedback);
}

pub fn print_summary(summary: &SessionSummary) {
    println!(
        "{} ({}): {} answered, mean {:.1}",
        summary.learner_name,
        summary.class_label,
        summary.answered,
        round1(summary.mean_score)
    );

    let mut table = Table::new();
    table.set_header(vec!["Topic", "Answered", "Mean"]);
    for topic in &summary.per_topic {
        table.add_row(vec![
            Cell::new(topic.topic),
            Cell::new(topic.answered),
            Cell::new(format!("{:.1}", topic.mean_score)),
        ]);
    }
    table.add_row(vec![
        Cell::new("best"),
        Cell::new(""),
        Cell::new(opt(summary.best_score)),
    ]);
    table.add_row(vec![
        Cell::new("worst"),
        Cell::new(""),
        Cell::new(opt(summary.worst_score)),
    ]);

    println!("{table}");
}

fn opt(score: Option<u32>) -> String {
    score.map_or_else(|| "-".to_string(), |s| s.to_string())
}
