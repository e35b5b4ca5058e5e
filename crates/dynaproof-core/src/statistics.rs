//! Read-side aggregation over a learner's answered questions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{LearnerProfile, Topic};

/// Mean score for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic: Topic,
    pub answered: usize,
    pub mean_score: f64,
}

/// Overview of a learner's session so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub learner_name: String,
    pub class_label: String,
    pub answered: usize,
    pub mean_score: f64,
    pub best_score: Option<u32>,
    pub worst_score: Option<u32>,
    pub per_topic: Vec<TopicSummary>,
}

impl SessionSummary {
    /// Summarize scored questions; unanswered records are ignored.
    pub fn from_profile(profile: &LearnerProfile) -> Self {
        let scored: Vec<(Topic, u32)> = profile
            .questions_asked
            .iter()
            .filter_map(|q| q.score.map(|s| (q.topic, s)))
            .collect();

        let mut by_topic: BTreeMap<Topic, Vec<u32>> = BTreeMap::new();
        for &(topic, score) in &scored {
            by_topic.entry(topic).or_default().push(score);
        }

        let per_topic = by_topic
            .into_iter()
            .map(|(topic, scores)| TopicSummary {
                topic,
                answered: scores.len(),
                mean_score: mean(&scores),
            })
            .collect();

        let scores: Vec<u32> = scored.iter().map(|&(_, s)| s).collect();

        Self {
            learner_name: profile.full_name(),
            class_label: profile.class_label.clone(),
            answered: scores.len(),
            mean_score: mean(&scores),
            best_score: scores.iter().copied().max(),
            worst_score: scores.iter().copied().min(),
            per_topic,
        }
    }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(scores: &[u32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
}

/// Round to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
