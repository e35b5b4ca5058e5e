//! Difficulty adaptation from recent scores.
//!
//! The tier travels with the next question as a label only; question
//! synthesis does not read it.

use crate::model::DifficultyTier;

/// How many of the most recent scores feed the average.
pub const TREND_WINDOW: usize = 3;

/// Average and trend of the most recent scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceTrend {
    /// Mean of the last up-to-three scores, on the 0-100 scale.
    pub avg_percent: f64,
    /// Last score minus the one before it, `0` with fewer than two scores.
    pub trend: i64,
}

impl PerformanceTrend {
    pub fn from_history(history: &[u32]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        let window = &history[history.len().saturating_sub(TREND_WINDOW)..];
        let avg_percent = window.iter().map(|&s| s as f64).sum::<f64>() / window.len() as f64;
        let trend = match history {
            [.., before, last] => *last as i64 - *before as i64,
            _ => 0,
        };
        Some(Self { avg_percent, trend })
    }
}

/// Pick the tier for the next question from the score history.
pub fn next_tier(history: &[u32]) -> DifficultyTier {
    let Some(perf) = PerformanceTrend::from_history(history) else {
        return DifficultyTier::Basic;
    };

    let tier = if perf.avg_percent >= 85.0 && perf.trend >= 0 {
        DifficultyTier::Advanced
    } else if perf.avg_percent >= 65.0 && perf.trend >= -1 {
        DifficultyTier::Intermediate
    } else {
        DifficultyTier::Basic
    };

    tracing::debug!(
        avg = perf.avg_percent,
        trend = perf.trend,
        %tier,
        "selected difficulty tier"
    );
    tier
}
