//! Interest overlap scoring.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::InterestId;

/// Jaccard similarity of two interest sets, rounded to 2 decimal places.
///
/// Returns `0.0` when either set is empty: no interests means no signal,
/// not an error. The result is symmetric and always within `[0.0, 1.0]`.
pub fn overlap_score(a: &HashSet<InterestId>, b: &HashSet<InterestId>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let common = a.intersection(b).count();
    let union = a.len() + b.len() - common;

    round_to_hundredths(common as f64 / union as f64)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coarse bucket of a match score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreLevel {
    High,
    Medium,
    Low,
    /// No score, or a zero score.
    Unknown,
}

impl ScoreLevel {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => ScoreLevel::Unknown,
            Some(s) if s <= 0.0 => ScoreLevel::Unknown,
            Some(s) if s >= 0.8 => ScoreLevel::High,
            Some(s) if s >= 0.5 => ScoreLevel::Medium,
            Some(_) => ScoreLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLevel::High => "High",
            ScoreLevel::Medium => "Medium",
            ScoreLevel::Low => "Low",
            ScoreLevel::Unknown => "Unknown",
        }
    }
}

/// Render a score as a whole percentage (`"67%"`), or `"N/A"`.
pub fn score_display(score: Option<f64>) -> String {
    match score {
        Some(s) if s > 0.0 => format!("{}%", (s * 100.0).round() as i64),
        _ => "N/A".to_string(),
    }
}
