//! # Questionnaire Scoring
//!
//! Psychometric verticals sharing the same normalize -> score -> classify
//! shape as the anthropometric engine:
//!
//! - [`readiness`]: I-PRRS return-to-play readiness and AFAQ fear avoidance
//! - [`motivation`]: forced-choice sport motivation profile

pub mod motivation;
pub mod readiness;

pub use motivation::{
    ForcedChoiceItem, MotivationLevel, MotivationProfile, MotivationScale, ScaleScore,
    score_motivation,
};
pub use readiness::{FearAvoidanceLevel, ReadinessAnswers, ReadinessReport, score_readiness};

use serde::{Deserialize, Serialize};

/// Item scores of one instrument with their total and extreme items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSummary {
    pub scores: Vec<u32>,
    pub total: u32,
    /// 1-based indices of every item at the minimum score.
    pub lowest_items: Vec<usize>,
    /// 1-based indices of every item at the maximum score.
    pub highest_items: Vec<usize>,
}

impl InstrumentSummary {
    #[must_use]
    pub fn from_scores(scores: Vec<u32>) -> Self {
        let at = |target: Option<u32>| -> Vec<usize> {
            scores
                .iter()
                .enumerate()
                .filter(|(_, s)| Some(**s) == target)
                .map(|(i, _)| i + 1)
                .collect()
        };
        let lowest_items = at(scores.iter().copied().min());
        let highest_items = at(scores.iter().copied().max());
        Self {
            total: scores.iter().sum(),
            lowest_items,
            highest_items,
            scores,
        }
    }
}

/// Unwrap exactly `expected` answers, or list the missing 1-based indices
/// (shifted by `offset`).
pub(crate) fn collect_scores(
    answers: &[Option<u32>],
    expected: usize,
    offset: usize,
) -> Result<Vec<u32>, Vec<usize>> {
    let missing: Vec<usize> = (0..expected)
        .filter(|i| answers.get(*i).copied().flatten().is_none())
        .map(|i| offset + i + 1)
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }
    Ok(answers.iter().take(expected).flatten().copied().collect())
}
