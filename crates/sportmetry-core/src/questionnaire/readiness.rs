//! Return-to-play readiness (I-PRRS) and fear avoidance (AFAQ) scoring.

use super::{InstrumentSummary, collect_scores};
use crate::primitives::{
    AFAQ_ITEM_COUNT, AFAQ_LOW_MAX, AFAQ_MODERATE_MAX, IPRRS_ITEM_COUNT, READINESS_THRESHOLD,
};
use crate::SportmetryError;
use serde::{Deserialize, Serialize};

/// Fear-avoidance level from the AFAQ total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FearAvoidanceLevel {
    Low,
    Moderate,
    High,
}

impl FearAvoidanceLevel {
    #[must_use]
    pub fn classify(total: u32) -> Self {
        if total <= AFAQ_LOW_MAX {
            FearAvoidanceLevel::Low
        } else if total <= AFAQ_MODERATE_MAX {
            FearAvoidanceLevel::Moderate
        } else {
            FearAvoidanceLevel::High
        }
    }
}

/// Raw answers of one athlete. `None` marks an unanswered item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadinessAnswers {
    pub iprrs: Vec<Option<u32>>,
    pub afaq: Vec<Option<u32>>,
}

/// Scored readiness questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub iprrs: InstrumentSummary,
    /// I-PRRS total strictly above the readiness threshold.
    pub ready: bool,
    pub afaq: InstrumentSummary,
    pub fear_avoidance: FearAvoidanceLevel,
}

/// Score both instruments.
///
/// Missing I-PRRS items are reported first; AFAQ indices follow, offset by
/// the I-PRRS item count.
pub fn score_readiness(answers: &ReadinessAnswers) -> Result<ReadinessReport, SportmetryError> {
    let iprrs = collect_scores(&answers.iprrs, IPRRS_ITEM_COUNT, 0);
    let afaq = collect_scores(&answers.afaq, AFAQ_ITEM_COUNT, IPRRS_ITEM_COUNT);

    let (iprrs, afaq) = match (iprrs, afaq) {
        (Ok(i), Ok(a)) => (i, a),
        (Err(mut missing), Err(more)) => {
            missing.extend(more);
            return Err(SportmetryError::IncompleteQuestionnaire(missing));
        }
        (Err(missing), _) | (_, Err(missing)) => {
            return Err(SportmetryError::IncompleteQuestionnaire(missing));
        }
    };

    let iprrs = InstrumentSummary::from_scores(iprrs);
    let afaq = InstrumentSummary::from_scores(afaq);
    Ok(ReadinessReport {
        ready: iprrs.total > READINESS_THRESHOLD,
        fear_avoidance: FearAvoidanceLevel::classify(afaq.total),
        iprrs,
        afaq,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(iprrs: &[u32], afaq: &[u32]) -> ReadinessAnswers {
        ReadinessAnswers {
            iprrs: iprrs.iter().copied().map(Some).collect(),
            afaq: afaq.iter().copied().map(Some).collect(),
        }
    }

    #[test]
    fn readiness_threshold_is_strict() {
        let at = score_readiness(&answers(&[10, 10, 10, 10, 5, 5], &[2; 10])).expect("score");
        assert_eq!(at.iprrs.total, 50);
        assert!(!at.ready);

        let above = score_readiness(&answers(&[10, 10, 10, 10, 5, 6], &[2; 10])).expect("score");
        assert!(above.ready);
    }

    #[test]
    fn fear_avoidance_levels() {
        assert_eq!(FearAvoidanceLevel::classify(20), FearAvoidanceLevel::Low);
        assert_eq!(FearAvoidanceLevel::classify(21), FearAvoidanceLevel::Moderate);
        assert_eq!(FearAvoidanceLevel::classify(35), FearAvoidanceLevel::Moderate);
        assert_eq!(FearAvoidanceLevel::classify(36), FearAvoidanceLevel::High);
    }

    #[test]
    fn extreme_items_keep_ties() {
        let report =
            score_readiness(&answers(&[3, 9, 3, 9, 5, 6], &[1, 5, 5, 2, 2, 2, 1, 3, 3, 3]))
                .expect("score");
        assert_eq!(report.iprrs.lowest_items, vec![1, 3]);
        assert_eq!(report.iprrs.highest_items, vec![2, 4]);
        assert_eq!(report.afaq.lowest_items, vec![1, 7]);
        assert_eq!(report.afaq.highest_items, vec![2, 3]);
    }

    #[test]
    fn missing_items_are_listed_across_instruments() {
        let mut input = answers(&[1, 2, 3, 4, 5], &[1; 10]);
        input.afaq[3] = None;
        assert_eq!(
            score_readiness(&input),
            Err(SportmetryError::IncompleteQuestionnaire(vec![6, 10]))
        );
    }
}
