//! Forced-choice sport motivation scoring.
//!
//! Each item pairs two statements, each tied to one motivation scale.
//! Answering `1` or `2` credits the scale of the chosen statement.

use crate::SportmetryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The six motivation scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationScale {
    #[serde(alias = "Intrinsic_Knowledge", alias = "Belső_tudás")]
    IntrinsicKnowledge,
    #[serde(alias = "Intrinsic_Perfection", alias = "Belső_tökéletesség")]
    IntrinsicAccomplishment,
    #[serde(alias = "Intrinsic_Enjoyment", alias = "Belső_öröm")]
    IntrinsicStimulation,
    #[serde(alias = "Introjected", alias = "Introjektált")]
    Introjected,
    #[serde(alias = "Extrinsic", alias = "Külső")]
    Extrinsic,
    #[serde(alias = "Amotivation", alias = "Amotiváció")]
    Amotivation,
}

impl MotivationScale {
    pub const ALL: [MotivationScale; 6] = [
        MotivationScale::IntrinsicKnowledge,
        MotivationScale::IntrinsicAccomplishment,
        MotivationScale::IntrinsicStimulation,
        MotivationScale::Introjected,
        MotivationScale::Extrinsic,
        MotivationScale::Amotivation,
    ];
}

/// How characteristic a scale is for the athlete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationLevel {
    Weak,
    Moderate,
    Strong,
}

impl MotivationLevel {
    /// `>= 25 %` strong, `>= 10 %` moderate, otherwise weak.
    #[must_use]
    pub fn classify(percent: f64) -> Self {
        if percent >= 25.0 {
            MotivationLevel::Strong
        } else if percent >= 10.0 {
            MotivationLevel::Moderate
        } else {
            MotivationLevel::Weak
        }
    }
}

/// One forced-choice item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedChoiceItem {
    pub first: MotivationScale,
    pub second: MotivationScale,
}

/// Result of one scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleScore {
    pub count: u32,
    pub percent: f64,
    pub level: MotivationLevel,
}

/// Scored motivation questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotivationProfile {
    pub scales: BTreeMap<MotivationScale, ScaleScore>,
    pub total: u32,
    /// Any amotivation answer at all.
    pub amotivation_flag: bool,
}

impl MotivationProfile {
    #[must_use]
    pub fn score(&self, scale: MotivationScale) -> Option<&ScaleScore> {
        self.scales.get(&scale)
    }
}

/// Score answers against the item key.
///
/// Every item needs an answer of `1` or `2`; unanswered items fail with
/// their 1-based indices.
pub fn score_motivation(
    items: &[ForcedChoiceItem],
    answers: &[Option<u8>],
) -> Result<MotivationProfile, SportmetryError> {
    if answers.len() > items.len() {
        return Err(SportmetryError::InvalidAnswer {
            item: items.len() + 1,
            reason: format!("only {} items exist", items.len()),
        });
    }

    let missing: Vec<usize> = (0..items.len())
        .filter(|i| answers.get(*i).copied().flatten().is_none())
        .map(|i| i + 1)
        .collect();
    if !missing.is_empty() {
        return Err(SportmetryError::IncompleteQuestionnaire(missing));
    }

    let mut counts: BTreeMap<MotivationScale, u32> =
        MotivationScale::ALL.iter().map(|s| (*s, 0)).collect();

    for (index, (item, answer)) in items.iter().zip(answers).enumerate() {
        let scale = match answer {
            Some(1) => item.first,
            Some(2) => item.second,
            other => {
                return Err(SportmetryError::InvalidAnswer {
                    item: index + 1,
                    reason: format!("expected 1 or 2, got {other:?}"),
                });
            }
        };
        *counts.entry(scale).or_insert(0) += 1;
    }

    let total: u32 = counts.values().sum();
    let scales = counts
        .into_iter()
        .map(|(scale, count)| {
            let percent = if total > 0 {
                f64::from(count) / f64::from(total) * 100.0
            } else {
                0.0
            };
            let score = ScaleScore {
                count,
                percent,
                level: MotivationLevel::classify(percent),
            };
            (scale, score)
        })
        .collect::<BTreeMap<_, _>>();

    let amotivation_flag = scales
        .get(&MotivationScale::Amotivation)
        .is_some_and(|s| s.count > 0);

    Ok(MotivationProfile {
        scales,
        total,
        amotivation_flag,
    })
}
