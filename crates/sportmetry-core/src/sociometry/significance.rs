//! Member significance from sympathy and functional choices.
//!
//! `score = 2 * sympathy_in + functional_in`, each in-degree taken over the
//! aggregate graph of its question group.

use super::graph::ChoiceGraph;
use super::response::ChoiceResponse;
use super::roster::Roster;
use crate::config::SignificanceConfig;
use crate::{MemberId, QuestionId, SportmetryError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Significance tier of a member within the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceTier {
    Peripheral,
    Secondary,
    Primary,
}

impl SignificanceTier {
    #[must_use]
    pub fn classify(score: u32, thresholds: &SignificanceConfig) -> Self {
        if score >= thresholds.primary {
            SignificanceTier::Primary
        } else if score >= thresholds.secondary {
            SignificanceTier::Secondary
        } else {
            SignificanceTier::Peripheral
        }
    }
}

/// Classified significance of one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSignificance {
    pub member: MemberId,
    pub sympathy_in: u32,
    pub functional_in: u32,
    pub score: u32,
    pub tier: SignificanceTier,
}

/// Classify every roster member.
///
/// Fails if a question belongs to both groups.
pub fn classify_members(
    roster: &Roster,
    responses: &[ChoiceResponse],
    sympathy: &BTreeSet<QuestionId>,
    functional: &BTreeSet<QuestionId>,
    thresholds: &SignificanceConfig,
) -> Result<Vec<MemberSignificance>, SportmetryError> {
    if let Some(shared) = sympathy.intersection(functional).next() {
        return Err(SportmetryError::OverlappingQuestionGroups(*shared));
    }

    let sympathy_in = ChoiceGraph::build(roster, responses, sympathy).in_degrees();
    let functional_in = ChoiceGraph::build(roster, responses, functional).in_degrees();

    Ok(roster
        .members()
        .map(|member| {
            let s = sympathy_in.get(&member).copied().unwrap_or(0) as u32;
            let f = functional_in.get(&member).copied().unwrap_or(0) as u32;
            let score = 2 * s + f;
            MemberSignificance {
                member,
                sympathy_in: s,
                functional_in: f,
                score,
                tier: SignificanceTier::classify(score, thresholds),
            }
        })
        .collect())
}
