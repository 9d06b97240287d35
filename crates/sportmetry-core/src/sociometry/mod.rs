//! # Sociometric Network Engine
//!
//! Directed-choice network analysis of a roster.
//!
//! ```text
//! Roster + [ChoiceResponse] + question scope
//!     -> ChoiceGraph
//!     -> NetworkMetrics, layout, significance tiers
//! ```
//!
//! Submission acceptance ([`Submissions`]) is strict. The graph builder is
//! lenient and silently drops anything it cannot place on the roster.

pub mod graph;
pub mod layout;
pub mod metrics;
pub mod response;
pub mod roster;
pub mod significance;

pub use graph::{ChoiceGraph, Edge};
pub use layout::{Position, force_layout};
pub use metrics::{NetworkMetrics, ReciprocalPair, per_question_metrics};
pub use response::{ChoiceResponse, Submissions};
pub use roster::Roster;
pub use significance::{MemberSignificance, SignificanceTier, classify_members};

use crate::config::EngineConfig;
use crate::{MemberId, QuestionId, SportmetryError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SociogramRequest {
    /// Questions aggregated into the network.
    pub questions: BTreeSet<QuestionId>,
    /// Sympathy-type questions for significance scoring.
    #[serde(default)]
    pub sympathy: BTreeSet<QuestionId>,
    /// Functional-type questions for significance scoring.
    #[serde(default)]
    pub functional: BTreeSet<QuestionId>,
    /// Also report each question on its own.
    #[serde(default)]
    pub per_question: bool,
}

impl SociogramRequest {
    /// Significance needs at least one of the two groups.
    #[must_use]
    pub fn wants_significance(&self) -> bool {
        !self.sympathy.is_empty() || !self.functional.is_empty()
    }
}

/// Full result of one sociometric analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SociometricReport {
    pub members: Vec<String>,
    pub questions: BTreeSet<QuestionId>,
    pub metrics: NetworkMetrics,
    pub layout: BTreeMap<MemberId, Position>,
    pub significance: Vec<MemberSignificance>,
    pub per_question: BTreeMap<QuestionId, NetworkMetrics>,
}

/// Run the complete analysis for one request.
pub fn analyze(
    roster: &Roster,
    responses: &[ChoiceResponse],
    request: &SociogramRequest,
    config: &EngineConfig,
) -> Result<SociometricReport, SportmetryError> {
    let graph = ChoiceGraph::build(roster, responses, &request.questions);
    let metrics = metrics::compute(&graph);
    let layout = force_layout(roster.len(), &graph.undirected_weights(), &config.layout);

    let significance = if request.wants_significance() {
        classify_members(
            roster,
            responses,
            &request.sympathy,
            &request.functional,
            &config.significance,
        )?
    } else {
        Vec::new()
    };

    let per_question = if request.per_question {
        per_question_metrics(roster, responses, &request.questions)
    } else {
        BTreeMap::new()
    };

    Ok(SociometricReport {
        members: roster.names().to_vec(),
        questions: request.questions.clone(),
        metrics,
        layout,
        significance,
        per_question,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_fills_optional_sections_on_request() {
        let roster = Roster::new(["A", "B", "C", "D"]).expect("roster");
        let responses = vec![
            ChoiceResponse::new("A")
                .with_choices(QuestionId(1), ["B", "C", "D"])
                .with_choices(QuestionId(2), ["B", "C", "D"]),
        ];

        let plain = SociogramRequest {
            questions: [QuestionId(1)].into_iter().collect(),
            ..SociogramRequest::default()
        };
        let report = analyze(&roster, &responses, &plain, &EngineConfig::default()).expect("ok");
        assert!(report.significance.is_empty());
        assert!(report.per_question.is_empty());
        assert_eq!(report.layout.len(), 4);
        assert_eq!(report.metrics.edge_count, 3);

        let full = SociogramRequest {
            questions: [QuestionId(1), QuestionId(2)].into_iter().collect(),
            sympathy: [QuestionId(1)].into_iter().collect(),
            functional: [QuestionId(2)].into_iter().collect(),
            per_question: true,
        };
        let report = analyze(&roster, &responses, &full, &EngineConfig::default()).expect("ok");
        assert_eq!(report.significance.len(), 4);
        assert_eq!(report.significance[1].score, 3);
        assert_eq!(report.per_question.len(), 2);
    }

    #[test]
    fn analysis_restricts_to_requested_questions() {
        let names = ["A", "B", "C", "D", "E"];
        let roster = Roster::new(names).expect("roster");
        let pick = |i: usize, steps: [usize; 3]| steps.map(|s| names[(i + s) % 5]);

        // Q1: the next three members; Q2 and Q3: the previous three.
        let mut submissions = Submissions::new(roster.clone(), [1, 2, 3].map(QuestionId));
        for (i, me) in names.iter().enumerate() {
            let response = ChoiceResponse::new(*me)
                .with_choices(QuestionId(1), pick(i, [1, 2, 3]))
                .with_choices(QuestionId(2), pick(i, [4, 3, 2]))
                .with_choices(QuestionId(3), pick(i, [4, 3, 2]));
            submissions.submit(response).expect("accept");
        }
        let responses = submissions.responses();

        let only_q1 = SociogramRequest {
            questions: [QuestionId(1)].into_iter().collect(),
            ..SociogramRequest::default()
        };
        let report =
            analyze(&roster, &responses, &only_q1, &EngineConfig::default()).expect("ok");
        assert_eq!(report.metrics.edge_count, 15);
        assert_eq!(report.metrics.reciprocal_pair_count(), 5);
        assert_eq!(report.questions, only_q1.questions);

        let all = SociogramRequest {
            questions: [1, 2, 3].map(QuestionId).into_iter().collect(),
            ..SociogramRequest::default()
        };
        let report = analyze(&roster, &responses, &all, &EngineConfig::default()).expect("ok");
        assert_eq!(report.metrics.edge_count, 20);
        assert_eq!(report.metrics.density, 1.0);
    }
}
