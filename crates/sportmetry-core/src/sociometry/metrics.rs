//! Network statistics over a [`ChoiceGraph`].

use super::graph::ChoiceGraph;
use super::response::ChoiceResponse;
use super::roster::Roster;
use crate::{MemberId, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A mutual pair and the number of questions it is mutual in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciprocalPair {
    pub a: MemberId,
    pub b: MemberId,
    pub level: usize,
}

/// Aggregate statistics of one question scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub member_count: usize,
    pub edge_count: usize,
    pub in_degree: BTreeMap<MemberId, usize>,
    pub out_degree: BTreeMap<MemberId, usize>,
    pub reciprocal_pairs: Vec<ReciprocalPair>,
    pub closed_edges: usize,
    /// `edges / (n (n - 1))`.
    pub density: f64,
    /// Share of edges whose reverse edge also exists: `2 * pairs / edges`.
    ///
    /// Each reciprocal pair accounts for two edges, so a fully mutual group
    /// scores 1.0. This is twice the plain `pairs / edges` ratio; halve it to
    /// compare with reports that count pairs per edge.
    pub reciprocity: f64,
    /// `reciprocal pairs / (n (n - 1) / 2)`.
    pub cohesion: f64,
    /// Share of members in at least one reciprocal pair.
    pub coverage: f64,
    pub in_degree_sd: f64,
    pub out_degree_sd: f64,
    /// `in_degree_sd / out_degree_sd`; absent when out-degrees do not vary.
    pub sd_ratio: Option<f64>,
    pub isolates: Vec<MemberId>,
}

impl NetworkMetrics {
    #[must_use]
    pub fn reciprocal_pair_count(&self) -> usize {
        self.reciprocal_pairs.len()
    }

    #[must_use]
    pub fn isolate_count(&self) -> usize {
        self.isolates.len()
    }

    /// Check if `a` and `b` chose each other, in either order.
    #[must_use]
    pub fn is_reciprocal(&self, a: MemberId, b: MemberId) -> bool {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        self.reciprocal_pairs.iter().any(|p| p.a == a && p.b == b)
    }
}

/// Population standard deviation.
fn population_sd(values: impl Iterator<Item = usize> + Clone) -> f64 {
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<usize>() as f64 / n as f64;
    let variance = values
        .map(|v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;
    variance.sqrt()
}

fn ratio(numerator: usize, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator as f64 / denominator
    } else {
        0.0
    }
}

/// Compute every statistic of a graph.
#[must_use]
pub fn compute(graph: &ChoiceGraph) -> NetworkMetrics {
    let n = graph.member_count();
    let edge_count = graph.edge_count();
    let in_degree = graph.in_degrees();
    let out_degree = graph.out_degrees();

    let reciprocal_pairs: Vec<ReciprocalPair> = graph
        .reciprocal_pairs()
        .into_iter()
        .map(|((a, b), level)| ReciprocalPair { a, b, level })
        .collect();

    let covered: BTreeSet<MemberId> = reciprocal_pairs.iter().flat_map(|p| [p.a, p.b]).collect();

    let isolates = in_degree
        .iter()
        .filter(|(member, count)| **count == 0 && out_degree.get(*member) == Some(&0))
        .map(|(member, _)| *member)
        .collect();

    let pairs = n as f64 * n.saturating_sub(1) as f64;
    let in_degree_sd = population_sd(in_degree.values().copied());
    let out_degree_sd = population_sd(out_degree.values().copied());

    NetworkMetrics {
        member_count: n,
        edge_count,
        closed_edges: graph.closed_edge_count(),
        density: ratio(edge_count, pairs),
        reciprocity: ratio(2 * reciprocal_pairs.len(), edge_count as f64),
        cohesion: ratio(reciprocal_pairs.len(), pairs / 2.0),
        coverage: ratio(covered.len(), n as f64),
        in_degree_sd,
        out_degree_sd,
        sd_ratio: (out_degree_sd > 0.0).then(|| in_degree_sd / out_degree_sd),
        in_degree,
        out_degree,
        reciprocal_pairs,
        isolates,
    }
}

/// Statistics of each requested question on its own.
#[must_use]
pub fn per_question_metrics(
    roster: &Roster,
    responses: &[ChoiceResponse],
    questions: &BTreeSet<QuestionId>,
) -> BTreeMap<QuestionId, NetworkMetrics> {
    let graph = ChoiceGraph::build(roster, responses, questions);
    questions
        .iter()
        .filter_map(|q| graph.restrict(*q).map(|slice| (*q, compute(&slice))))
        .collect()
}
