//! # Choice Graph
//!
//! Directed choice graph over a roster, aggregated across a set of
//! questions. Built fresh per query; never persisted.
//!
//! The aggregate edge set is unweighted (an edge is present or absent).
//! Per-question edge sets are kept alongside for reciprocity levels and
//! layout weights.

use super::response::ChoiceResponse;
use super::roster::Roster;
use crate::{MemberId, QuestionId};
use std::collections::{BTreeMap, BTreeSet};

/// A directed edge: (chooser, chosen).
pub type Edge = (MemberId, MemberId);

/// Directed choice graph for one question scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGraph {
    member_count: usize,
    edges: BTreeSet<Edge>,
    per_question: BTreeMap<QuestionId, BTreeSet<Edge>>,
}

impl ChoiceGraph {
    /// Aggregate responses over the requested questions.
    ///
    /// Respondents and targets not on the roster, self-choices and repeated
    /// choices are dropped silently.
    #[must_use]
    pub fn build(
        roster: &Roster,
        responses: &[ChoiceResponse],
        questions: &BTreeSet<QuestionId>,
    ) -> Self {
        let mut per_question: BTreeMap<QuestionId, BTreeSet<Edge>> = questions
            .iter()
            .map(|q| (*q, BTreeSet::new()))
            .collect();

        for response in responses {
            let Some(sender) = roster.resolve(&response.respondent) else {
                continue;
            };
            for (question, names) in &response.choices {
                let Some(edges) = per_question.get_mut(question) else {
                    continue;
                };
                for target in names.iter().filter_map(|name| roster.resolve(name)) {
                    if target != sender {
                        edges.insert((sender, target));
                    }
                }
            }
        }

        let edges = per_question.values().flatten().copied().collect();
        Self {
            member_count: roster.len(),
            edges,
            per_question,
        }
    }

    /// Number of roster members (nodes).
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.member_count
    }

    /// Number of distinct directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The aggregate edge set.
    #[must_use]
    pub fn edges(&self) -> &BTreeSet<Edge> {
        &self.edges
    }

    /// Questions this graph aggregates over.
    pub fn questions(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.per_question.keys().copied()
    }

    #[must_use]
    pub fn has_edge(&self, from: MemberId, to: MemberId) -> bool {
        self.edges.contains(&(from, to))
    }

    fn members(&self) -> impl Iterator<Item = MemberId> {
        (0..self.member_count).map(MemberId)
    }

    /// In-degree of every member, zero included.
    #[must_use]
    pub fn in_degrees(&self) -> BTreeMap<MemberId, usize> {
        let mut degrees: BTreeMap<MemberId, usize> = self.members().map(|m| (m, 0)).collect();
        for (_, to) in &self.edges {
            *degrees.entry(*to).or_insert(0) += 1;
        }
        degrees
    }

    /// Out-degree of every member, zero included.
    #[must_use]
    pub fn out_degrees(&self) -> BTreeMap<MemberId, usize> {
        let mut degrees: BTreeMap<MemberId, usize> = self.members().map(|m| (m, 0)).collect();
        for (from, _) in &self.edges {
            *degrees.entry(*from).or_insert(0) += 1;
        }
        degrees
    }

    /// Reciprocal pairs `(a, b)` with `a < b`, mapped to their reciprocity
    /// level: the number of questions in which the pair is mutual on its
    /// own, at least 1.
    #[must_use]
    pub fn reciprocal_pairs(&self) -> BTreeMap<Edge, usize> {
        self.edges
            .iter()
            .filter(|(a, b)| a < b && self.has_edge(*b, *a))
            .map(|&(a, b)| {
                let level = self
                    .per_question
                    .values()
                    .filter(|edges| edges.contains(&(a, b)) && edges.contains(&(b, a)))
                    .count();
                ((a, b), level.max(1))
            })
            .collect()
    }

    /// Undirected adjacency over the aggregate edge set.
    #[must_use]
    pub fn undirected_neighbors(&self) -> BTreeMap<MemberId, BTreeSet<MemberId>> {
        let mut adjacency: BTreeMap<MemberId, BTreeSet<MemberId>> = BTreeMap::new();
        for &(a, b) in &self.edges {
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
        }
        adjacency
    }

    /// Edges `A -> B` whose endpoints share an undirected neighbor other
    /// than each other.
    #[must_use]
    pub fn closed_edge_count(&self) -> usize {
        let adjacency = self.undirected_neighbors();
        let empty = BTreeSet::new();
        self.edges
            .iter()
            .filter(|(a, b)| {
                let na = adjacency.get(a).unwrap_or(&empty);
                let nb = adjacency.get(b).unwrap_or(&empty);
                na.intersection(nb).any(|c| c != a && c != b)
            })
            .count()
    }

    /// Undirected pair weights `(a, b)` with `a < b`: the number of directed
    /// choices between the pair, summed over the questions.
    #[must_use]
    pub fn undirected_weights(&self) -> BTreeMap<Edge, u32> {
        let mut weights: BTreeMap<Edge, u32> = BTreeMap::new();
        for &(from, to) in self.per_question.values().flatten() {
            let key = if from < to { (from, to) } else { (to, from) };
            *weights.entry(key).or_insert(0) += 1;
        }
        weights
    }

    /// The single-question slice of this graph.
    #[must_use]
    pub fn restrict(&self, question: QuestionId) -> Option<Self> {
        let edges = self.per_question.get(&question)?.clone();
        let mut per_question = BTreeMap::new();
        per_question.insert(question, edges.clone());
        Some(Self {
            member_count: self.member_count,
            edges,
            per_question,
        })
    }
}
