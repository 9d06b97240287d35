//! # Property-Based Tests
//!
//! Determinism and range invariants of the engines, checked with proptest.

use proptest::collection::vec;
use proptest::prelude::*;
use sportmetry_core::anthropometry::correction_factor;
use sportmetry_core::sociometry::{ChoiceGraph, force_layout, metrics};
use sportmetry_core::{
    ChoiceResponse, LayoutConfig, QuestionId, ReferenceTable, Roster, approx_lookup,
};
use std::collections::BTreeSet;

fn roster(n: usize) -> Roster {
    Roster::new((0..n).map(|i| format!("M{i}"))).expect("roster")
}

/// Responses from (sender, target) index pairs on question 1.
fn responses(n: usize, picks: &[(usize, usize)]) -> Vec<ChoiceResponse> {
    (0..n)
        .map(|sender| {
            let targets: Vec<String> = picks
                .iter()
                .filter(|(s, _)| *s % n == sender)
                .map(|(_, t)| format!("M{}", t % n))
                .collect();
            ChoiceResponse::new(format!("M{sender}")).with_choices(QuestionId(1), targets)
        })
        .collect()
}

fn scope() -> BTreeSet<QuestionId> {
    [QuestionId(1)].into_iter().collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// A lookup result is always one of the table's values.
    #[test]
    fn lookup_returns_a_table_value(
        pairs in vec((0.0f64..100.0, -50.0f64..50.0), 1..30),
        query in -10.0f64..110.0,
    ) {
        let table = ReferenceTable::from_pairs("k", "v", &pairs);
        let value = approx_lookup(query, &table, "k", "v");
        prop_assert!(value.is_some());
        prop_assert!(pairs.iter().any(|&(_, v)| Some(v) == value));
    }

    /// Lookups are monotonic when the value column is.
    #[test]
    fn lookup_is_monotonic_on_monotonic_tables(
        keys in vec(0.0f64..100.0, 2..20),
        a in 0.0f64..100.0,
        b in 0.0f64..100.0,
    ) {
        let pairs: Vec<(f64, f64)> = keys.iter().map(|&k| (k, k * 2.0)).collect();
        let table = ReferenceTable::from_pairs("k", "v", &pairs);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let vlo = approx_lookup(lo, &table, "k", "v");
        let vhi = approx_lookup(hi, &table, "k", "v");
        prop_assert!(vlo <= vhi);
    }

    /// The correction factor is always one of the five steps.
    #[test]
    fn correction_factor_is_a_step(delta in -10.0f64..10.0) {
        let factor = correction_factor(delta);
        prop_assert!([1.08, 1.05, 1.00, 0.95, 0.92].contains(&factor));
    }

    /// Ratios stay within [0, 1] and degrees balance.
    #[test]
    fn network_ratios_are_bounded(
        n in 4usize..12,
        picks in vec((0usize..12, 0usize..12), 0..60),
    ) {
        let roster = roster(n);
        let graph = ChoiceGraph::build(&roster, &responses(n, &picks), &scope());
        let m = metrics::compute(&graph);

        for ratio in [m.density, m.reciprocity, m.cohesion, m.coverage] {
            prop_assert!((0.0..=1.0).contains(&ratio));
        }
        let total_in: usize = m.in_degree.values().sum();
        let total_out: usize = m.out_degree.values().sum();
        prop_assert_eq!(total_in, m.edge_count);
        prop_assert_eq!(total_out, m.edge_count);
        prop_assert!(m.closed_edges <= m.edge_count);
    }

    /// Same input, same metrics.
    #[test]
    fn network_metrics_are_deterministic(
        n in 4usize..10,
        picks in vec((0usize..10, 0usize..10), 0..40),
    ) {
        let roster = roster(n);
        let input = responses(n, &picks);
        let first = metrics::compute(&ChoiceGraph::build(&roster, &input, &scope()));
        let second = metrics::compute(&ChoiceGraph::build(&roster, &input, &scope()));
        prop_assert_eq!(first, second);
    }

    /// Layout coordinates stay finite.
    #[test]
    fn layout_is_finite(
        n in 1usize..10,
        picks in vec((0usize..10, 0usize..10), 0..40),
    ) {
        let graph = ChoiceGraph::build(&roster(n.max(4)), &responses(n.max(4), &picks), &scope());
        let config = LayoutConfig { iterations: 50, ..LayoutConfig::default() };
        let layout = force_layout(n, &graph.undirected_weights(), &config);

        prop_assert_eq!(layout.len(), n);
        for p in layout.values() {
            prop_assert!(p.x.is_finite() && p.y.is_finite());
        }
    }
}
