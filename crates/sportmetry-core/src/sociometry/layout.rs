//! Force-directed sociogram layout.
//!
//! Nodes start evenly spaced on a circle. Each iteration applies a pairwise
//! repulsion `k_rep / d` and, for weighted pairs, a spring pulling toward
//! `base_separation / (1 + weight)`; displacements are capped by a linearly
//! cooling step and the layout is re-centered on its centroid.
//!
//! Deterministic: no randomness, fixed iteration order.

use super::graph::Edge;
use crate::config::LayoutConfig;
use crate::primitives::LAYOUT_MIN_DISTANCE;
use crate::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A 2D node position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

fn initial_circle(n: usize, radius: f64) -> Vec<Position> {
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            Position {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            }
        })
        .collect()
}

fn recenter(positions: &mut [Position]) {
    if positions.is_empty() {
        return;
    }
    let n = positions.len() as f64;
    let cx = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = positions.iter().map(|p| p.y).sum::<f64>() / n;
    for p in positions.iter_mut() {
        p.x -= cx;
        p.y -= cy;
    }
}

/// Lay out `member_count` nodes under the given undirected pair weights.
///
/// A single member sits at the origin.
#[must_use]
pub fn force_layout(
    member_count: usize,
    weights: &BTreeMap<Edge, u32>,
    config: &LayoutConfig,
) -> BTreeMap<MemberId, Position> {
    if member_count <= 1 {
        return (0..member_count)
            .map(|i| (MemberId(i), Position::default()))
            .collect();
    }

    let mut positions = initial_circle(member_count, config.initial_radius);
    let iterations = config.iterations.max(1) as f64;

    for step in 0..config.iterations {
        let max_step = config.max_step * (1.0 - step as f64 / iterations);
        let mut shift = vec![(0.0_f64, 0.0_f64); member_count];

        for i in 0..member_count {
            for j in (i + 1)..member_count {
                let (pi, pj) = (positions[i], positions[j]);
                let (dx, dy) = (pi.x - pj.x, pi.y - pj.y);
                let dist = dx.hypot(dy).max(LAYOUT_MIN_DISTANCE);
                let (ux, uy) = (dx / dist, dy / dist);

                let mut force = config.repulsion / dist;
                if let Some(&w) = weights.get(&(MemberId(i), MemberId(j)))
                    && w > 0
                {
                    let target = config.base_separation / (1.0 + f64::from(w));
                    force -= config.attraction * (dist - target);
                }

                shift[i].0 += ux * force;
                shift[i].1 += uy * force;
                shift[j].0 -= ux * force;
                shift[j].1 -= uy * force;
            }
        }

        for (p, (sx, sy)) in positions.iter_mut().zip(shift) {
            let len = sx.hypot(sy);
            let scale = if len > max_step { max_step / len } else { 1.0 };
            p.x += sx * scale;
            p.y += sy * scale;
        }
        recenter(&mut positions);
    }

    positions
        .into_iter()
        .enumerate()
        .map(|(i, p)| (MemberId(i), p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: usize, b: usize) -> Edge {
        (MemberId(a), MemberId(b))
    }

    #[test]
    fn single_member_sits_at_origin() {
        let layout = force_layout(1, &BTreeMap::new(), &LayoutConfig::default());
        assert_eq!(layout.get(&MemberId(0)), Some(&Position::default()));
        assert!(force_layout(0, &BTreeMap::new(), &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn layout_is_deterministic_and_centered() {
        let weights: BTreeMap<Edge, u32> = [(pair(0, 1), 3), (pair(2, 3), 1)].into_iter().collect();
        let config = LayoutConfig::default();
        let first = force_layout(6, &weights, &config);
        let second = force_layout(6, &weights, &config);
        assert_eq!(first, second);

        let cx: f64 = first.values().map(|p| p.x).sum::<f64>() / 6.0;
        let cy: f64 = first.values().map(|p| p.y).sum::<f64>() / 6.0;
        assert!(cx.abs() < 1e-9 && cy.abs() < 1e-9);
    }

    #[test]
    fn no_two_nodes_overlap() {
        let weights: BTreeMap<Edge, u32> = [(pair(0, 1), 6), (pair(1, 2), 6), (pair(0, 2), 6)]
            .into_iter()
            .collect();
        let layout = force_layout(8, &weights, &LayoutConfig::default());
        let points: Vec<Position> = layout.values().copied().collect();
        for (i, a) in points.iter().enumerate() {
            assert!(a.x.is_finite() && a.y.is_finite());
            for b in points.iter().skip(i + 1) {
                assert!(a.distance(*b) > 1e-3);
            }
        }
    }

    #[test]
    fn heavier_pairs_end_up_closer() {
        let weights: BTreeMap<Edge, u32> = [(pair(0, 1), 6), (pair(2, 3), 1)].into_iter().collect();
        let layout = force_layout(4, &weights, &LayoutConfig::default());
        let d = |a: usize, b: usize| {
            let pa = layout.get(&MemberId(a)).copied().unwrap_or_default();
            let pb = layout.get(&MemberId(b)).copied().unwrap_or_default();
            pa.distance(pb)
        };
        assert!(d(0, 1) < d(2, 3));
    }
}
