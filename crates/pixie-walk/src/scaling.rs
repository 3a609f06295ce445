// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Walk-length allocation.
//!
//! Each anchor is granted a share of the total step budget proportional to
//! its rating and its scaling factor `n * (c - ln n)`, which rewards anchors
//! whose neighborhood is large relative to the best-connected node of their
//! kind. Sampled shares are L1-normalized and rescaled to an integer budget
//! of `max_visits_total` steps.

use crate::config::WalkConfig;
use pixie_graph::BipartiteGraph;
use rand::Rng;
use tracing::{debug, warn};

/// Step budget granted to one anchor.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Allocation {
    /// Anchor slot in the graph arena.
    pub anchor: u32,
    pub rating: f64,
    pub steps: u64,
}

/// `n * (c - ln n)` with `n = deg(q)`, `c = max_deg(q.kind)`; 0 when the
/// anchor has no edges (which also covers the `ln 0` convention).
pub(crate) fn scaling_factor(graph: &BipartiteGraph, slot: u32) -> f64 {
    let n = graph.degree_at(slot) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let c = graph.max_degree(graph.id_at(slot).kind()) as f64;
    n * (c - n.ln())
}

/// Draws a raw walk length for a weighted anchor. Out-of-range coefficients
/// fall back to the per-walk share of the total budget.
pub(crate) fn sample_walk_length<R: Rng>(mut alpha: f64, config: &WalkConfig, rng: &mut R) -> f64 {
    let n = config.max_visits_total as f64;
    let nq = config.max_visits_per_walk as f64;
    if alpha <= 0.0 || alpha > 1.0 {
        alpha = nq / n;
    }
    alpha * (rng.gen_range(0.0..1.0) + 0.5) * n
}

/// Computes the per-anchor step budgets for a query.
///
/// Anchors with non-positive ratings get no steps; anchors missing from the
/// graph or without edges are logged and skipped rather than failing the
/// query.
pub(crate) fn allocate<R: Rng>(
    graph: &BipartiteGraph,
    config: &WalkConfig,
    rng: &mut R,
) -> Vec<Allocation> {
    let mut raw: Vec<(u32, f64, f64)> = Vec::with_capacity(config.ratings.len());
    for (&anchor, &rating) in &config.ratings {
        if rating <= 0.0 {
            debug!(anchor = %anchor, "anchor has no weight, allocating nothing");
            continue;
        }
        let Some(slot) = graph.slot_of(anchor) else {
            warn!(anchor = %anchor, "skipping anchor not present in graph");
            continue;
        };
        if graph.degree_at(slot) == 0 {
            warn!(anchor = %anchor, "skipping isolated anchor");
            continue;
        }
        let alpha = rating * scaling_factor(graph, slot);
        raw.push((slot, rating, sample_walk_length(alpha, config, rng)));
    }

    let sigma: f64 = raw.iter().map(|&(_, _, len)| len).sum();
    if sigma <= 0.0 {
        return Vec::new();
    }

    raw.into_iter()
        .filter_map(|(anchor, rating, len)| {
            let share = len / sigma;
            let steps = (share * config.max_visits_total as f64).round() as u64;
            let steps = steps.min(config.max_visits_per_walk);
            (steps > 0).then_some(Allocation {
                anchor,
                rating,
                steps,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;
    use pixie_common::Id;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn star_graph(posts: i64) -> BipartiteGraph {
        let mut g = BipartiteGraph::new();
        for p in 1..=posts {
            g.add_edge(Id::post(p), Id::tag(0)).unwrap();
        }
        g
    }

    #[test]
    fn test_scaling_factor_formula() {
        let g = star_graph(4);
        // The hub tag: n = 4, c = 4
        let hub = g.slot_of(Id::tag(0)).unwrap();
        let n = 4.0_f64;
        assert!((scaling_factor(&g, hub) - n * (n - n.ln())).abs() < 1e-12);
        // A leaf post: n = 1, ln 1 = 0, c = 1
        let leaf = g.slot_of(Id::post(1)).unwrap();
        assert!((scaling_factor(&g, leaf) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_length_fallback_band() {
        let config = WalkConfig::default().budgets(1000, 100);
        let mut rng = StdRng::seed_from_u64(42);
        for alpha in [-1.0, 0.0, 1.5, 1e9] {
            let len = sample_walk_length(alpha, &config, &mut rng);
            // fallback alpha = 0.1, so len in [50, 150)
            assert!((50.0..150.0).contains(&len), "len = {len}");
        }
    }

    #[test]
    fn test_sample_length_in_band() {
        let config = WalkConfig::default().budgets(1000, 100);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let len = sample_walk_length(0.5, &config, &mut rng);
            assert!((250.0..750.0).contains(&len), "len = {len}");
        }
    }

    #[test]
    fn test_allocate_skips_weightless_and_missing() {
        let g = star_graph(3);
        let mut ratings = FxHashMap::default();
        ratings.insert(Id::post(1), 1.0);
        ratings.insert(Id::post(2), 0.0); // weightless
        ratings.insert(Id::post(99), 2.0); // not in graph
        let config = WalkConfig::new(ratings).budgets(1000, 1000);

        let mut rng = StdRng::seed_from_u64(42);
        let allocations = allocate(&g, &config, &mut rng);
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].anchor, g.slot_of(Id::post(1)).unwrap());
    }

    #[test]
    fn test_allocation_respects_budgets() {
        let g = star_graph(6);
        let mut ratings = FxHashMap::default();
        for p in 1..=6 {
            ratings.insert(Id::post(p), p as f64);
        }
        let config = WalkConfig::new(ratings).budgets(600, 200);

        let mut rng = StdRng::seed_from_u64(7);
        let allocations = allocate(&g, &config, &mut rng);
        assert!(!allocations.is_empty());
        for alloc in &allocations {
            assert!(alloc.steps <= 200);
        }
        // Rounding drift stays within one step per anchor of the rescaled
        // budget; the per-walk cap may trim it further.
        let total: u64 = allocations.iter().map(|a| a.steps).sum();
        assert!(total <= 600 + allocations.len() as u64);
    }
}
