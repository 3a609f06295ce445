// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Walk execution and score aggregation.
//!
//! One walk per weighted anchor, each granted an integer step budget by the
//! allocator. A step samples personalized neighbors until it lands on an
//! accepted kind, then records the visit. Per-anchor visit counts combine
//! under the boosted rule `(Σ √visits)²`, which rewards candidates reached
//! from several anchors.

use crate::cancel::CancelToken;
use crate::centrality::normalized_betweenness;
use crate::config::{Importance, WalkConfig};
use crate::sampler::{DeadEnd, ImportanceWeights, NeighborSampler};
use crate::scaling::{Allocation, allocate};
use fxhash::FxHashMap;
use pixie_common::{Id, Result};
use pixie_graph::BipartiteGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Result of a cancellable query.
#[derive(Clone, Debug, Default)]
pub struct Recommendations {
    /// Candidate -> relevance score; every score is strictly positive and
    /// anchors never appear as candidates.
    pub scores: FxHashMap<Id, f64>,
    /// Set when the query was cut short; `scores` then holds the partial
    /// aggregation.
    pub cancelled: bool,
}

/// Runs all walks for a query and returns the ranked candidate map.
pub fn recommend(graph: &BipartiteGraph, config: &WalkConfig) -> Result<FxHashMap<Id, f64>> {
    run(graph, config, None).map(|r| r.scores)
}

/// Like [`recommend`], but aborts at the next step boundary once `cancel`
/// fires, returning the partial aggregation with the flag set.
pub fn recommend_async(
    graph: &BipartiteGraph,
    config: &WalkConfig,
    cancel: CancelToken,
) -> Result<Recommendations> {
    run(graph, config, Some(&cancel))
}

fn run(
    graph: &BipartiteGraph,
    config: &WalkConfig,
    cancel: Option<&CancelToken>,
) -> Result<Recommendations> {
    config.validate()?;
    let mut result = Recommendations::default();
    if config.max_visits_total == 0 {
        return Ok(result);
    }
    if !config.return_kinds.is_empty()
        && !config.return_kinds.iter().any(|&k| graph.max_degree(k) > 0)
    {
        // No vertex of any requested kind has edges; walking would re-sample
        // forever without ever recording a visit.
        debug!("no vertices of the requested kinds have edges");
        return Ok(result);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let weights = match config.importance {
        Importance::DegreeNormalized => ImportanceWeights::Degree,
        Importance::Betweenness => ImportanceWeights::Betweenness(normalized_betweenness(graph)),
    };
    let mut sampler = NeighborSampler::new(graph, weights);

    let allocations = allocate(graph, config, &mut rng);
    debug!(anchors = allocations.len(), "allocated walk budgets");

    // Σ √visits per candidate slot, across anchors
    let mut boosted: FxHashMap<u32, f64> = FxHashMap::default();
    let mut visits: FxHashMap<u32, f64> = FxHashMap::default();

    for &alloc in &allocations {
        visits.clear();
        result.cancelled =
            walk_anchor(graph, config, &mut sampler, alloc, cancel, &mut visits, &mut rng);
        accumulate(&mut boosted, &visits);
        if result.cancelled {
            break;
        }
    }

    result.scores = finalize(graph, config, boosted);
    Ok(result)
}

/// Runs one anchor's walk, recording accepted visits by slot. Returns true
/// when interrupted by cancellation.
fn walk_anchor<R: Rng>(
    graph: &BipartiteGraph,
    config: &WalkConfig,
    sampler: &mut NeighborSampler<'_>,
    alloc: Allocation,
    cancel: Option<&CancelToken>,
    visits: &mut FxHashMap<u32, f64>,
    rng: &mut R,
) -> bool {
    let mut cursor = alloc.anchor;
    let mut recorded = 0u64;
    // The allocator already clamps, but rounding must never push a walk past
    // its hard cap.
    let cap = alloc.steps.min(config.max_visits_per_walk);
    while recorded < cap {
        if let Some(token) = cancel
            && token.is_cancelled()
        {
            return true;
        }
        // One step: re-sample through filtered kinds; a dead end sends the
        // walk back to its anchor without recording anything.
        let mut pos = cursor;
        let accepted = loop {
            match sampler.sample(pos, alloc.rating, rng) {
                Ok(next) if config.accepts(graph.id_at(next).kind()) => break Some(next),
                Ok(next) => pos = next,
                Err(DeadEnd) => break None,
            }
        };
        match accepted {
            Some(next) => {
                cursor = next;
                *visits.entry(next).or_insert(0.0) += 1.0;
                recorded += 1;
            }
            None => cursor = alloc.anchor,
        }
    }
    false
}

/// Folds one anchor's visit counts into the running boosted sums.
fn accumulate(boosted: &mut FxHashMap<u32, f64>, visits: &FxHashMap<u32, f64>) {
    for (&slot, &count) in visits {
        *boosted.entry(slot).or_insert(0.0) += count.sqrt();
    }
}

/// Squares the boosted sums and drops the anchors themselves.
fn finalize(
    graph: &BipartiteGraph,
    config: &WalkConfig,
    boosted: FxHashMap<u32, f64>,
) -> FxHashMap<Id, f64> {
    let mut scores = FxHashMap::default();
    for (slot, sum) in boosted {
        let id = graph.id_at(slot);
        if config.ratings.contains_key(&id) {
            continue;
        }
        scores.insert(id, sum * sum);
    }
    scores
}
