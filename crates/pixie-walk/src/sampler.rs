// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Biased single-step neighbor sampling.
//!
//! The step draws a budget uniform in `[0, |neighbors|)` and spends it
//! walking the shuffled neighbor list, subtracting
//! `(importance(u) + 1) * rating` per candidate and wrapping around until
//! the budget goes negative. The budget and the weights deliberately live on
//! different scales; this noisy traversal is the sampling semantics, not an
//! approximation of inverse-CDF weighted choice.

use pixie_graph::BipartiteGraph;
use rand::Rng;
use rand::seq::SliceRandom;

/// The current vertex has no neighbors; the engine restarts the walk from
/// its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DeadEnd;

/// Node-importance weights resolved for one query.
pub(crate) enum ImportanceWeights {
    /// `deg(u) / max_deg(u.kind)`, evaluated on demand.
    Degree,
    /// Betweenness per slot, already normalized by the maximum score.
    Betweenness(Vec<f64>),
}

pub(crate) struct NeighborSampler<'g> {
    graph: &'g BipartiteGraph,
    weights: ImportanceWeights,
    scratch: Vec<u32>,
}

impl<'g> NeighborSampler<'g> {
    pub fn new(graph: &'g BipartiteGraph, weights: ImportanceWeights) -> Self {
        Self {
            graph,
            weights,
            scratch: Vec::new(),
        }
    }

    #[inline]
    fn importance_of(&self, slot: u32) -> f64 {
        match &self.weights {
            ImportanceWeights::Degree => {
                // Any candidate has at least one edge, so the per-kind max
                // is at least its degree and never zero.
                let max = self.graph.max_degree(self.graph.id_at(slot).kind());
                self.graph.degree_at(slot) as f64 / max as f64
            }
            ImportanceWeights::Betweenness(scores) => scores[slot as usize],
        }
    }

    /// Samples one personalized neighbor of `from` for a walk whose anchor
    /// carries `rating`.
    ///
    /// `rating` must be strictly positive; the walk allocator never grants
    /// steps to weightless anchors.
    pub fn sample<R: Rng>(
        &mut self,
        from: u32,
        rating: f64,
        rng: &mut R,
    ) -> Result<u32, DeadEnd> {
        let graph = self.graph;
        let neighbors = graph.neighbor_slots(from);
        if neighbors.is_empty() {
            return Err(DeadEnd);
        }
        self.scratch.clear();
        self.scratch.extend_from_slice(neighbors);
        self.scratch.shuffle(rng);

        let mut budget = rng.gen_range(0.0..1.0) * self.scratch.len() as f64;
        let mut i = 0;
        loop {
            let candidate = self.scratch[i];
            budget -= (self.importance_of(candidate) + 1.0) * rating;
            if budget < 0.0 {
                return Ok(candidate);
            }
            i += 1;
            if i == self.scratch.len() {
                i = 0;
            }
        }
    }
}
