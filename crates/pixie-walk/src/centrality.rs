// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Betweenness centrality (Brandes') over the bipartite graph.
//!
//! The pass addresses nodes by their packed `i64` form ([`Id::to_i64`]) and
//! maps them to dense indices internally, so it composes with anything else
//! that speaks packed ids. Scores are raw path counts; callers that need a
//! relative signal normalize by the maximum.

use fxhash::FxHashMap;
use pixie_common::Id;
use pixie_graph::BipartiteGraph;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Betweenness score per node.
///
/// Every undirected edge is walked in both directions, so scores carry a
/// constant factor of two over the single-direction convention; relative
/// ordering is unaffected.
pub fn betweenness(graph: &BipartiteGraph) -> FxHashMap<Id, f64> {
    let nodes: Vec<i64> = graph.ids().map(Id::to_i64).collect();
    let n = nodes.len();
    if n == 0 {
        return FxHashMap::default();
    }

    let index: FxHashMap<i64, u32> = nodes
        .iter()
        .enumerate()
        .map(|(i, &packed)| (packed, i as u32))
        .collect();

    // Dense adjacency in index space
    let adjacency: Vec<Vec<u32>> = nodes
        .iter()
        .map(|&packed| {
            let id = Id::from_i64(packed).expect("graph handed out an unpackable id");
            graph
                .neighbors(id)
                .map(|neighbor| index[&neighbor.to_i64()])
                .collect()
        })
        .collect();

    // Brandes', one BFS per source, accumulated thread-locally and merged.
    let cb = (0..n as u32)
        .into_par_iter()
        .fold(
            || vec![0.0; n],
            |mut acc_cb, s| {
                let mut s_stack = Vec::with_capacity(n);
                let mut queue = VecDeque::with_capacity(n);

                let mut dist: Vec<i32> = vec![-1; n];
                let mut sigma: Vec<u64> = vec![0; n];
                let mut preds: Vec<Vec<u32>> = vec![Vec::new(); n];

                sigma[s as usize] = 1;
                dist[s as usize] = 0;
                queue.push_back(s);

                while let Some(v) = queue.pop_front() {
                    s_stack.push(v);
                    let dist_v = dist[v as usize];

                    for &w in &adjacency[v as usize] {
                        if dist[w as usize] < 0 {
                            dist[w as usize] = dist_v + 1;
                            queue.push_back(w);
                        }
                        if dist[w as usize] == dist_v + 1 {
                            sigma[w as usize] += sigma[v as usize];
                            preds[w as usize].push(v);
                        }
                    }
                }

                let mut delta = vec![0.0; n];
                while let Some(w) = s_stack.pop() {
                    for &v in &preds[w as usize] {
                        if sigma[w as usize] > 0 {
                            delta[v as usize] += (sigma[v as usize] as f64
                                / sigma[w as usize] as f64)
                                * (1.0 + delta[w as usize]);
                        }
                    }
                    if w != s {
                        acc_cb[w as usize] += delta[w as usize];
                    }
                }
                acc_cb
            },
        )
        .reduce(
            || vec![0.0; n],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        );

    cb.into_iter()
        .enumerate()
        .map(|(i, score)| {
            let id = Id::from_i64(nodes[i]).expect("graph handed out an unpackable id");
            (id, score)
        })
        .collect()
}

/// Betweenness per graph slot, normalized by the maximum score.
pub(crate) fn normalized_betweenness(graph: &BipartiteGraph) -> Vec<f64> {
    let mut by_slot = vec![0.0; graph.node_count()];
    for (id, score) in betweenness(graph) {
        if let Some(slot) = graph.slot_of(id) {
            by_slot[slot as usize] = score;
        }
    }
    let max = by_slot.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for score in &mut by_slot {
            *score /= max;
        }
    }
    by_slot
}
