// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Reader-writer guarded graph for the ingestion phase.
//!
//! Writers take the exclusive lock per edge insertion, so any number of
//! loader threads can feed the graph concurrently. Final graph state does
//! not depend on insertion order. [`GraphWriter::seal`] consumes the writer
//! and returns the immutable [`BipartiteGraph`], after which reads need no
//! synchronization.

use crate::bipartite::BipartiteGraph;
use parking_lot::RwLock;
use pixie_common::core::model::Post;
use pixie_common::{Id, NodeKind, Result};
use tracing::debug;

#[derive(Debug, Default)]
pub struct GraphWriter {
    inner: RwLock<BipartiteGraph>,
}

impl GraphWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            inner: RwLock::new(BipartiteGraph::with_capacity(vertices, edges)),
        }
    }

    pub fn add_edge(&self, p: Id, q: Id) -> Result<()> {
        self.inner.write().add_edge(p, q)
    }

    /// See [`BipartiteGraph::tag_post`].
    pub fn tag_post(&self, post: &Post) -> Result<usize> {
        self.inner.write().tag_post(post)
    }

    pub fn degree(&self, v: Id) -> usize {
        self.inner.read().degree(v)
    }

    pub fn max_degree(&self, k: NodeKind) -> usize {
        self.inner.read().max_degree(k)
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.read().edge_count()
    }

    /// Ends the mutation phase and returns the sealed graph.
    pub fn seal(self) -> BipartiteGraph {
        let graph = self.inner.into_inner();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "sealed graph"
        );
        graph
    }
}
