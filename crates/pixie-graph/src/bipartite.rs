// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Bipartite adjacency store with degree bookkeeping.
//!
//! Vertices live in a dense arena indexed by `u32` slots; adjacency is a slot
//! vector per node so the walk hot path iterates neighbors without hashing.
//! An edge-set keyed on the normalized slot pair makes `has_edge` O(1) and
//! repeated insertions no-ops.

use fxhash::{FxHashMap, FxHashSet};
use pixie_common::core::model::Post;
use pixie_common::{Id, NodeKind, PixieError, Result};

#[derive(Debug)]
struct NodeRecord {
    id: Id,
    /// Tag name, when known. Posts carry no label.
    label: Option<String>,
    neighbors: Vec<u32>,
}

/// Undirected bipartite graph over [`Id`] vertices.
///
/// Edges are unweighted and additive-only; every edge crosses the kind
/// partition. Vertices are created lazily on first [`add_edge`].
///
/// [`add_edge`]: BipartiteGraph::add_edge
#[derive(Debug, Default)]
pub struct BipartiteGraph {
    nodes: Vec<NodeRecord>,
    slots: FxHashMap<Id, u32>,
    /// Normalized (min, max) slot pairs.
    edges: FxHashSet<(u32, u32)>,
    max_degrees: FxHashMap<NodeKind, usize>,
}

impl BipartiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(vertices),
            slots: FxHashMap::with_capacity_and_hasher(vertices, Default::default()),
            edges: FxHashSet::with_capacity_and_hasher(edges, Default::default()),
            max_degrees: FxHashMap::default(),
        }
    }

    fn intern(&mut self, id: Id) -> u32 {
        if let Some(&slot) = self.slots.get(&id) {
            return slot;
        }
        let slot = self.nodes.len() as u32;
        self.nodes.push(NodeRecord {
            id,
            label: None,
            neighbors: Vec::new(),
        });
        self.slots.insert(id, slot);
        slot
    }

    /// Adds a vertex with no edges. Returns true if the vertex was newly
    /// created. [`add_edge`] creates its endpoints on its own; this is only
    /// needed to materialize isolated vertices.
    ///
    /// [`add_edge`]: BipartiteGraph::add_edge
    pub fn insert_vertex(&mut self, v: Id) -> bool {
        let before = self.nodes.len();
        self.intern(v);
        self.nodes.len() > before
    }

    /// Inserts the symmetric edge `(p, q)`, creating missing vertices.
    ///
    /// Idempotent on repeated calls. Updates the per-kind max degree from
    /// the degree of the endpoint of that kind.
    ///
    /// # Errors
    ///
    /// `InvalidGraph` when `p` and `q` share a kind; edges must cross the
    /// partition, which also rules out self-loops.
    pub fn add_edge(&mut self, p: Id, q: Id) -> Result<()> {
        if p.kind() == q.kind() {
            return Err(PixieError::invalid_graph(format!(
                "edge ({p}, {q}) does not cross the partition"
            )));
        }
        let ps = self.intern(p);
        let qs = self.intern(q);
        let key = (ps.min(qs), ps.max(qs));
        if !self.edges.insert(key) {
            return Ok(());
        }
        self.nodes[ps as usize].neighbors.push(qs);
        self.nodes[qs as usize].neighbors.push(ps);
        for (slot, kind) in [(ps, p.kind()), (qs, q.kind())] {
            let degree = self.nodes[slot as usize].neighbors.len();
            let max = self.max_degrees.entry(kind).or_insert(0);
            if degree > *max {
                *max = degree;
            }
        }
        Ok(())
    }

    /// Adds one edge per tag and records the tag labels. Returns the post's
    /// new degree.
    pub fn tag_post(&mut self, post: &Post) -> Result<usize> {
        let post_id = post.node_id();
        for tag in &post.tags {
            let tag_id = tag.node_id();
            self.add_edge(post_id, tag_id)?;
            self.label_vertex(tag_id, &tag.name);
        }
        Ok(self.degree(post_id))
    }

    /// Records a label for an existing vertex. The first label wins;
    /// relabeling attempts and unknown vertices are ignored.
    pub fn label_vertex(&mut self, v: Id, label: &str) {
        if let Some(&slot) = self.slots.get(&v) {
            let record = &mut self.nodes[slot as usize];
            if record.label.is_none() && !label.is_empty() {
                record.label = Some(label.to_string());
            }
        }
    }

    /// Borrowed iteration over the neighbors of `v`; empty when `v` is not
    /// in the graph.
    pub fn neighbors(&self, v: Id) -> Neighbors<'_> {
        let slots = self
            .slots
            .get(&v)
            .map(|&slot| self.nodes[slot as usize].neighbors.as_slice())
            .unwrap_or(&[]);
        Neighbors {
            graph: self,
            slots: slots.iter(),
        }
    }

    pub fn degree(&self, v: Id) -> usize {
        self.slots
            .get(&v)
            .map(|&slot| self.nodes[slot as usize].neighbors.len())
            .unwrap_or(0)
    }

    /// Largest degree among vertices of kind `k`; 0 when no such vertex has
    /// edges. Non-decreasing under insertion.
    pub fn max_degree(&self, k: NodeKind) -> usize {
        self.max_degrees.get(&k).copied().unwrap_or(0)
    }

    pub fn has_edge(&self, u: Id, v: Id) -> bool {
        match (self.slots.get(&u), self.slots.get(&v)) {
            (Some(&us), Some(&vs)) => self.edges.contains(&(us.min(vs), us.max(vs))),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, v: Id) -> bool {
        self.slots.contains_key(&v)
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Tag label recorded for `v`, if any.
    pub fn tag_name(&self, v: Id) -> Option<&str> {
        let &slot = self.slots.get(&v)?;
        self.nodes[slot as usize].label.as_deref()
    }

    // Slot-level accessors for the walk hot path.

    #[inline]
    pub fn slot_of(&self, v: Id) -> Option<u32> {
        self.slots.get(&v).copied()
    }

    #[inline]
    pub fn id_at(&self, slot: u32) -> Id {
        self.nodes[slot as usize].id
    }

    #[inline]
    pub fn neighbor_slots(&self, slot: u32) -> &[u32] {
        &self.nodes[slot as usize].neighbors
    }

    #[inline]
    pub fn degree_at(&self, slot: u32) -> usize {
        self.nodes[slot as usize].neighbors.len()
    }
}

/// Borrowed neighbor iterator returned by [`BipartiteGraph::neighbors`].
pub struct Neighbors<'g> {
    graph: &'g BipartiteGraph,
    slots: std::slice::Iter<'g, u32>,
}

impl Iterator for Neighbors<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        self.slots.next().map(|&slot| self.graph.id_at(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}
