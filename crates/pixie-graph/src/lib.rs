// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Bipartite tag-graph storage.
//!
//! [`BipartiteGraph`] is the sealed, read-only adjacency store the walk
//! engine samples from. [`GraphWriter`] wraps it in a reader-writer lock for
//! the ingestion phase; sealing the writer hands back the plain graph, which
//! is then shared freely across query threads.

pub mod bipartite;
pub mod writer;

pub use bipartite::{BipartiteGraph, Neighbors};
pub use writer::GraphWriter;
