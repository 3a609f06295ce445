// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Graph ingestion.
//!
//! Post records arrive as JSON lines from whatever transport the caller
//! wires up; [`load_posts`] fans them out over a worker pool that feeds a
//! [`pixie_graph::GraphWriter`]. MovieLens-style CSV decoding for the
//! evaluation datasets lives in [`movielens`].

pub mod loader;
pub mod movielens;
pub mod source;

pub use loader::{LoadStats, LoaderConfig, load_posts};
pub use source::{JsonPostReader, PostSource};
