// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Personalized random-walk recommendation engine.
//!
//! Queries supply anchor vertices with real-valued weights; the engine runs
//! many short biased walks over a sealed [`pixie_graph::BipartiteGraph`] and
//! aggregates per-candidate visit counts into relevance scores.
//!
//! # Example
//!
//! ```ignore
//! use pixie_walk::{recommend, WalkConfig};
//!
//! let mut ratings = fxhash::FxHashMap::default();
//! ratings.insert(Id::post(42), 1.0);
//! let config = WalkConfig::new(ratings)
//!     .return_kinds(&[NodeKind::Post])
//!     .budgets(10_000, 1_000)
//!     .seeded(42);
//! let scores = recommend(&graph, &config)?;
//! ```

pub mod cancel;
pub mod centrality;
pub mod config;
pub mod engine;

mod sampler;
mod scaling;

pub use cancel::CancelToken;
pub use centrality::betweenness;
pub use config::{Importance, WalkConfig};
pub use engine::{Recommendations, recommend, recommend_async};
