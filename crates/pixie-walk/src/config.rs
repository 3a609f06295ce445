// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Per-query walk parameters.

use fxhash::FxHashMap;
use pixie_common::{Id, NodeKind, PixieError, Result};

/// Node-importance signal used to bias neighbor sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Importance {
    /// `deg(u) / max_deg(u.kind)` — O(1) per sample, no precomputation.
    #[default]
    DegreeNormalized,
    /// Betweenness centrality normalized by the maximum score, computed once
    /// per query over the whole graph.
    Betweenness,
}

/// Immutable parameters for one recommendation query.
#[derive(Clone, Debug)]
pub struct WalkConfig {
    /// Anchor vertex -> weight. Must be non-empty with at least one strictly
    /// positive weight.
    pub ratings: FxHashMap<Id, f64>,
    /// Kinds accepted in the result; empty accepts all kinds.
    pub return_kinds: Vec<NodeKind>,
    /// Overall walk budget N.
    pub max_visits_total: u64,
    /// Per-anchor cap Nq.
    pub max_visits_per_walk: u64,
    /// Fixed RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
    pub importance: Importance,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            ratings: FxHashMap::default(),
            return_kinds: Vec::new(),
            max_visits_total: 10_000,
            max_visits_per_walk: 1_000,
            seed: None,
            importance: Importance::default(),
        }
    }
}

impl WalkConfig {
    pub fn new(ratings: FxHashMap<Id, f64>) -> Self {
        Self {
            ratings,
            ..Self::default()
        }
    }

    pub fn return_kinds(mut self, kinds: &[NodeKind]) -> Self {
        self.return_kinds = kinds.to_vec();
        self
    }

    pub fn budgets(mut self, max_visits_total: u64, max_visits_per_walk: u64) -> Self {
        self.max_visits_total = max_visits_total;
        self.max_visits_per_walk = max_visits_per_walk;
        self
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    /// Checks the query invariants.
    ///
    /// A zero total budget is valid and simply yields an empty result.
    pub fn validate(&self) -> Result<()> {
        if self.ratings.is_empty() {
            return Err(PixieError::empty_query("no anchor ratings"));
        }
        for (anchor, &rating) in &self.ratings {
            if !rating.is_finite() || rating < 0.0 {
                return Err(PixieError::invalid_argument(
                    "ratings",
                    format!("anchor {anchor} has rating {rating}, expected a finite value >= 0"),
                ));
            }
        }
        if !self.ratings.values().any(|&r| r > 0.0) {
            return Err(PixieError::empty_query("all anchor ratings are zero"));
        }
        if self.max_visits_per_walk > self.max_visits_total {
            return Err(PixieError::invalid_argument(
                "max_visits_per_walk",
                format!(
                    "per-walk cap {} exceeds total budget {}",
                    self.max_visits_per_walk, self.max_visits_total
                ),
            ));
        }
        Ok(())
    }

    /// Whether `kind` passes the return filter.
    #[inline]
    pub(crate) fn accepts(&self, kind: NodeKind) -> bool {
        self.return_kinds.is_empty() || self.return_kinds.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_rating(rating: f64) -> FxHashMap<Id, f64> {
        let mut ratings = FxHashMap::default();
        ratings.insert(Id::post(1), rating);
        ratings
    }

    #[test]
    fn test_valid_config() {
        let config = WalkConfig::new(one_rating(1.0)).budgets(1000, 100).seeded(42);
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_empty_ratings_rejected() {
        let config = WalkConfig::default();
        assert!(matches!(
            config.validate(),
            Err(PixieError::EmptyQuery { .. })
        ));
    }

    #[test]
    fn test_all_zero_ratings_rejected() {
        let config = WalkConfig::new(one_rating(0.0));
        assert!(matches!(
            config.validate(),
            Err(PixieError::EmptyQuery { .. })
        ));
    }

    #[test]
    fn test_negative_rating_rejected() {
        let config = WalkConfig::new(one_rating(-0.5));
        assert!(matches!(
            config.validate(),
            Err(PixieError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_per_walk_cap_above_total_rejected() {
        let config = WalkConfig::new(one_rating(1.0)).budgets(10, 100);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_total_budget_is_valid() {
        let config = WalkConfig::new(one_rating(1.0)).budgets(0, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_return_filter() {
        let config = WalkConfig::new(one_rating(1.0));
        assert!(config.accepts(NodeKind::Post));
        assert!(config.accepts(NodeKind::Tag));

        let config = config.return_kinds(&[NodeKind::Tag]);
        assert!(config.accepts(NodeKind::Tag));
        assert!(!config.accepts(NodeKind::Post));
    }
}
