//! Routing configuration.
//!
//! Typically loaded from a JSON file by the application crate and handed to
//! `rg_spatial::RoutePlanner`.  Every field has a default, so a config file
//! only needs to name what it changes (with the `serde` feature, missing
//! fields fall back to [`RoutingConfig::default`]).

use crate::{CoreError, CoreResult, TravelMode, Weight};

/// Default number of spatial regions.
pub const DEFAULT_CLUSTER_COUNT: usize = 10;

/// Default clustering seed.  Fixed so region labels are reproducible.
pub const DEFAULT_SEED: u64 = 42;

// ── ParallelEdgePolicy ────────────────────────────────────────────────────────

/// How to pick a single edge when a node pair has parallel edges.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParallelEdgePolicy {
    /// The first edge added for the pair.
    First,
    /// The edge with the lowest cost under the requested weight; ties go to
    /// the earliest edge.
    #[default]
    MinWeight,
}

// ── RoutingConfig ─────────────────────────────────────────────────────────────

/// Top-level routing configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Number of spatial regions the network is partitioned into.
    /// Must be ≥ 1 and ≤ the node count of the network being partitioned.
    pub cluster_count: usize,

    /// Master seed for clustering and random speed synthesis.  The same seed
    /// always produces identical region labels.
    pub seed: u64,

    /// Network type; controls speed synthesis.
    pub mode: TravelMode,

    /// Optimisation criterion for every leg search.
    pub weight: Weight,

    /// Edge selection rule for parallel edges.
    pub parallel_edges: ParallelEdgePolicy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cluster_count:  DEFAULT_CLUSTER_COUNT,
            seed:           DEFAULT_SEED,
            mode:           TravelMode::Drive,
            weight:         Weight::Length,
            parallel_edges: ParallelEdgePolicy::MinWeight,
        }
    }
}

impl RoutingConfig {
    /// Check the settings that can be validated without a network.
    ///
    /// The `cluster_count ≤ node_count` bound is checked by the partitioner,
    /// which is the first place the node count is known.
    pub fn validate(&self) -> CoreResult<()> {
        if self.cluster_count == 0 {
            return Err(CoreError::Config("cluster_count must be at least 1".into()));
        }
        Ok(())
    }
}
