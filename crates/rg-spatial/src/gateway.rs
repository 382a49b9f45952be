//! Region-bounded path search through origin-region gateways.
//!
//! # Algorithm
//!
//! ```text
//! region(from) == region(to)   → one unrestricted leg search, returned verbatim
//! otherwise:
//!   gateways = nodes outside region(from) adjacent to a node inside it
//!   for g in gateways (ascending NodeId):
//!       a = leg(from → g)          skip g if unreachable
//!       b = leg(g → to)            skip g if unreachable
//!       path = a ++ b[1..]
//!       keep path if cost(path) < best   (first minimum wins)
//! ```
//!
//! # Limitations
//!
//! This is a bounded heuristic, not an optimal cross-region search.  Only
//! the origin region's boundary is considered; exits of the destination
//! region are never explored, and gateways reachable only through a third
//! region are never candidates.  Changing either would change observable
//! route costs, so the asymmetry is kept.
//!
//! Adjacency counts edges in both directions: a node outside the origin
//! region with an edge *into* the region, or an edge *from* it, is a
//! gateway.
//!
//! On a network that has not been partitioned every node carries
//! `RegionId::INVALID`, so every pair takes the same-region branch.

use log::{debug, trace};

use rg_core::{NodeId, ParallelEdgePolicy, RegionId, Weight};

use crate::cancel::CancelToken;
use crate::network::RoadNetwork;
use crate::router::{DijkstraRouter, Path, Router};
use crate::{SpatialError, SpatialResult};

/// Nodes outside `region` that are adjacent to at least one node inside it,
/// in ascending `NodeId` order.  Computed fresh on every call.
pub fn gateways(network: &RoadNetwork, region: RegionId) -> Vec<NodeId> {
    network
        .nodes()
        .filter(|&v| network.region(v) != region)
        .filter(|&v| network.adjacent_nodes(v).any(|u| network.region(u) == region))
        .collect()
}

/// Path search that stitches cross-region routes through gateway nodes.
///
/// Leg searches are delegated to `R` (Dijkstra by default).  Candidate paths
/// are costed edge by edge, picking among parallel edges with the
/// configured [`ParallelEdgePolicy`].
#[derive(Debug, Clone, Default)]
pub struct GatewayRouter<R: Router = DijkstraRouter> {
    leg_router: R,
    policy:     ParallelEdgePolicy,
}

impl<R: Router> GatewayRouter<R> {
    pub fn new(leg_router: R) -> Self {
        Self { leg_router, policy: ParallelEdgePolicy::default() }
    }

    pub fn policy(mut self, policy: ParallelEdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one leg, mapping "unreachable" to `None` so the caller can skip
    /// the candidate.  Every other error (cancellation included) propagates.
    fn try_leg(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        weight:  Weight,
        cancel:  &CancelToken,
    ) -> SpatialResult<Option<Path>> {
        match self.leg_router.find_path(network, from, to, weight, cancel) {
            Ok(p) => Ok(Some(p)),
            Err(SpatialError::NoRoute { .. }) => {
                trace!("gateway leg {from} → {to} unreachable; skipping");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl<R: Router> Router for GatewayRouter<R> {
    fn find_path(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        weight:  Weight,
        cancel:  &CancelToken,
    ) -> SpatialResult<Path> {
        for node in [from, to] {
            if !network.contains(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }

        let origin_region = network.region(from);
        if origin_region == network.region(to) {
            return self.leg_router.find_path(network, from, to, weight, cancel);
        }

        let exits = gateways(network, origin_region);
        debug!(
            "{from} → {to}: crossing from {origin_region} to {}, {} gateway candidates",
            network.region(to),
            exits.len()
        );

        let mut best: Option<(NodeId, Path)> = None;
        for gateway in exits {
            cancel.check()?;

            let Some(leg_a) = self.try_leg(network, from, gateway, weight, cancel)? else {
                continue;
            };
            let Some(leg_b) = self.try_leg(network, gateway, to, weight, cancel)? else {
                continue;
            };

            let mut nodes = leg_a.nodes;
            nodes.pop();
            nodes.extend(leg_b.nodes);
            let cost = network.path_cost(&nodes, weight, self.policy);

            if best.as_ref().is_none_or(|(_, b)| cost < b.cost) {
                best = Some((gateway, Path { nodes, cost }));
            }
        }

        match best {
            Some((gateway, path)) => {
                debug!("{from} → {to}: chose gateway {gateway} at cost {:.3}", path.cost);
                Ok(path)
            }
            None => Err(SpatialError::NoRoute { from, to }),
        }
    }
}
