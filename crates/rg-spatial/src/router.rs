//! Leg routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Both the gateway router and the route composer call leg searches through
//! the [`Router`] trait, so applications can swap in a different engine
//! (A*, contraction hierarchies) without touching the region logic.
//! [`crate::GatewayRouter`] itself implements `Router`, which is how the
//! composer drives it.
//!
//! # Cost units
//!
//! Costs are whatever the chosen [`Weight`] attribute holds: metres for
//! `Length`, minutes for `TravelTime`.  An edge missing the attribute costs
//! [`crate::network::MISSING_COST`].

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rg_core::{EdgeId, NodeId, Weight};

use crate::cancel::CancelToken;
use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

/// Heap pops between cancellation checks.
const CANCEL_POLL_INTERVAL: usize = 256;

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a path query: the node sequence from source to destination
/// (both inclusive) and its total cost under the requested weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
}

impl Path {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() < 2
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable point-to-point search.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one prepared network can serve
/// route requests from several threads.
pub trait Router: Send + Sync {
    /// Compute the cheapest path from `from` to `to` under `weight`.
    ///
    /// `from == to` yields a single-node path with cost 0.  Returns
    /// [`SpatialError::NoRoute`] if `to` is unreachable and
    /// [`SpatialError::NodeNotFound`] if either node is not in `network`.
    fn find_path(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        weight:  Weight,
        cancel:  &CancelToken,
    ) -> SpatialResult<Path>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the full CSR graph.
///
/// Parallel edges are relaxed independently, so the cheapest duplicate is
/// always the one used.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn find_path(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        weight:  Weight,
        cancel:  &CancelToken,
    ) -> SpatialResult<Path> {
        dijkstra(network, from, to, weight, cancel)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Total-ordered `f64` for the heap key.  Costs are never NaN in practice;
/// `total_cmp` keeps the ordering well-defined if one ever is.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(
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
    cancel.check()?;

    if from == to {
        return Ok(Path { nodes: vec![from], cost: 0.0 });
    }

    let n = network.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, node). Secondary key NodeId ensures deterministic
    // tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    let mut pops = 0usize;
    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        pops += 1;
        if pops % CANCEL_POLL_INTERVAL == 0 {
            cancel.check()?;
        }

        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + network.edge_cost(edge, weight);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network:   &RoadNetwork,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    cost:      f64,
) -> Path {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = network.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Path { nodes, cost }
}
