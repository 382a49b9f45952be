//! Multi-waypoint route composition.
//!
//! Routes each consecutive waypoint pair with a [`Router`] (normally the
//! [`GatewayRouter`](crate::GatewayRouter)) and concatenates the segments
//! into one node sequence.  The junction node shared by segment *i* and
//! *i+1* appears once.
//!
//! Aggregate distance and time are computed over the final concatenated
//! route, one edge lookup per consecutive node pair, so junctions are never
//! double counted.  A missing length or travel time contributes 0 to the
//! aggregates (unlike search costs, where a missing attribute costs 1).

use rg_core::{EdgeId, NodeId, ParallelEdgePolicy, Weight};

use crate::cancel::CancelToken;
use crate::network::RoadNetwork;
use crate::router::Router;
use crate::{SpatialError, SpatialResult};

// ── SpeedTier ─────────────────────────────────────────────────────────────────

/// Speed band used by renderers to colour route segments.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpeedTier {
    /// ≥ 40 km/h.
    Fast,
    /// ≥ 20 km/h.
    Medium,
    /// Below 20 km/h, or no speed known.
    Slow,
}

impl SpeedTier {
    pub const FAST_MIN_KPH: f64 = 40.0;
    pub const MEDIUM_MIN_KPH: f64 = 20.0;

    pub fn from_speed(speed_kph: Option<f64>) -> Self {
        match speed_kph {
            Some(s) if s >= Self::FAST_MIN_KPH => SpeedTier::Fast,
            Some(s) if s >= Self::MEDIUM_MIN_KPH => SpeedTier::Medium,
            _ => SpeedTier::Slow,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeedTier::Fast   => "fast",
            SpeedTier::Medium => "medium",
            SpeedTier::Slow   => "slow",
        }
    }
}

// ── ComposedRoute ─────────────────────────────────────────────────────────────

/// One traversed edge of a composed route, with the attributes a renderer
/// needs.  `edge` is `None` only if the router produced a step with no
/// backing edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteEdge {
    pub from:       NodeId,
    pub to:         NodeId,
    pub edge:       Option<EdgeId>,
    pub length_m:   Option<f64>,
    pub speed_kph:  Option<f64>,
    pub travel_min: Option<f64>,
}

impl RouteEdge {
    pub fn tier(&self) -> SpeedTier {
        SpeedTier::from_speed(self.speed_kph)
    }
}

/// A complete route over all waypoints.  Holds no reference to the graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComposedRoute {
    /// Node sequence from the first to the last waypoint.
    pub nodes: Vec<NodeId>,
    /// One entry per consecutive pair in `nodes`.
    pub edges: Vec<RouteEdge>,
    /// Position of each waypoint in `nodes`, in waypoint order.
    pub waypoint_positions: Vec<usize>,
    pub total_distance_km: f64,
    pub total_time_min: f64,
    /// The criterion every segment was optimised for.
    pub weight: Weight,
}

impl ComposedRoute {
    pub fn segment_count(&self) -> usize {
        self.waypoint_positions.len().saturating_sub(1)
    }
}

// ── RouteComposer ─────────────────────────────────────────────────────────────

/// Drives a [`Router`] over an ordered waypoint list.
#[derive(Debug, Clone)]
pub struct RouteComposer<R: Router> {
    router: R,
    weight: Weight,
    policy: ParallelEdgePolicy,
}

impl<R: Router> RouteComposer<R> {
    pub fn new(router: R) -> Self {
        Self {
            router,
            weight: Weight::default(),
            policy: ParallelEdgePolicy::default(),
        }
    }

    pub fn weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    /// Policy used when attributing route steps to parallel edges.
    pub fn policy(mut self, policy: ParallelEdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Route through `waypoints` in order.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::InvalidWaypoint`] for fewer than two waypoints or a
    ///   waypoint not in `network` (checked before any search runs).
    /// - [`SpatialError::NoRoute`] as soon as one segment has no path, or
    ///   yields fewer than two nodes (e.g. two identical consecutive
    ///   waypoints).
    /// - [`SpatialError::Cancelled`] if `cancel` fires.
    pub fn compose(
        &self,
        network:   &RoadNetwork,
        waypoints: &[NodeId],
        cancel:    &CancelToken,
    ) -> SpatialResult<ComposedRoute> {
        if waypoints.len() < 2 {
            return Err(SpatialError::InvalidWaypoint(format!(
                "need at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }
        if let Some(&missing) = waypoints.iter().find(|w| !network.contains(**w)) {
            return Err(SpatialError::InvalidWaypoint(format!(
                "{missing} is not in the network"
            )));
        }

        let mut nodes: Vec<NodeId> = Vec::new();
        let mut waypoint_positions = vec![0];

        for pair in waypoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let segment = self.router.find_path(network, a, b, self.weight, cancel)?;
            if segment.nodes.len() < 2 {
                return Err(SpatialError::NoRoute { from: a, to: b });
            }

            let skip = if nodes.is_empty() { 0 } else { 1 };
            nodes.extend_from_slice(&segment.nodes[skip..]);
            waypoint_positions.push(nodes.len() - 1);
        }

        let edges: Vec<RouteEdge> = nodes
            .windows(2)
            .map(|w| self.describe_step(network, w[0], w[1]))
            .collect();

        let total_distance_km = edges.iter().map(|e| e.length_m.unwrap_or(0.0)).sum::<f64>() / 1000.0;
        let total_time_min    = edges.iter().map(|e| e.travel_min.unwrap_or(0.0)).sum::<f64>();

        Ok(ComposedRoute {
            nodes,
            edges,
            waypoint_positions,
            total_distance_km,
            total_time_min,
            weight: self.weight,
        })
    }

    fn describe_step(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> RouteEdge {
        let edge = network.select_edge(from, to, self.weight, self.policy);
        RouteEdge {
            from,
            to,
            edge,
            length_m:   edge.and_then(|e| network.edge_length_m[e.index()]),
            speed_kph:  edge.and_then(|e| network.edge_speed_kph[e.index()]),
            travel_min: edge.and_then(|e| network.edge_travel_min[e.index()]),
        }
    }
}
