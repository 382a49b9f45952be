//! End-to-end route planning over one owned, prepared network.
//!
//! # Lifecycle
//!
//! ```text
//! RoutePlanner::new(network, config)
//!   └─ prepare(speed_model)        once: synthesize weights, then partition
//!        └─ route(request, sink)   any number of times, &self only
//! ```
//!
//! `prepare` takes `&mut self`, so the one-shot mutation phases can never
//! overlap each other or a running search.  After that the network is
//! read-only and `route` can be called concurrently from several threads
//! (`RoutePlanner: Sync`).

use log::{error, info};

use rg_core::{GeoPoint, NodeId, RoutingConfig};

use crate::cancel::CancelToken;
use crate::composer::{ComposedRoute, RouteComposer};
use crate::gateway::GatewayRouter;
use crate::network::RoadNetwork;
use crate::partition::{Partition, RegionPartitioner};
use crate::router::DijkstraRouter;
use crate::sink::{RouteRecord, RouteSink};
use crate::weights::{SpeedModel, synthesize_weights};
use crate::{SpatialError, SpatialResult};

// ── RouteRequest ──────────────────────────────────────────────────────────────

/// One route request: the waypoint nodes in visiting order plus the labels
/// recorded in route history.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub waypoints:   Vec<NodeId>,
    pub start_label: String,
    pub end_label:   String,
    pub cancel:      CancelToken,
}

impl RouteRequest {
    /// `waypoints` = origin, intermediate stops in entry order, destination.
    pub fn new(waypoints: Vec<NodeId>) -> Self {
        let start_label = waypoints.first().map(ToString::to_string).unwrap_or_default();
        let end_label   = waypoints.last().map(ToString::to_string).unwrap_or_default();
        Self { waypoints, start_label, end_label, cancel: CancelToken::new() }
    }

    pub fn labels(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_label = start.into();
        self.end_label = end.into();
        self
    }

    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RoutePlanner {
    network:   RoadNetwork,
    config:    RoutingConfig,
    partition: Option<Partition>,
    composer:  RouteComposer<GatewayRouter<DijkstraRouter>>,
}

impl RoutePlanner {
    /// Take ownership of `network`.
    ///
    /// # Errors
    ///
    /// [`SpatialError::Config`] if `config` fails validation.
    pub fn new(network: RoadNetwork, config: RoutingConfig) -> SpatialResult<Self> {
        config.validate()?;
        let router = GatewayRouter::new(DijkstraRouter).policy(config.parallel_edges);
        let composer = RouteComposer::new(router)
            .weight(config.weight)
            .policy(config.parallel_edges);
        Ok(Self { network, config, partition: None, composer })
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// The partition computed by the last successful [`prepare`](Self::prepare).
    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    pub fn is_prepared(&self) -> bool {
        self.partition.is_some()
    }

    /// Synthesize edge weights for the configured mode, then partition the
    /// network into `config.cluster_count` regions.
    ///
    /// Calling it again re-synthesizes and re-partitions from scratch.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidSpeed`] from synthesis, or
    /// [`SpatialError::Config`] if the cluster count exceeds the node count.
    /// On error the planner is left unprepared.
    pub fn prepare<M>(&mut self, model: &mut M) -> SpatialResult<&Partition>
    where
        M: SpeedModel + ?Sized,
    {
        self.partition = None;
        synthesize_weights(&mut self.network, self.config.mode, model)?;
        let partition = RegionPartitioner::new(self.config.cluster_count)
            .seed(self.config.seed)
            .partition(&mut self.network)?;
        info!(
            "prepared network: {} nodes, {} edges, {} regions",
            self.network.node_count(),
            self.network.edge_count(),
            partition.k
        );
        Ok(self.partition.insert(partition))
    }

    /// Nearest network node for each point, in order.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidWaypoint`] if the network has no nodes.
    pub fn snap(&self, points: &[GeoPoint]) -> SpatialResult<Vec<NodeId>> {
        points
            .iter()
            .map(|&p| {
                self.network.snap_to_node(p).ok_or_else(|| {
                    SpatialError::InvalidWaypoint(format!("cannot snap {p}: network is empty"))
                })
            })
            .collect()
    }

    /// Compose a route through `request.waypoints` and record it in `sink`.
    ///
    /// The sink is called exactly once on success and never on failure.  A
    /// sink error is logged and does not fail the route.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NotPrepared`] before [`prepare`](Self::prepare) has
    /// succeeded; otherwise whatever [`RouteComposer::compose`] returns.
    pub fn route<S>(&self, request: &RouteRequest, sink: &mut S) -> SpatialResult<ComposedRoute>
    where
        S: RouteSink + ?Sized,
    {
        if self.partition.is_none() {
            return Err(SpatialError::NotPrepared);
        }

        info!(
            "routing {} → {} via {} stops ({} / {})",
            request.start_label,
            request.end_label,
            request.waypoints.len().saturating_sub(2),
            self.config.mode,
            self.config.weight
        );

        let route = self.composer.compose(&self.network, &request.waypoints, &request.cancel)?;

        info!(
            "route found: {} nodes, {:.2} km, {:.1} min",
            route.nodes.len(),
            route.total_distance_km,
            route.total_time_min
        );

        let record = RouteRecord::from_route(
            &route,
            &request.start_label,
            &request.end_label,
            self.config.mode,
        );
        if let Err(e) = sink.record(&record) {
            error!("failed to record route history: {e}");
        }

        Ok(route)
    }

    /// Give the network back, e.g. to re-prepare it under a different mode.
    pub fn into_network(self) -> RoadNetwork {
        self.network
    }
}
