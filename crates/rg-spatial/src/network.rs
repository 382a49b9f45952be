//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph is a directed multigraph in **Compressed Sparse Row (CSR)**
//! format.  Given a `NodeId n`, its outgoing edges occupy the EdgeId range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`.  The
//! sort is stable, so parallel edges between the same ordered pair keep the
//! order in which they were added; [`ParallelEdgePolicy::First`] relies on
//! this.
//!
//! A second, reverse CSR (`node_in_start` / `in_edge_ids`) lists incoming
//! edges per node.  Gateway detection needs it: a node counts as adjacent to
//! a region through edges in either direction.
//!
//! # Edge attributes
//!
//! Length is optional (`None` = missing in the source data).  Speed and
//! travel time stay `None` until [`crate::weights::synthesize_weights`] runs.
//! Cost lookups ([`RoadNetwork::edge_cost`], [`RoadNetwork::step_cost`])
//! substitute 1.0 for anything missing and never fail.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to snap geocoded coordinates to road nodes before routing.

use log::warn;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rg_core::{EdgeId, GeoPoint, NodeId, ParallelEdgePolicy, RegionId, Weight};

/// Cost substituted when an edge or one of its attributes is missing.
pub const MISSING_COST: f64 = 1.0;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format plus a spatial index for node
/// snapping.
///
/// Fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Region label of each node.  `RegionId::INVALID` until partitioned.
    pub node_region: Vec<RegionId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Reverse CSR row pointer into `in_edge_ids`.  Length = `node_count + 1`.
    pub node_in_start: Vec<u32>,

    /// Incoming EdgeIds grouped by target node, ascending within a group.
    pub in_edge_ids: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Physical length in metres; `None` when the source had no length.
    pub edge_length_m: Vec<Option<f64>>,

    /// Synthesised speed in km/h.
    pub edge_speed_kph: Vec<Option<f64>>,

    /// Synthesised travel time in minutes.
    pub edge_travel_min: Vec<Option<f64>>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// All node IDs in ascending order.  This is the canonical node
    /// iteration order used by gateway enumeration.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_pos.len()).map(|i| NodeId(i as u32))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range, no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Iterator over the `EdgeId`s of all incoming edges to `node`.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_in_start[node.index()] as usize;
        let end   = self.node_in_start[node.index() + 1] as usize;
        self.in_edge_ids[start..end].iter().copied()
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Nodes adjacent to `node` through an edge in either direction:
    /// successors first, then predecessors.  May repeat a node.
    pub fn adjacent_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let succ = self.out_edges(node).map(|e| self.edge_to[e.index()]);
        let pred = self.in_edges(node).map(|e| self.edge_from[e.index()]);
        succ.chain(pred)
    }

    // ── Regions ───────────────────────────────────────────────────────────

    #[inline]
    pub fn region(&self, node: NodeId) -> RegionId {
        self.node_region[node.index()]
    }

    /// `true` once every node carries a valid region label.
    pub fn is_partitioned(&self) -> bool {
        !self.is_empty() && self.node_region.iter().all(|r| r.is_valid())
    }

    // ── Edge attributes ───────────────────────────────────────────────────

    /// Raw attribute value for `weight`, `None` if missing.
    #[inline]
    pub fn edge_weight(&self, edge: EdgeId, weight: Weight) -> Option<f64> {
        match weight {
            Weight::Length     => self.edge_length_m[edge.index()],
            Weight::TravelTime => self.edge_travel_min[edge.index()],
        }
    }

    /// Search cost of `edge` under `weight`; [`MISSING_COST`] if missing.
    #[inline]
    pub fn edge_cost(&self, edge: EdgeId, weight: Weight) -> f64 {
        self.edge_weight(edge, weight).unwrap_or(MISSING_COST)
    }

    /// All parallel edges `from → to`, in insertion order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from)
            .filter(move |e| self.edge_to[e.index()] == to)
    }

    /// Pick the single edge `from → to` according to `policy`.
    ///
    /// Returns `None` if there is no such edge (or either node is unknown).
    pub fn select_edge(
        &self,
        from:   NodeId,
        to:     NodeId,
        weight: Weight,
        policy: ParallelEdgePolicy,
    ) -> Option<EdgeId> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        let mut edges = self.edges_between(from, to);
        match policy {
            ParallelEdgePolicy::First => edges.next(),
            ParallelEdgePolicy::MinWeight => edges.fold(None, |best: Option<EdgeId>, e| match best {
                Some(b) if self.edge_cost(b, weight) <= self.edge_cost(e, weight) => Some(b),
                _ => Some(e),
            }),
        }
    }

    /// Cost of stepping `from → to`.  Never fails: a missing edge or a
    /// missing attribute costs [`MISSING_COST`].
    pub fn step_cost(
        &self,
        from:   NodeId,
        to:     NodeId,
        weight: Weight,
        policy: ParallelEdgePolicy,
    ) -> f64 {
        self.select_edge(from, to, weight, policy)
            .map_or(MISSING_COST, |e| self.edge_cost(e, weight))
    }

    /// Sum of [`step_cost`](Self::step_cost) over consecutive node pairs.
    pub fn path_cost(&self, nodes: &[NodeId], weight: Weight, policy: ParallelEdgePolicy) -> f64 {
        nodes
            .windows(2)
            .map(|w| self.step_cost(w[0], w[1], weight, policy))
            .sum()
    }

    /// `true` once every edge carries a synthesised speed and travel time.
    pub fn has_synthesized_weights(&self) -> bool {
        self.edge_speed_kph.iter().all(Option::is_some)
            && self.edge_travel_min.iter().all(Option::is_some)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("partitioned", &self.is_partitioned())
            .finish()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// stably sorts edges by source node, constructs the forward and reverse
/// CSR arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use rg_core::GeoPoint;
/// use rg_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(45.03, 38.97));
/// let c = b.add_node(GeoPoint::new(45.04, 38.98));
/// b.add_road(a, c, 1_200.0);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: Option<f64>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to` with a length in metres.
    ///
    /// Parallel edges are kept; each call adds a new edge.  A negative or
    /// non-finite length is stored as missing, so search costs stay
    /// non-negative.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        let length = (length_m.is_finite() && length_m >= 0.0).then_some(length_m);
        if length.is_none() {
            warn!("edge {from} → {to} has invalid length {length_m}; treating it as missing");
        }
        self.push_edge(from, to, length);
    }

    /// Add a directed edge whose length is unknown.  Weight synthesis treats
    /// it as 1 m; length-weighted searches cost it at 1.
    pub fn add_unmeasured_edge(&mut self, from: NodeId, to: NodeId) {
        self.push_edge(from, to, None);
    }

    /// Convenience: add edges in **both directions** for a two-way road.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    fn push_edge(&mut self, from: NodeId, to: NodeId, length_m: Option<f64>) {
        debug_assert!(from.index() < self.nodes.len(), "edge source {from} was never added");
        debug_assert!(to.index() < self.nodes.len(), "edge target {to} was never added");
        self.raw_edges.push(RawEdge { from, to, length_m });
    }

    /// Look up the position of a node added earlier (used by graph providers
    /// to derive edge lengths from coordinates).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable: parallel edges keep insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId>      = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId>      = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<Option<f64>> = raw.iter().map(|e| e.length_m).collect();

        // Forward CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Reverse CSR: counting sort of EdgeIds by target.
        let mut node_in_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_in_start[e.to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_in_start[i] += node_in_start[i - 1];
        }
        let mut cursor: Vec<u32> = node_in_start[..node_count].to_vec();
        let mut in_edge_ids = vec![EdgeId::INVALID; edge_count];
        for (i, e) in raw.iter().enumerate() {
            let slot = &mut cursor[e.to.index()];
            in_edge_ids[*slot as usize] = EdgeId(i as u32);
            *slot += 1;
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_region: vec![RegionId::INVALID; node_count],
            node_pos: self.nodes,
            node_out_start,
            node_in_start,
            in_edge_ids,
            edge_from,
            edge_to,
            edge_length_m,
            edge_speed_kph: vec![None; edge_count],
            edge_travel_min: vec![None; edge_count],
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
