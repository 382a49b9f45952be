//! Region partitioning: k-means clustering of node coordinates.
//!
//! Nodes are clustered on raw `(lat, lon)` pairs with Lloyd's algorithm,
//! seeded by k-means++.  Each node is then labelled with its cluster as a
//! [`RegionId`] in `[0, k)`.
//!
//! # Known approximation
//!
//! Clusters follow geometric proximity, not graph topology.  A region can be
//! compact on the map yet disconnected in the graph (a river with no bridge
//! inside the region, say).  The gateway router copes with this because its
//! legs always search the full graph.
//!
//! # Determinism
//!
//! Identical coordinates, `k` and seed give identical labels.  Exact label
//! values depend on the seeding strategy and are not meant to match any
//! other clustering implementation; only membership consistency across runs
//! is guaranteed.

use log::debug;

use rg_core::{GeoPoint, RegionId, SeededRng};
use rg_core::config::{DEFAULT_CLUSTER_COUNT, DEFAULT_SEED};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

/// Summary of a completed partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Number of regions.
    pub k: usize,
    /// Final centroid of each region, indexed by `RegionId`.
    pub centroids: Vec<GeoPoint>,
    /// Node count per region.  Sizes are not balanced and may be zero when
    /// many nodes share coordinates.
    pub sizes: Vec<usize>,
    /// Lloyd iterations run before convergence (or the iteration cap).
    pub iterations: usize,
}

/// Configurable k-means partitioner.
///
/// ```rust,ignore
/// let partition = RegionPartitioner::new(10).seed(42).partition(&mut network)?;
/// ```
#[derive(Debug, Clone)]
pub struct RegionPartitioner {
    k:              usize,
    seed:           u64,
    max_iterations: usize,
    tolerance:      f64,
}

impl Default for RegionPartitioner {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_COUNT)
    }
}

impl RegionPartitioner {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed:           DEFAULT_SEED,
            max_iterations: 300,
            tolerance:      1e-4,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n.max(1);
        self
    }

    /// Convergence threshold, relative to the mean per-axis variance of the
    /// coordinates.  Iteration stops once the summed squared centroid shift
    /// drops to or below `tolerance * variance`.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Label every node of `network` with a region in `[0, k)`.
    ///
    /// Overwrites labels from any previous partition.
    ///
    /// # Errors
    ///
    /// [`SpatialError::Config`] if `k` is zero or exceeds the node count.
    pub fn partition(&self, network: &mut RoadNetwork) -> SpatialResult<Partition> {
        let n = network.node_count();
        let k = self.k;
        if k == 0 {
            return Err(SpatialError::Config("cluster count must be at least 1".into()));
        }
        if k > n {
            return Err(SpatialError::Config(format!(
                "cluster count {k} exceeds node count {n}"
            )));
        }

        let points = &network.node_pos;
        let mut rng = SeededRng::new(self.seed);
        let mut centroids = seed_centroids(points, k, &mut rng);
        let mut labels = vec![0usize; n];
        let threshold = self.tolerance * mean_variance(points);

        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            assign(points, &centroids, &mut labels);
            let next = update(points, &labels, &centroids);
            let shift: f64 = centroids
                .iter()
                .zip(&next)
                .map(|(a, b)| a.degree_distance_2(*b))
                .sum();
            centroids = next;
            if shift <= threshold {
                break;
            }
        }
        // Final assignment so labels agree with the returned centroids.
        assign(points, &centroids, &mut labels);

        let mut sizes = vec![0usize; k];
        for (node, &label) in labels.iter().enumerate() {
            sizes[label] += 1;
            network.node_region[node] = RegionId(label as u32);
        }

        debug!("partitioned {n} nodes into {k} regions in {iterations} iterations (sizes {sizes:?})");

        Ok(Partition { k, centroids, sizes, iterations })
    }
}

// ── k-means internals ─────────────────────────────────────────────────────────

/// k-means++ seeding: first centroid uniform, each further one drawn with
/// probability proportional to its squared distance to the nearest chosen
/// centroid.
fn seed_centroids(points: &[GeoPoint], k: usize, rng: &mut SeededRng) -> Vec<GeoPoint> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| p.degree_distance_2(centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let pick = if total > 0.0 {
            let target = rng.unit() * total;
            let mut acc = 0.0;
            nearest
                .iter()
                .position(|&d| {
                    acc += d;
                    acc > target
                })
                .unwrap_or(n - 1)
        } else {
            // Every point coincides with a chosen centroid.
            rng.gen_range(0..n)
        };

        let c = points[pick];
        centroids.push(c);
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(p.degree_distance_2(c));
        }
    }
    centroids
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest_centroid(p: GeoPoint, centroids: &[GeoPoint]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = p.degree_distance_2(*c);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

fn assign(points: &[GeoPoint], centroids: &[GeoPoint], labels: &mut [usize]) {
    for (label, p) in labels.iter_mut().zip(points) {
        *label = nearest_centroid(*p, centroids);
    }
}

/// Recompute centroids as member means.  A cluster left empty is re-seeded
/// with the point farthest from its current centroid, never reusing a point
/// already taken for another empty cluster.
fn update(points: &[GeoPoint], labels: &[usize], prev: &[GeoPoint]) -> Vec<GeoPoint> {
    let k = prev.len();
    let mut sums = vec![(0.0f64, 0.0f64); k];
    let mut counts = vec![0usize; k];
    for (p, &l) in points.iter().zip(labels) {
        sums[l].0 += p.lat;
        sums[l].1 += p.lon;
        counts[l] += 1;
    }

    let mut next: Vec<GeoPoint> = sums
        .iter()
        .zip(&counts)
        .zip(prev)
        .map(|((&(lat, lon), &c), &old)| {
            if c == 0 { old } else { GeoPoint::new(lat / c as f64, lon / c as f64) }
        })
        .collect();

    let mut taken = vec![false; points.len()];
    for j in (0..k).filter(|&j| counts[j] == 0) {
        let mut far = None;
        let mut far_d = -1.0;
        for (i, (p, &l)) in points.iter().zip(labels).enumerate() {
            if taken[i] {
                continue;
            }
            let d = p.degree_distance_2(prev[l]);
            if d > far_d {
                far = Some(i);
                far_d = d;
            }
        }
        if let Some(i) = far {
            taken[i] = true;
            next[j] = points[i];
        }
    }
    next
}

/// Mean of the per-axis variances of `points`.
fn mean_variance(points: &[GeoPoint]) -> f64 {
    let n = points.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let (mlat, mlon) = points
        .iter()
        .fold((0.0, 0.0), |(a, b), p| (a + p.lat, b + p.lon));
    let (mlat, mlon) = (mlat / n, mlon / n);
    let (vlat, vlon) = points.iter().fold((0.0, 0.0), |(a, b), p| {
        (a + (p.lat - mlat).powi(2), b + (p.lon - mlon).powi(2))
    });
    (vlat / n + vlon / n) / 2.0
}
