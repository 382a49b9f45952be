//! Synthetic grid city.
//!
//! A 12 × 12 street grid of roughly 450 m blocks around central Moscow.
//! Every fourth east-west street is one-way eastbound, and a diagonal avenue
//! cuts through from the south-west corner to the north-east one.  Edge
//! lengths are great-circle distances between the junctions.

use rg_core::{GeoPoint, NodeId};
use rg_spatial::{RoadNetwork, RoadNetworkBuilder};

pub const ROWS: usize = 12;
pub const COLS: usize = 12;

const SOUTH_WEST: GeoPoint = GeoPoint { lat: 55.730, lon: 37.570 };
const LAT_STEP:   f64 = 0.004;
const LON_STEP:   f64 = 0.007;

/// Build the grid.  Node `r * COLS + c` sits at row `r` (south to north),
/// column `c` (west to east).
pub fn build_city() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::with_capacity(ROWS * COLS, 4 * ROWS * COLS + 2 * ROWS);

    let mut ids = Vec::with_capacity(ROWS * COLS);
    for r in 0..ROWS {
        for c in 0..COLS {
            ids.push(b.add_node(GeoPoint::new(
                SOUTH_WEST.lat + r as f64 * LAT_STEP,
                SOUTH_WEST.lon + c as f64 * LON_STEP,
            )));
        }
    }
    let at = |r: usize, c: usize| ids[r * COLS + c];

    for r in 0..ROWS {
        for c in 0..COLS {
            if c + 1 < COLS {
                street(&mut b, at(r, c), at(r, c + 1), r % 4 != 1);
            }
            if r + 1 < ROWS {
                street(&mut b, at(r, c), at(r + 1, c), true);
            }
        }
    }
    for i in 0..ROWS.min(COLS) - 1 {
        street(&mut b, at(i, i), at(i + 1, i + 1), true);
    }

    b.build()
}

fn street(b: &mut RoadNetworkBuilder, from: NodeId, to: NodeId, two_way: bool) {
    let length_m = b.node_pos(from).distance_m(b.node_pos(to));
    if two_way {
        b.add_road(from, to, length_m);
    } else {
        b.add_directed_edge(from, to, length_m);
    }
}
