//! Edge-weight synthesis: per-edge speed and travel time.
//!
//! Road data rarely carries usable speeds, so every edge gets a speed from a
//! [`SpeedModel`] and a travel time derived from its length:
//!
//! ```text
//! travel_min = (length_m / 1000) / speed_kph * 60
//! ```
//!
//! An edge with no recorded length is treated as 1 m long.
//!
//! [`RandomSpeedModel`] reproduces the stand-in sampling the engine has
//! always used.  Supply a closure or [`ConstantSpeedModel`] when speeds must
//! be deterministic (tests), or a real speed-limit table in production.

use log::debug;

use rg_core::{EdgeId, SeededRng, TravelMode};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

/// Length assumed for an edge with no recorded length.
pub const MISSING_LENGTH_M: f64 = 1.0;

/// Walking speeds are drawn uniformly from this range (km/h).
pub const WALK_SPEED_RANGE_KPH: (f64, f64) = (4.0, 6.0);

/// Driving speeds are drawn uniformly from this set (km/h).
pub const DRIVE_SPEEDS_KPH: [f64; 5] = [15.0, 30.0, 40.0, 50.0, 60.0];

// ── SpeedModel ────────────────────────────────────────────────────────────────

/// Source of per-edge traversal speeds in km/h.
///
/// Returned speeds must be finite and strictly positive;
/// [`synthesize_weights`] rejects anything else.
pub trait SpeedModel {
    fn speed_for(&mut self, edge: EdgeId, mode: TravelMode) -> f64;
}

impl<F> SpeedModel for F
where
    F: FnMut(EdgeId, TravelMode) -> f64,
{
    fn speed_for(&mut self, edge: EdgeId, mode: TravelMode) -> f64 {
        self(edge, mode)
    }
}

/// Same speed on every edge regardless of mode.
#[derive(Clone, Copy, Debug)]
pub struct ConstantSpeedModel(pub f64);

impl SpeedModel for ConstantSpeedModel {
    fn speed_for(&mut self, _edge: EdgeId, _mode: TravelMode) -> f64 {
        self.0
    }
}

/// Random speeds: walking samples the continuous range
/// [`WALK_SPEED_RANGE_KPH`], driving picks from [`DRIVE_SPEEDS_KPH`].
#[derive(Debug)]
pub struct RandomSpeedModel {
    rng: SeededRng,
}

impl RandomSpeedModel {
    pub fn new(seed: u64) -> Self {
        Self { rng: SeededRng::new(seed) }
    }

    pub fn from_rng(rng: SeededRng) -> Self {
        Self { rng }
    }
}

impl SpeedModel for RandomSpeedModel {
    fn speed_for(&mut self, _edge: EdgeId, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Walk => {
                let (lo, hi) = WALK_SPEED_RANGE_KPH;
                self.rng.gen_range(lo..=hi)
            }
            TravelMode::Drive => self
                .rng
                .choose(&DRIVE_SPEEDS_KPH)
                .copied()
                .unwrap_or(DRIVE_SPEEDS_KPH[0]),
        }
    }
}

// ── Synthesis ─────────────────────────────────────────────────────────────────

/// Travel time in minutes for an edge of `length_m` metres at `speed_kph`.
#[inline]
pub fn travel_minutes(length_m: Option<f64>, speed_kph: f64) -> f64 {
    let length_km = length_m.unwrap_or(MISSING_LENGTH_M) / 1000.0;
    length_km / speed_kph * 60.0
}

/// Assign a speed and travel time to every edge of `network`.
///
/// Overwrites any values from a previous call.  All speeds are drawn and
/// validated before the network is touched, so on error the network is
/// left exactly as it was.
///
/// # Errors
///
/// [`SpatialError::InvalidSpeed`] if the model returns a non-finite or
/// non-positive speed for any edge.
pub fn synthesize_weights<M>(
    network: &mut RoadNetwork,
    mode:    TravelMode,
    model:   &mut M,
) -> SpatialResult<()>
where
    M: SpeedModel + ?Sized,
{
    let mut speeds = Vec::with_capacity(network.edge_count());
    for i in 0..network.edge_count() {
        let edge = EdgeId(i as u32);
        let speed = model.speed_for(edge, mode);
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SpatialError::InvalidSpeed { edge, speed });
        }
        speeds.push(speed);
    }

    for (i, speed) in speeds.into_iter().enumerate() {
        network.edge_speed_kph[i]  = Some(speed);
        network.edge_travel_min[i] = Some(travel_minutes(network.edge_length_m[i], speed));
    }

    debug!("synthesized {mode} weights for {} edges", network.edge_count());
    Ok(())
}
