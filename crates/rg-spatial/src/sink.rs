//! Completed-route records and the sink trait they are handed to.
//!
//! Storage backends live in `rg-output`; this crate only defines the
//! contract so the planner can call it once per successful route.

use rg_core::{TravelMode, Weight};

use crate::composer::ComposedRoute;

/// One row of route history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRecord {
    /// Caller-supplied label for the start point (usually the address typed in).
    pub start_label: String,
    pub end_label:   String,
    pub mode:        TravelMode,
    pub weight:      Weight,
    pub distance_km: f64,
    pub time_min:    f64,
}

impl RouteRecord {
    pub fn from_route(
        route:       &ComposedRoute,
        start_label: &str,
        end_label:   &str,
        mode:        TravelMode,
    ) -> Self {
        Self {
            start_label: start_label.to_owned(),
            end_label:   end_label.to_owned(),
            mode,
            weight:      route.weight,
            distance_km: route.total_distance_km,
            time_min:    route.total_time_min,
        }
    }
}

/// Destination for completed-route records.
pub trait RouteSink {
    type Error: std::error::Error;

    fn record(&mut self, record: &RouteRecord) -> Result<(), Self::Error>;
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl RouteSink for NoopSink {
    type Error = std::convert::Infallible;

    fn record(&mut self, _record: &RouteRecord) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// In-memory history, mostly for tests.
impl RouteSink for Vec<RouteRecord> {
    type Error = std::convert::Infallible;

    fn record(&mut self, record: &RouteRecord) -> Result<(), Self::Error> {
        self.push(record.clone());
        Ok(())
    }
}
