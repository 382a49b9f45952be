//! Travel mode and optimisation weight.
//!
//! Both enums parse from the short lowercase labels used in config files and
//! on the command line, and the same labels are written to route history.

use std::str::FromStr;

use crate::CoreError;

/// The network the route is computed on.  Determines how edge speeds are
/// synthesised.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelMode {
    /// Private vehicle on the drivable network.
    #[default]
    Drive,
    /// On foot.
    Walk,
}

impl TravelMode {
    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Drive => "drive",
            TravelMode::Walk  => "walk",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" | "driving" | "car" => Ok(TravelMode::Drive),
            "walk" | "walking" | "foot" => Ok(TravelMode::Walk),
            other => Err(CoreError::Parse(format!("unknown travel mode `{other}`"))),
        }
    }
}

/// The optimisation criterion: which edge attribute a search minimises.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Weight {
    /// Physical edge length in metres.
    #[default]
    Length,
    /// Synthesised travel time in minutes.
    TravelTime,
}

impl Weight {
    pub fn as_str(self) -> &'static str {
        match self {
            Weight::Length     => "length",
            Weight::TravelTime => "travel_time",
        }
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weight {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" | "distance" => Ok(Weight::Length),
            "travel_time" | "time" => Ok(Weight::TravelTime),
            other => Err(CoreError::Parse(format!("unknown weight `{other}`"))),
        }
    }
}
