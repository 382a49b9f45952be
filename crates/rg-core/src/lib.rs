//! `rg-core`: foundational types for the `regroute` route search engine.
//!
//! This crate is a dependency of every other `rg-*` crate.  It intentionally
//! has no `rg-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `RegionId`                        |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`rng`]         | `SeededRng`                                           |
//! | [`transport`]   | `TravelMode`, `Weight`                                |
//! | [`config`]      | `RoutingConfig`, `ParallelEdgePolicy`                 |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ParallelEdgePolicy, RoutingConfig};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId, RegionId};
pub use rng::SeededRng;
pub use transport::{TravelMode, Weight};
