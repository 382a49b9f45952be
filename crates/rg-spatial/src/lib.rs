//! `rg-spatial`: road network, region partitioning, and gateway routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`network`]   | `RoadNetwork` (CSR + reverse CSR + R-tree), builder          |
//! | [`weights`]   | `SpeedModel`, `RandomSpeedModel`, `synthesize_weights`       |
//! | [`partition`] | `RegionPartitioner` (k-means), `Partition`                  |
//! | [`router`]    | `Router` trait, `Path`, `DijkstraRouter`                    |
//! | [`gateway`]   | `GatewayRouter`, `gateways`                                 |
//! | [`composer`]  | `RouteComposer`, `ComposedRoute`, `SpeedTier`               |
//! | [`planner`]   | `RoutePlanner`, `RouteRequest`                              |
//! | [`sink`]      | `RouteSink`, `RouteRecord`                                  |
//! | [`cancel`]    | `CancelToken`                                               |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on route output types.     |

pub mod cancel;
pub mod composer;
pub mod error;
pub mod gateway;
pub mod network;
pub mod partition;
pub mod planner;
pub mod router;
pub mod sink;
pub mod weights;


pub use cancel::CancelToken;
pub use composer::{ComposedRoute, RouteComposer, RouteEdge, SpeedTier};
pub use error::{SpatialError, SpatialResult};
pub use gateway::{GatewayRouter, gateways};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use partition::{Partition, RegionPartitioner};
pub use planner::{RoutePlanner, RouteRequest};
pub use router::{DijkstraRouter, Path, Router};
pub use sink::{NoopSink, RouteRecord, RouteSink};
pub use weights::{ConstantSpeedModel, RandomSpeedModel, SpeedModel, synthesize_weights};
