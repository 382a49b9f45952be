//! Spatial-subsystem error type.
//!
//! Every failed route request surfaces as exactly one of these.  The three
//! kinds callers usually branch on are [`SpatialError::Config`],
//! [`SpatialError::NoRoute`] and [`SpatialError::InvalidWaypoint`].

use thiserror::Error;

use rg_core::{CoreError, EdgeId, NodeId};

/// Errors produced by `rg-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("invalid waypoint list: {0}")]
    InvalidWaypoint(String),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("speed model returned {speed} for {edge}; speeds must be finite and positive")]
    InvalidSpeed { edge: EdgeId, speed: f64 },

    #[error("network has not been prepared; run weight synthesis and partitioning first")]
    NotPrepared,

    #[error("route search cancelled")]
    Cancelled,
}

impl From<CoreError> for SpatialError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Config(msg) => SpatialError::Config(msg),
            CoreError::Parse(msg)  => SpatialError::Config(format!("parse error: {msg}")),
        }
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
