//! Core error type.
//!
//! `rg-spatial` converts these into `SpatialError` via a `From` impl so that
//! configuration problems surface as the same kind regardless of which layer
//! detected them.

use thiserror::Error;

/// Errors produced while validating or parsing core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `rg-core`.
pub type CoreResult<T> = Result<T, CoreError>;
