//! `rg-output`: route history backends.
//!
//! Each backend implements [`rg_spatial::RouteSink`] and persists one row per
//! successfully composed route.
//!
//! | Feature   | Backend | File created  |
//! |-----------|---------|---------------|
//! | *(none)*  | CSV     | `routes.csv`  |
//! | `sqlite`  | SQLite  | `routes.db`   |
//!
//! Both backends append: re-opening an existing history keeps earlier rows.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rg_output::CsvRouteSink;
//!
//! let mut history = CsvRouteSink::new(Path::new("./output"))?;
//! let route = planner.route(&request, &mut history)?;
//! ```

pub mod csv;
pub mod error;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvRouteSink;
pub use error::{OutputError, OutputResult};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRouteSink;
