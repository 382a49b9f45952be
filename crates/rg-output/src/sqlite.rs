//! SQLite route history (feature `sqlite`).
//!
//! Creates `routes.db` in the configured directory with a single `routes`
//! table.  `id` and `timestamp` are filled in by the database.

use std::path::Path;

use log::debug;
use rusqlite::Connection;

use rg_spatial::{RouteRecord, RouteSink};

use crate::{OutputError, OutputResult};

pub const FILE_NAME: &str = "routes.db";

/// Inserts one `routes` row per recorded route.
pub struct SqliteRouteSink {
    conn: Connection,
}

impl SqliteRouteSink {
    /// Open (or create) `routes.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Self::from_connection(Connection::open(dir.join(FILE_NAME))?)
    }

    /// In-memory history, dropped with the sink.
    pub fn in_memory() -> OutputResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> OutputResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS routes (
                 id                INTEGER PRIMARY KEY AUTOINCREMENT,
                 start_address     TEXT    NOT NULL,
                 end_address       TEXT    NOT NULL,
                 transport_mode    TEXT    NOT NULL,
                 optimization_mode TEXT    NOT NULL,
                 distance_km       REAL    NOT NULL,
                 time_min          REAL    NOT NULL,
                 timestamp         TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP
             );",
        )?;
        Ok(Self { conn })
    }

    /// Number of rows in the history.
    pub fn count(&self) -> OutputResult<u64> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM routes", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RouteSink for SqliteRouteSink {
    type Error = OutputError;

    fn record(&mut self, record: &RouteRecord) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO routes \
             (start_address, end_address, transport_mode, optimization_mode, distance_km, time_min) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                record.start_label,
                record.end_label,
                record.mode.as_str(),
                record.weight.as_str(),
                record.distance_km,
                record.time_min,
            ],
        )?;
        debug!("route {} → {} saved to history", record.start_label, record.end_label);
        Ok(())
    }
}
