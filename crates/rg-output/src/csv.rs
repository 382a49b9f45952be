//! CSV route history.
//!
//! Appends to `routes.csv` in the configured directory.  The header row is
//! written only when the file is new or empty.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use csv::{Writer, WriterBuilder};
use log::debug;

use rg_spatial::{RouteRecord, RouteSink};

use crate::{OutputError, OutputResult};

pub const FILE_NAME: &str = "routes.csv";

pub const HEADER: [&str; 7] = [
    "start",
    "end",
    "mode",
    "optimization",
    "distance_km",
    "time_min",
    "recorded_unix_secs",
];

/// Appends one CSV row per recorded route.
pub struct CsvRouteSink {
    writer:  Writer<File>,
    path:    PathBuf,
    written: usize,
}

impl CsvRouteSink {
    /// Open (or create) `routes.csv` in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let path = dir.join(FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }
        debug!("route history at {}", path.display());

        Ok(Self { writer, path, written: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written through this handle (not counting earlier sessions).
    pub fn records_written(&self) -> usize {
        self.written
    }
}

impl RouteSink for CsvRouteSink {
    type Error = OutputError;

    /// Write and flush one row, so history survives a crash mid-session.
    fn record(&mut self, record: &RouteRecord) -> OutputResult<()> {
        let recorded = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        self.writer.write_record(&[
            record.start_label.clone(),
            record.end_label.clone(),
            record.mode.to_string(),
            record.weight.to_string(),
            format!("{:.3}", record.distance_km),
            format!("{:.2}", record.time_min),
            recorded.to_string(),
        ])?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}
