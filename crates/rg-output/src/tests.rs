//! Integration tests for rg-output.

#[cfg(test)]
mod helpers {
    use rg_core::{TravelMode, Weight};
    use rg_spatial::RouteRecord;

    pub fn record(start: &str, end: &str) -> RouteRecord {
        RouteRecord {
            start_label: start.to_owned(),
            end_label:   end.to_owned(),
            mode:        TravelMode::Walk,
            weight:      Weight::TravelTime,
            distance_km: 2.5,
            time_min:    31.25,
        }
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use rg_spatial::RouteSink;

    use crate::csv::{CsvRouteSink, FILE_NAME, HEADER};
    use super::helpers::record;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_rows(dir: &TempDir) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(FILE_NAME)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_file_created_with_header() {
        let dir = tmp();
        let sink = CsvRouteSink::new(dir.path()).unwrap();
        assert!(sink.path().exists());

        let mut rdr = csv::Reader::from_path(dir.path().join(FILE_NAME)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, HEADER);
    }

    #[test]
    fn csv_record_written() {
        let dir = tmp();
        let mut sink = CsvRouteSink::new(dir.path()).unwrap();
        sink.record(&record("Tverskaya 1", "Arbat 10")).unwrap();
        assert_eq!(sink.records_written(), 1);

        let rows = read_rows(&dir);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Tverskaya 1");
        assert_eq!(&rows[0][1], "Arbat 10");
        assert_eq!(&rows[0][2], "walk");
        assert_eq!(&rows[0][3], "travel_time");
        assert_eq!(&rows[0][4], "2.500");
        assert_eq!(&rows[0][5], "31.25");
        assert!(rows[0][6].parse::<u64>().unwrap() > 0);
    }

    #[test]
    fn csv_label_with_comma_is_quoted() {
        let dir = tmp();
        let mut sink = CsvRouteSink::new(dir.path()).unwrap();
        sink.record(&record("Lenina 5, Moscow", "B")).unwrap();
        let rows = read_rows(&dir);
        assert_eq!(&rows[0][0], "Lenina 5, Moscow");
    }

    #[test]
    fn csv_reopen_appends_without_second_header() {
        let dir = tmp();
        {
            let mut sink = CsvRouteSink::new(dir.path()).unwrap();
            sink.record(&record("A", "B")).unwrap();
        }
        {
            let mut sink = CsvRouteSink::new(dir.path()).unwrap();
            sink.record(&record("C", "D")).unwrap();
            assert_eq!(sink.records_written(), 1);
        }

        let rows = read_rows(&dir);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "A");
        assert_eq!(&rows[1][0], "C");
    }

    #[test]
    fn csv_missing_dir_is_io_error() {
        let dir = tmp();
        let result = CsvRouteSink::new(&dir.path().join("no/such/dir"));
        assert!(matches!(result, Err(crate::OutputError::Io(_))));
    }

    #[test]
    fn integration_planner_csv() {
        use rg_core::{GeoPoint, RoutingConfig};
        use rg_spatial::{ConstantSpeedModel, RoadNetworkBuilder, RoutePlanner, RouteRequest};

        let mut b = RoadNetworkBuilder::new();
        let ids: Vec<_> = (0..6)
            .map(|i| b.add_node(GeoPoint::new(55.75, 37.60 + i as f64 * 0.01)))
            .collect();
        for w in ids.windows(2) {
            b.add_road(w[0], w[1], 600.0);
        }
        let config = RoutingConfig { cluster_count: 2, ..RoutingConfig::default() };
        let mut planner = RoutePlanner::new(b.build(), config).unwrap();
        planner.prepare(&mut ConstantSpeedModel(36.0)).unwrap();

        let dir = tmp();
        let mut sink = CsvRouteSink::new(dir.path()).unwrap();
        let request = RouteRequest::new(vec![ids[0], ids[5]]).labels("west", "east");
        let route = planner.route(&request, &mut sink).unwrap();
        assert_eq!(route.nodes, ids);

        let rows = read_rows(&dir);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "west");
        assert_eq!(&rows[0][2], "drive");
        assert_eq!(&rows[0][3], "length");
        assert_eq!(&rows[0][4], "3.000"); // 5 × 600 m
        assert_eq!(&rows[0][5], "5.00");  // 3 km at 36 km/h
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use rg_spatial::RouteSink;

    use crate::sqlite::{FILE_NAME, SqliteRouteSink};
    use super::helpers::record;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _sink = SqliteRouteSink::new(dir.path()).unwrap();
        assert!(dir.path().join(FILE_NAME).exists());
    }

    #[test]
    fn sqlite_row_fields() {
        let dir = tmp();
        let mut sink = SqliteRouteSink::new(dir.path()).unwrap();
        sink.record(&record("A", "B")).unwrap();
        drop(sink);

        let conn = rusqlite::Connection::open(dir.path().join(FILE_NAME)).unwrap();
        let (id, start, mode, opt, km, ts): (i64, String, String, String, f64, String) = conn
            .query_row(
                "SELECT id, start_address, transport_mode, optimization_mode, distance_km, timestamp \
                 FROM routes",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?)),
            )
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(start, "A");
        assert_eq!(mode, "walk");
        assert_eq!(opt, "travel_time");
        assert_eq!(km, 2.5);
        assert!(!ts.is_empty(), "timestamp should default to CURRENT_TIMESTAMP");
    }

    #[test]
    fn sqlite_ids_autoincrement() {
        let mut sink = SqliteRouteSink::in_memory().unwrap();
        for i in 0..3 {
            sink.record(&record(&format!("s{i}"), "e")).unwrap();
        }
        assert_eq!(sink.count().unwrap(), 3);

        let ids: Vec<i64> = sink
            .connection()
            .prepare("SELECT id FROM routes ORDER BY id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn sqlite_reopen_keeps_history() {
        let dir = tmp();
        SqliteRouteSink::new(dir.path()).unwrap().record(&record("A", "B")).unwrap();
        let mut sink = SqliteRouteSink::new(dir.path()).unwrap();
        sink.record(&record("C", "D")).unwrap();
        assert_eq!(sink.count().unwrap(), 2);
    }
}
