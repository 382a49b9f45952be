//! Unit tests for rg-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, RegionId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn invalid_sentinels() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(RegionId::default(), RegionId::INVALID);
        assert!(!RegionId::INVALID.is_valid());
        assert!(RegionId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
        assert_eq!(RegionId(3).to_string(), "RegionId(3)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{CoreError, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(45.035, 38.975);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(45.0, 38.0);
        let b = GeoPoint::new(46.0, 38.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn degree_distance_is_squared_euclidean() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(3.0, 4.0);
        assert_eq!(a.degree_distance_2(b), 25.0);
    }

    #[test]
    fn parse_lat_lon() {
        let p: GeoPoint = "45.1, 30.25".parse().unwrap();
        assert_eq!(p, GeoPoint::new(45.1, 30.25));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!("45.1".parse::<GeoPoint>(), Err(CoreError::Parse(_))));
        assert!(matches!("a,b".parse::<GeoPoint>(), Err(CoreError::Parse(_))));
    }
}

#[cfg(test)]
mod rng {
    use crate::SeededRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let va: Vec<u32> = (0..8).map(|_| a.gen_range(0..1_000_000)).collect();
        let vb: Vec<u32> = (0..8).map(|_| b.gen_range(0..1_000_000)).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn child_streams_are_reproducible() {
        let mut root_a = SeededRng::new(7);
        let mut root_b = SeededRng::new(7);
        let mut ca = root_a.child(3);
        let mut cb = root_b.child(3);
        assert_eq!(ca.unit().to_bits(), cb.unit().to_bits());
    }

    #[test]
    fn choose_empty_is_none() {
        let mut r = SeededRng::new(0);
        let empty: [u8; 0] = [];
        assert!(r.choose(&empty).is_none());
        assert_eq!(r.choose(&[9]), Some(&9));
    }
}

#[cfg(test)]
mod transport {
    use crate::{TravelMode, Weight};

    #[test]
    fn labels() {
        assert_eq!(TravelMode::Drive.to_string(), "drive");
        assert_eq!(TravelMode::Walk.as_str(), "walk");
        assert_eq!(Weight::TravelTime.to_string(), "travel_time");
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("Walking".parse::<TravelMode>().unwrap(), TravelMode::Walk);
        assert_eq!("car".parse::<TravelMode>().unwrap(), TravelMode::Drive);
        assert_eq!("time".parse::<Weight>().unwrap(), Weight::TravelTime);
        assert_eq!("distance".parse::<Weight>().unwrap(), Weight::Length);
        assert!("bike".parse::<TravelMode>().is_err());
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, ParallelEdgePolicy, RoutingConfig, TravelMode, Weight};

    #[test]
    fn defaults() {
        let c = RoutingConfig::default();
        assert_eq!(c.cluster_count, 10);
        assert_eq!(c.seed, 42);
        assert_eq!(c.mode, TravelMode::Drive);
        assert_eq!(c.weight, Weight::Length);
        assert_eq!(c.parallel_edges, ParallelEdgePolicy::MinWeight);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_clusters_rejected() {
        let c = RoutingConfig { cluster_count: 0, ..RoutingConfig::default() };
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
    }
}

#[cfg(all(test, feature = "serde"))]
mod config_json {
    use crate::{ParallelEdgePolicy, RoutingConfig, TravelMode, Weight};

    #[test]
    fn partial_json_fills_defaults() {
        let c: RoutingConfig =
            serde_json::from_str(r#"{ "cluster_count": 4, "mode": "walk" }"#).unwrap();
        assert_eq!(c.cluster_count, 4);
        assert_eq!(c.mode, TravelMode::Walk);
        assert_eq!(c.seed, 42);
        assert_eq!(c.weight, Weight::Length);
    }

    #[test]
    fn enum_spellings() {
        let c: RoutingConfig = serde_json::from_str(
            r#"{ "weight": "travel_time", "parallel_edges": "first" }"#,
        )
        .unwrap();
        assert_eq!(c.weight, Weight::TravelTime);
        assert_eq!(c.parallel_edges, ParallelEdgePolicy::First);
    }
}
