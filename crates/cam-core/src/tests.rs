//! Unit tests for cam-core primitives.

#[cfg(test)]
mod ids {
    use std::collections::HashMap;

    use crate::{RoadHandle, RoadId, StationId};

    #[test]
    fn index_roundtrip() {
        let h = RoadHandle(42);
        assert_eq!(h.index(), 42);
        assert_eq!(RoadHandle::try_from(42usize).unwrap(), h);
    }

    #[test]
    fn ordering() {
        assert!(StationId(0) < StationId(1));
        assert!(RoadHandle(100) > RoadHandle(99));
    }

    #[test]
    fn display() {
        assert_eq!(StationId(7).to_string(), "StationId(7)");
        assert_eq!(RoadId::from("way/12").to_string(), "way/12");
    }

    #[test]
    fn road_id_clones_share_storage() {
        let a = RoadId::from("way/1");
        let b = a.clone();
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn road_id_map_lookup_by_str() {
        let mut m = HashMap::new();
        m.insert(RoadId::from("way/9"), 3);
        assert_eq!(m.get("way/9"), Some(&3));
        assert_eq!(m.get("way/8"), None);
    }
}

#[cfg(test)]
mod geo {
    use crate::{BoundingBox, GeoPoint};

    #[test]
    fn segment_distance_perpendicular() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(10.0, 0.0);
        let p = GeoPoint::new(5.0, 3.0);
        assert!((p.planar_distance_to_segment(a, b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn segment_distance_clamps_to_endpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(10.0, 0.0);
        // Beyond b: distance is to b, not to the infinite line.
        let p = GeoPoint::new(13.0, 4.0);
        assert!((p.planar_distance_to_segment(a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_length_segment_is_point_distance() {
        let a = GeoPoint::new(1.0, 1.0);
        let p = GeoPoint::new(4.0, 5.0);
        assert!((p.planar_distance_to_segment(a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn polyline_distance_uses_segments_not_vertices() {
        // Vertices are far from p, but the middle of the first segment is close.
        let line = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(10.0, 10.0),
        ];
        let p = GeoPoint::new(5.0, 0.5);
        let d = p.planar_distance_to_polyline(&line).unwrap();
        assert!((d - 0.5).abs() < 1e-12, "got {d}");
    }

    #[test]
    fn polyline_distance_empty_is_none() {
        assert!(GeoPoint::new(0.0, 0.0).planar_distance_to_polyline(&[]).is_none());
    }

    #[test]
    fn haversine_one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(11.0, 48.0);
        let b = GeoPoint::new(11.0, 49.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn bbox_from_points() {
        let pts = [
            GeoPoint::new(3.0, -1.0),
            GeoPoint::new(-2.0, 4.0),
            GeoPoint::new(1.0, 0.0),
        ];
        let bbox = BoundingBox::from_points(&pts).unwrap();
        assert_eq!(bbox, BoundingBox::new(-2.0, -1.0, 3.0, 4.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn bbox_boundaries_are_closed() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains(GeoPoint::new(10.0, 0.0)));
        assert!(!bbox.contains(GeoPoint::new(10.000_001, 5.0)));

        let touching = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert!(bbox.intersects(&touching));
        let apart = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert!(!bbox.intersects(&apart));
    }
}

#[cfg(test)]
mod telemetry {
    use crate::{GeoPoint, MatchedPoint, RoadId, StationId, StationType, TelemetryPoint};

    #[test]
    fn station_type_labels() {
        assert_eq!(StationType::PASSENGER_CAR.label(), "passengerCar");
        assert_eq!(StationType(15).label(), "roadSideUnit");
        assert_eq!(StationType(13).label(), "reserved");
        assert_eq!(StationType::BUS.to_string(), "6 (bus)");
    }

    #[test]
    fn matched_flag() {
        let p = TelemetryPoint {
            timestamp_ms: 1,
            station_id:   StationId(1),
            position:     GeoPoint::new(0.0, 0.0),
            station_type: StationType::PASSENGER_CAR,
            speed_mps:    None,
        };
        assert!(!MatchedPoint::new(p, None).is_matched());
        assert!(MatchedPoint::new(p, Some(RoadId::from("r"))).is_matched());
    }
}

#[cfg(test)]
mod segment {
    use crate::{AggregatedSegment, GeoPoint, StationId, StationType};

    #[test]
    fn duration_and_length() {
        let seg = AggregatedSegment {
            station_id:    StationId(1),
            station_type:  StationType::PASSENGER_CAR,
            way_id:        None,
            avg_speed_mps: Some(10.0),
            coordinates:   vec![GeoPoint::new(11.0, 48.0), GeoPoint::new(11.0, 48.001)],
            timestamps:    vec![1_000, 12_000],
        };
        assert_eq!(seg.len(), 2);
        assert_eq!(seg.duration_ms(), 11_000);
        // 0.001° of latitude ≈ 111 m
        assert!((seg.path_length_m() - 111.2).abs() < 1.0);
    }
}

#[cfg(test)]
mod config {
    use crate::{MissingSpeedPolicy, PipelineConfig};

    #[test]
    fn default_is_strict() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.missing_speed, MissingSpeedPolicy::Fail);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_threads_rejected() {
        let cfg = PipelineConfig { num_threads: Some(0), ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}
