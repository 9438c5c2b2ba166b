//! Unit tests for cam-aggregate.

#[cfg(test)]
mod helpers {
    use cam_core::{GeoPoint, MatchedPoint, RoadId, StationId, StationType, TelemetryPoint};

    pub fn mp(station: u32, way: Option<&str>, ts: i64, speed: Option<f64>) -> MatchedPoint {
        mp_at(station, way, ts, speed, ts as f64, 0.0)
    }

    pub fn mp_at(
        station: u32,
        way: Option<&str>,
        ts: i64,
        speed: Option<f64>,
        lon: f64,
        lat: f64,
    ) -> MatchedPoint {
        MatchedPoint::new(
            TelemetryPoint {
                timestamp_ms: ts,
                station_id:   StationId(station),
                position:     GeoPoint::new(lon, lat),
                station_type: StationType::PASSENGER_CAR,
                speed_mps:    speed,
            },
            way.map(RoadId::from),
        )
    }
}

// ── Reduction ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reduction {
    use cam_core::{GeoPoint, MissingSpeedPolicy, StationId};

    use super::helpers::mp;
    use crate::aggregate;

    #[test]
    fn sorts_by_timestamp_and_skips_null_speed() {
        let points = vec![
            mp(1, Some("R1"), 100, Some(2.0)),
            mp(1, Some("R1"), 200, Some(4.0)),
            mp(1, Some("R1"), 150, None),
        ];
        let segs = aggregate(&points, MissingSpeedPolicy::Fail).unwrap();
        assert_eq!(segs.len(), 1);

        let s = &segs[0];
        assert_eq!(s.station_id, StationId(1));
        assert_eq!(s.way_id.as_ref().unwrap().as_str(), "R1");
        assert_eq!(s.timestamps, [100, 150, 200]);
        assert_eq!(
            s.coordinates,
            [GeoPoint::new(100.0, 0.0), GeoPoint::new(150.0, 0.0), GeoPoint::new(200.0, 0.0)]
        );
        assert_eq!(s.avg_speed_mps, Some(3.0));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        use super::helpers::mp_at;
        let points = vec![
            mp_at(1, Some("R"), 50, Some(1.0), 3.0, 0.0),
            mp_at(1, Some("R"), 10, Some(1.0), 1.0, 0.0),
            mp_at(1, Some("R"), 50, Some(1.0), 4.0, 0.0),
            mp_at(1, Some("R"), 50, Some(1.0), 2.0, 0.0),
        ];
        let segs = aggregate(&points, MissingSpeedPolicy::Fail).unwrap();
        let lons: Vec<f64> = segs[0].coordinates.iter().map(|p| p.lon).collect();
        assert_eq!(lons, [1.0, 3.0, 4.0, 2.0]);
    }

    #[test]
    fn station_type_from_earliest_point() {
        let mut late = mp(1, Some("R"), 200, Some(1.0));
        late.point.station_type = cam_core::StationType::BUS;
        let early = mp(1, Some("R"), 100, Some(1.0));
        let segs = aggregate(&[late, early], MissingSpeedPolicy::Fail).unwrap();
        assert_eq!(segs[0].station_type, cam_core::StationType::PASSENGER_CAR);
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(aggregate(&[], MissingSpeedPolicy::Fail).unwrap().is_empty());
    }
}

// ── Grouping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grouping {
    use std::collections::HashSet;

    use cam_core::{MissingSpeedPolicy, StationId};

    use super::helpers::mp;
    use crate::aggregate;

    #[test]
    fn unmatched_points_group_per_station() {
        let points = vec![
            mp(1, None, 1, Some(1.0)),
            mp(2, None, 2, Some(2.0)),
            mp(1, None, 3, Some(3.0)),
            mp(1, Some("R"), 4, Some(4.0)),
        ];
        let segs = aggregate(&points, MissingSpeedPolicy::Fail).unwrap();
        assert_eq!(segs.len(), 3);

        let s1_null = segs
            .iter()
            .find(|s| s.station_id == StationId(1) && s.way_id.is_none())
            .unwrap();
        assert_eq!(s1_null.timestamps, [1, 3]);
        assert_eq!(s1_null.avg_speed_mps, Some(2.0));
    }

    #[test]
    fn groups_emitted_in_first_appearance_order() {
        let points = vec![
            mp(2, Some("B"), 1, Some(1.0)),
            mp(1, Some("A"), 2, Some(1.0)),
            mp(2, Some("B"), 3, Some(1.0)),
            mp(1, None, 4, Some(1.0)),
        ];
        let segs = aggregate(&points, MissingSpeedPolicy::Fail).unwrap();
        let keys: Vec<_> = segs
            .iter()
            .map(|s| (s.station_id.0, s.way_id.as_ref().map(|w| w.to_string())))
            .collect();
        assert_eq!(keys, [(2, Some("B".into())), (1, Some("A".into())), (1, None)]);
    }

    #[test]
    fn partition_covers_every_point_once() {
        // 5 stations × 4 roads (plus unmatched), interleaved and out of order.
        let ways = [Some("a"), Some("b"), None, Some("c"), Some("d")];
        let points: Vec<_> = (0..200)
            .map(|i: i64| {
                let station = (i % 5) as u32;
                let way = ways[((i * 7) % 5) as usize];
                mp(station, way, (i * 37) % 101, Some(i as f64))
            })
            .collect();

        let segs = aggregate(&points, MissingSpeedPolicy::Fail).unwrap();

        let total: usize = segs.iter().map(|s| s.len()).sum();
        assert_eq!(total, points.len());

        let mut keys = HashSet::new();
        for s in &segs {
            assert!(keys.insert((s.station_id, s.way_id.clone())), "duplicate group");
            assert_eq!(s.coordinates.len(), s.timestamps.len());
            assert!(s.timestamps.windows(2).all(|w| w[0] <= w[1]));
        }

        for p in &points {
            let seg = segs
                .iter()
                .find(|s| s.station_id == p.point.station_id && s.way_id == p.way_id)
                .unwrap();
            assert!(seg.timestamps.contains(&p.point.timestamp_ms));
        }
    }
}

// ── Missing speed policy ──────────────────────────────────────────────────────

#[cfg(test)]
mod missing_speed {
    use cam_core::{MissingSpeedPolicy, StationId};

    use super::helpers::mp;
    use crate::{AggregateError, GroupKey, aggregate, mean_speed};

    fn points() -> Vec<cam_core::MatchedPoint> {
        vec![
            mp(1, Some("R1"), 1, Some(5.0)),
            mp(2, Some("R1"), 2, None),
            mp(2, Some("R1"), 3, None),
            mp(3, None, 4, None),
        ]
    }

    #[test]
    fn fail_policy_reports_every_speedless_group() {
        let err = aggregate(&points(), MissingSpeedPolicy::Fail).unwrap_err();
        let AggregateError::NoSpeedSamples { groups } = &err;
        assert_eq!(
            groups,
            &[
                GroupKey { station_id: StationId(2), way_id: Some("R1".into()) },
                GroupKey { station_id: StationId(3), way_id: None },
            ]
        );
        let msg = err.to_string();
        assert!(msg.starts_with("2 group(s)"), "{msg}");
        assert!(msg.contains("StationId(3) unmatched"), "{msg}");
    }

    #[test]
    fn emit_null_policy_keeps_group_without_mean() {
        let segs = aggregate(&points(), MissingSpeedPolicy::EmitNull).unwrap();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].avg_speed_mps, Some(5.0));
        assert_eq!(segs[1].avg_speed_mps, None);
        assert_eq!(segs[1].len(), 2);
        assert_eq!(segs[2].avg_speed_mps, None);
    }

    #[test]
    fn error_message_truncates_long_lists() {
        let points: Vec<_> = (0..8).map(|s| mp(s, None, 0, None)).collect();
        let msg = aggregate(&points, MissingSpeedPolicy::Fail).unwrap_err().to_string();
        assert!(msg.contains("(3 more)"), "{msg}");
    }

    #[test]
    fn mean_of_no_samples_is_none() {
        assert_eq!(mean_speed(&[]), None);
    }

    #[test]
    fn zero_speed_counts_as_a_sample() {
        let a = mp(1, None, 0, Some(0.0));
        let b = mp(1, None, 1, Some(3.0));
        assert_eq!(mean_speed(&[&a.point, &b.point]), Some(1.5));
    }
}
