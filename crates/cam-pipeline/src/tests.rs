//! Unit tests for cam-pipeline.

#[cfg(test)]
mod helpers {
    use cam_core::{GeoPoint, StationId, StationType, TelemetryPoint};
    use cam_spatial::{GeometryStore, load_geojson_str};

    /// R1 box [0,0,10,10], R2 box [20,20,30,30].
    pub fn two_roads() -> GeometryStore {
        let doc = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "@id": "R1" },
              "geometry": { "type": "LineString", "coordinates": [[0, 0], [10, 10]] } },
            { "type": "Feature", "properties": { "@id": "R2" },
              "geometry": { "type": "LineString", "coordinates": [[20, 20], [30, 30]] } } ] }"#;
        load_geojson_str(doc).unwrap().0
    }

    pub fn tp(station: u32, ts: i64, lon: f64, lat: f64, speed: Option<f64>) -> TelemetryPoint {
        TelemetryPoint {
            timestamp_ms: ts,
            station_id:   StationId(station),
            position:     GeoPoint::new(lon, lat),
            station_type: StationType::PASSENGER_CAR,
            speed_mps:    speed,
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use cam_core::{CoreError, MissingSpeedPolicy, PipelineConfig};

    use super::helpers::tp;
    use crate::{NoopObserver, PipelineBuilder, PipelineError};

    #[test]
    fn zero_threads_rejected() {
        let config = PipelineConfig { num_threads: Some(0), ..Default::default() };
        let err = PipelineBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, PipelineError::Config(CoreError::Config(_))));
    }

    #[test]
    fn explicit_thread_count_accepted() {
        let config = PipelineConfig { num_threads: Some(2), ..Default::default() };
        let pipeline = PipelineBuilder::new(config).roads(super::helpers::two_roads()).build().unwrap();
        let matched = pipeline.match_points(vec![tp(1, 0, 5.0, 5.0, None)]);
        assert_eq!(matched[0].way_id.as_ref().unwrap().as_str(), "R1");
    }

    #[test]
    fn no_roads_means_every_point_unmatched() {
        let config = PipelineConfig { missing_speed: MissingSpeedPolicy::EmitNull, ..Default::default() };
        let pipeline = PipelineBuilder::new(config).build().unwrap();
        assert!(pipeline.store().is_empty());

        let out = pipeline
            .run(vec![tp(1, 0, 5.0, 5.0, Some(1.0)), tp(1, 1, 6.0, 6.0, None)], &mut NoopObserver)
            .unwrap();
        assert_eq!(out.report.points_unmatched, 2);
        assert_eq!(out.segments.len(), 1);
        assert!(out.segments[0].way_id.is_none());
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use cam_core::{AggregatedSegment, MissingSpeedPolicy, PipelineConfig, StationId};

    use super::helpers::{tp, two_roads};
    use crate::{
        NoopObserver, PipelineBuilder, PipelineError, PipelineObserver, RunReport, TracingObserver,
    };

    #[test]
    fn match_preserves_input_order() {
        let pipeline = PipelineBuilder::new(PipelineConfig::default()).roads(two_roads()).build().unwrap();
        let input = vec![
            tp(1, 0, 25.0, 25.0, None),
            tp(2, 1, 50.0, 50.0, None),
            tp(3, 2, 5.0, 5.0, None),
        ];
        let matched = pipeline.match_points(input.clone());
        let ways: Vec<_> = matched.iter().map(|m| m.way_id.as_ref().map(|w| w.as_str())).collect();
        assert_eq!(ways, [Some("R2"), None, Some("R1")]);
        let back: Vec<_> = matched.into_iter().map(|m| m.point).collect();
        assert_eq!(back, input);
    }

    #[test]
    fn end_to_end_scenario() {
        let pipeline = PipelineBuilder::new(PipelineConfig::default()).roads(two_roads()).build().unwrap();
        let points = vec![
            tp(1, 100, 2.0, 2.0, Some(2.0)),
            tp(1, 200, 8.0, 8.0, Some(4.0)),
            tp(1, 150, 5.0, 5.0, None),
            tp(1, 120, 50.0, 50.0, Some(9.0)),
        ];
        let out = pipeline.run(points, &mut TracingObserver::new()).unwrap();

        assert_eq!(
            out.report,
            RunReport {
                roads_indexed:          2,
                points_in:              4,
                points_matched:         3,
                points_unmatched:       1,
                segments:               2,
                segments_without_speed: 0,
            }
        );

        let r1 = out.segments.iter().find(|s| s.way_id.is_some()).unwrap();
        assert_eq!(r1.station_id, StationId(1));
        assert_eq!(r1.timestamps, [100, 150, 200]);
        assert_eq!(r1.avg_speed_mps, Some(3.0));

        let stray = out.segments.iter().find(|s| s.way_id.is_none()).unwrap();
        assert_eq!(stray.timestamps, [120]);
        assert_eq!(stray.avg_speed_mps, Some(9.0));
    }

    #[test]
    fn speedless_group_fails_the_run_by_default() {
        let pipeline = PipelineBuilder::new(PipelineConfig::default()).roads(two_roads()).build().unwrap();
        let err = pipeline
            .run(vec![tp(1, 0, 5.0, 5.0, Some(1.0)), tp(2, 0, 25.0, 25.0, None)], &mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Aggregate(_)));
    }

    #[test]
    fn speedless_group_reported_under_emit_null() {
        let config = PipelineConfig { missing_speed: MissingSpeedPolicy::EmitNull, ..Default::default() };
        let pipeline = PipelineBuilder::new(config).roads(two_roads()).build().unwrap();
        let out = pipeline
            .run(vec![tp(1, 0, 5.0, 5.0, Some(1.0)), tp(2, 0, 25.0, 25.0, None)], &mut NoopObserver)
            .unwrap();
        assert_eq!(out.report.segments_without_speed, 1);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl PipelineObserver for Recorder {
        fn on_index_built(&mut self, roads: usize) {
            self.calls.push(format!("index {roads}"));
        }
        fn on_points_matched(&mut self, matched: usize, unmatched: usize) {
            self.calls.push(format!("matched {matched}/{unmatched}"));
        }
        fn on_segments_built(&mut self, segments: &[AggregatedSegment]) {
            self.calls.push(format!("segments {}", segments.len()));
        }
        fn on_run_end(&mut self, report: &RunReport) {
            self.calls.push(format!("end {}", report.points_in));
        }
    }

    #[test]
    fn observer_hooks_fire_in_phase_order() {
        let pipeline = PipelineBuilder::new(PipelineConfig::default()).roads(two_roads()).build().unwrap();
        let mut rec = Recorder::default();
        pipeline
            .run(vec![tp(1, 0, 5.0, 5.0, Some(1.0)), tp(1, 1, 60.0, 0.0, Some(1.0))], &mut rec)
            .unwrap();
        assert_eq!(rec.calls, ["index 2", "matched 1/1", "segments 2", "end 2"]);
    }

    #[test]
    fn paired_observers_both_see_every_hook() {
        let pipeline = PipelineBuilder::new(PipelineConfig::default()).roads(two_roads()).build().unwrap();
        let mut pair = (Recorder::default(), Recorder::default());
        pipeline.run(vec![tp(1, 0, 5.0, 5.0, Some(1.0))], &mut pair).unwrap();
        assert_eq!(pair.0.calls.len(), 4);
        assert_eq!(pair.0.calls, pair.1.calls);
    }

    #[test]
    fn failed_run_skips_end_hook() {
        let pipeline = PipelineBuilder::new(PipelineConfig::default()).build().unwrap();
        let mut rec = Recorder::default();
        assert!(pipeline.run(vec![tp(1, 0, 0.0, 0.0, None)], &mut rec).is_err());
        assert_eq!(rec.calls, ["index 0", "matched 0/1"]);
    }

    #[test]
    fn match_rate() {
        let report = RunReport { points_in: 4, points_matched: 3, ..Default::default() };
        assert_eq!(report.match_rate(), 0.75);
        assert_eq!(RunReport::default().match_rate(), 0.0);
    }
}

// ── Synthetic end-to-end ──────────────────────────────────────────────────────

#[cfg(test)]
mod synthetic {
    use std::collections::HashSet;

    use cam_core::{MissingSpeedPolicy, PipelineConfig};
    use cam_ingest::{SyntheticDataset, SyntheticParams};
    use cam_spatial::load_geojson_str;

    use crate::{NoopObserver, Pipeline, PipelineBuilder, PipelineOutput};

    fn pipeline_for(ds: &SyntheticDataset, num_threads: Option<usize>) -> Pipeline {
        let (store, report) = load_geojson_str(&ds.roads_geojson()).unwrap();
        assert_eq!(report.loaded, ds.road_count());
        let config = PipelineConfig { missing_speed: MissingSpeedPolicy::EmitNull, num_threads };
        PipelineBuilder::new(config).roads(store).build().unwrap()
    }

    fn run(ds: &SyntheticDataset, num_threads: Option<usize>) -> PipelineOutput {
        pipeline_for(ds, num_threads).run(ds.points.clone(), &mut NoopObserver).unwrap()
    }

    #[test]
    fn identical_input_identical_output() {
        let ds = SyntheticDataset::generate(&SyntheticParams::default());
        assert_eq!(run(&ds, None), run(&ds, None));
    }

    #[test]
    fn thread_count_does_not_change_output() {
        let ds = SyntheticDataset::generate(&SyntheticParams { seed: 9, ..Default::default() });
        assert_eq!(run(&ds, Some(1)), run(&ds, Some(3)));
    }

    #[test]
    fn most_points_land_on_a_road() {
        let ds = SyntheticDataset::generate(&SyntheticParams::default());
        let out = run(&ds, None);
        assert!(out.report.points_matched > 0);
        assert_eq!(out.report.points_matched + out.report.points_unmatched, ds.points.len());
    }

    #[test]
    fn segments_partition_the_points() {
        let ds = SyntheticDataset::generate(&SyntheticParams { stations: 40, ..Default::default() });
        let out = run(&ds, None);

        let total: usize = out.segments.iter().map(|s| s.len()).sum();
        assert_eq!(total, ds.points.len());

        let mut keys = HashSet::new();
        for s in &out.segments {
            assert!(keys.insert((s.station_id, s.way_id.clone())));
            assert_eq!(s.coordinates.len(), s.timestamps.len());
            assert!(s.timestamps.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
