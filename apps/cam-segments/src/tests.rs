//! Command-level tests against files in a temp directory.

#[cfg(test)]
mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    use cam_output::OutputFormat;

    use crate::commands::RunArgs;

    pub const ROADS: &str = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "properties": { "@id": "way/1" },
          "geometry": { "type": "LineString", "coordinates": [[11.0, 48.0], [11.01, 48.01]] } } ] }"#;

    pub fn filtered(speed: &str) -> String {
        format!(
            r#"[ {{ "timestamp": 2000, "stationID": 7, "latitude": 48.005, "longitude": 11.005, "stationType": 5, "speed_m_s": {speed} }},
                 {{ "timestamp": 1000, "stationID": 7, "latitude": 48.004, "longitude": 11.004, "stationType": 5, "speed_m_s": {speed} }} ]"#
        )
    }

    pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn run_args(dir: &Path, speed: &str) -> RunArgs {
        RunArgs {
            roads:               write(dir, "roads.geojson", ROADS),
            cams:                vec![write(dir, "cams.json", &filtered(speed))],
            raw:                 false,
            output:              dir.join("segments.json"),
            format:              OutputFormat::Json,
            config:              None,
            threads:             None,
            allow_missing_speed: false,
        }
    }
}

// ── Config resolution ─────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use cam_core::MissingSpeedPolicy;

    use super::fixtures::{run_args, write};
    use crate::commands::resolve_config;

    #[test]
    fn file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(dir.path(), "1.0");
        args.config = Some(write(
            dir.path(),
            "cfg.json",
            r#"{ "missing_speed": "emit_null", "num_threads": 4 }"#,
        ));

        let from_file = resolve_config(&args).unwrap();
        assert_eq!(from_file.missing_speed, MissingSpeedPolicy::EmitNull);
        assert_eq!(from_file.num_threads, Some(4));

        args.threads = Some(2);
        assert_eq!(resolve_config(&args).unwrap().num_threads, Some(2));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(dir.path(), "1.0");
        args.config = Some(write(dir.path(), "cfg.json", "{}"));
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.missing_speed, MissingSpeedPolicy::Fail);
        assert_eq!(config.num_threads, None);
    }

    #[test]
    fn flag_allows_missing_speed() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(dir.path(), "1.0");
        args.allow_missing_speed = true;
        assert_eq!(resolve_config(&args).unwrap().missing_speed, MissingSpeedPolicy::EmitNull);
    }

    #[test]
    fn unknown_policy_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(dir.path(), "1.0");
        args.config = Some(write(dir.path(), "cfg.json", r#"{ "missing_speed": "guess" }"#));
        assert!(resolve_config(&args).is_err());
    }
}

// ── run ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use serde_json::{Value, json};

    use super::fixtures::run_args;
    use crate::commands::run;

    #[test]
    fn writes_viewer_json() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(dir.path(), "3.0");
        let report = run(&args).unwrap();
        assert_eq!(report.points_matched, 2);
        assert_eq!(report.segments, 1);

        let v: Value = serde_json::from_str(&std::fs::read_to_string(&args.output).unwrap()).unwrap();
        assert_eq!(v[0]["way_id"], json!("way/1"));
        assert_eq!(v[0]["timestamps"], json!([1000, 2000]));
        assert_eq!(v[0]["speed"], json!(3.0));
    }

    #[test]
    fn failed_run_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(dir.path(), "null");
        assert!(run(&args).is_err());
        assert!(!args.output.exists());
    }

    #[test]
    fn missing_speed_allowed_writes_null() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(dir.path(), "null");
        args.allow_missing_speed = true;
        let report = run(&args).unwrap();
        assert_eq!(report.segments_without_speed, 1);

        let v: Value = serde_json::from_str(&std::fs::read_to_string(&args.output).unwrap()).unwrap();
        assert!(v[0]["speed"].is_null());
    }

    #[test]
    fn bad_roads_file_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(dir.path(), "1.0");
        args.roads = dir.path().join("missing.geojson");
        assert!(run(&args).is_err());
        assert!(!args.output.exists());
    }
}

// ── decode and synth ──────────────────────────────────────────────────────────

#[cfg(test)]
mod decode_and_synth {
    use cam_ingest::read_filtered_path;

    use super::fixtures::write;
    use crate::commands::{RunArgs, decode, run, synth};

    #[test]
    fn decode_writes_filtered_records() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write(
            dir.path(),
            "raw.json",
            r#"[ { "timestamp": 1000, "msg": { "header": { "stationID": 7 },
                   "cam": { "camParameters": { "basicContainer": { "stationType": 5,
                       "referencePosition": { "latitude": 480050000, "longitude": 110050000 } },
                     "highFrequencyContainer": { "basicVehicleContainerHighFrequency":
                       { "speed": { "speedValue": 250 } } } } } } },
                 "not a record" ]"#,
        );
        let out = dir.path().join("filtered.json");
        decode(&raw, &out).unwrap();

        let (points, report) = read_filtered_path(&out).unwrap();
        assert_eq!(report.records, 1);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].station_id.0, 7);
        assert_eq!(points[0].speed_mps, Some(2.5));
    }

    #[test]
    fn synth_output_runs_through_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let (roads, cams) = synth(3, 5, &dir.path().join("data")).unwrap();

        let args = RunArgs {
            roads,
            cams: vec![cams],
            raw: false,
            output: dir.path().join("segments.csv"),
            format: cam_output::OutputFormat::Csv,
            config: None,
            threads: Some(2),
            allow_missing_speed: true,
        };
        let report = run(&args).unwrap();
        assert!(report.points_matched > 0);
        assert!(args.output.exists());
    }

    #[test]
    fn truncated_capture_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write(dir.path(), "raw.json", r#"[ { "timestamp": 1000, "msg": {} }, "#);
        let out = dir.path().join("filtered.json");
        assert!(decode(&raw, &out).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn synth_rejects_out_of_range_station_counts() {
        let dir = tempfile::tempdir().unwrap();
        assert!(synth(1, 0, dir.path()).is_err());
        assert!(synth(1, u32::MAX, dir.path()).is_err());
        assert!(!dir.path().join(cam_ingest::synthetic::ROADS_FILE).exists());
    }
}
