//! Seeded synthetic road network and CAM traces.
//!
//! Generates a square grid of slightly wavy streets and a set of stations
//! driving along them with positional noise.  The same [`SyntheticParams`]
//! always yield the same dataset, which makes it suitable for end-to-end
//! tests and for trying the pipeline without a real capture.
//!
//! Streets are wavy on purpose: a perfectly straight axis-aligned street has
//! a zero-area bounding box, and a noisy sample would almost never fall
//! inside it.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use cam_core::{GeoPoint, StationId, StationType, TelemetryPoint};

use crate::{IngestResult, write_filtered_path};

/// File names used by [`SyntheticDataset::write_to_dir`].
pub const ROADS_FILE: &str = "roads.geojson";
pub const TELEMETRY_FILE: &str = "cams_filtered.json";

/// Station ids are `FIRST_STATION_ID + n` for station `n`.
pub const FIRST_STATION_ID: u32 = 1_000;
/// Most stations whose ids fit in a `u32`.
pub const MAX_STATIONS: u32 = u32::MAX - FIRST_STATION_ID + 1;

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SyntheticParams {
    pub seed:                u64,
    /// Streets per direction; the grid has `2 * grid_size` roads.
    pub grid_size:           usize,
    pub vertices_per_street: usize,
    /// Distance between parallel streets, in degrees.
    pub spacing_deg:         f64,
    /// Maximum perpendicular offset of a street vertex, in degrees.
    pub wiggle_deg:          f64,
    /// South-west corner of the grid.
    pub origin:              GeoPoint,
    /// Capped at [`MAX_STATIONS`].
    pub stations:            u32,
    pub samples_per_station: usize,
    pub sample_interval_ms:  i64,
    pub start_ms:            i64,
    /// Maximum positional noise per sample, in degrees.
    pub noise_deg:           f64,
    /// Probability that a sample carries no speed.
    pub missing_speed_prob:  f64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            seed:                42,
            grid_size:           6,
            vertices_per_street: 8,
            spacing_deg:         0.002,
            wiggle_deg:          0.000_2,
            origin:              GeoPoint::new(11.56, 48.13),
            stations:            20,
            samples_per_station: 30,
            sample_interval_ms:  100,
            start_ms:            1_720_076_400_000,
            noise_deg:           0.000_05,
            missing_speed_prob:  0.1,
        }
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

pub struct SyntheticDataset {
    /// Road network as GeoJSON `LineString` features with `@id` properties.
    pub roads:  FeatureCollection,
    /// Telemetry in shuffled order.
    pub points: Vec<TelemetryPoint>,
}

impl SyntheticDataset {
    pub fn generate(params: &SyntheticParams) -> Self {
        let mut rng = SmallRng::seed_from_u64(params.seed);

        let streets = grid_streets(params, &mut rng);

        let stations = params.stations.min(MAX_STATIONS);
        let mut points = Vec::with_capacity(stations as usize * params.samples_per_station);
        if !streets.is_empty() {
            for s in 0..stations {
                station_trace(params, s, &streets, &mut rng, &mut points);
            }
        }
        points.shuffle(&mut rng);

        let features = streets
            .iter()
            .enumerate()
            .map(|(i, line)| street_feature(i, line))
            .collect();
        let roads = FeatureCollection { bbox: None, features, foreign_members: None };

        Self { roads, points }
    }

    pub fn road_count(&self) -> usize {
        self.roads.features.len()
    }

    /// Serialize the road network as a GeoJSON string.
    pub fn roads_geojson(&self) -> String {
        self.roads.to_string()
    }

    /// Write [`ROADS_FILE`] and [`TELEMETRY_FILE`] into `dir` and return
    /// their paths.
    pub fn write_to_dir(&self, dir: &Path) -> IngestResult<(PathBuf, PathBuf)> {
        let roads_path = dir.join(ROADS_FILE);
        serde_json::to_writer(BufWriter::new(File::create(&roads_path)?), &self.roads)?;

        let telemetry_path = dir.join(TELEMETRY_FILE);
        write_filtered_path(&telemetry_path, &self.points)?;

        Ok((roads_path, telemetry_path))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn jitter(rng: &mut SmallRng, amplitude: f64) -> f64 {
    if amplitude > 0.0 { rng.gen_range(-amplitude..amplitude) } else { 0.0 }
}

/// Horizontal streets first (south to north), then vertical (west to east).
fn grid_streets(params: &SyntheticParams, rng: &mut SmallRng) -> Vec<Vec<GeoPoint>> {
    let n = params.grid_size;
    let vertices = params.vertices_per_street.max(2);
    let span = n.saturating_sub(1).max(1) as f64 * params.spacing_deg;
    let step = span / (vertices - 1) as f64;
    let o = params.origin;

    let mut streets = Vec::with_capacity(2 * n);
    for i in 0..n {
        let lat = o.lat + i as f64 * params.spacing_deg;
        streets.push(
            (0..vertices)
                .map(|k| GeoPoint::new(o.lon + k as f64 * step, lat + jitter(rng, params.wiggle_deg)))
                .collect(),
        );
    }
    for j in 0..n {
        let lon = o.lon + j as f64 * params.spacing_deg;
        streets.push(
            (0..vertices)
                .map(|k| GeoPoint::new(lon + jitter(rng, params.wiggle_deg), o.lat + k as f64 * step))
                .collect(),
        );
    }
    streets
}

fn street_feature(index: usize, line: &[GeoPoint]) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("@id".into(), JsonValue::from(format!("way/{}", 1000 + index)));
    properties.insert("highway".into(), JsonValue::from("residential"));

    let coords = line.iter().map(|p| vec![p.lon, p.lat]).collect();
    Feature {
        bbox:            None,
        geometry:        Some(Geometry::new(Value::LineString(coords))),
        id:              None,
        properties:      Some(properties),
        foreign_members: None,
    }
}

/// Point at fractional vertex position `t` along `line` (`0 ≤ t ≤ len - 1`).
fn along(line: &[GeoPoint], t: f64) -> GeoPoint {
    let k = (t.floor().max(0.0) as usize).min(line.len() - 2);
    let f = (t - k as f64).clamp(0.0, 1.0);
    let (a, b) = (line[k], line[k + 1]);
    GeoPoint::new(a.lon + f * (b.lon - a.lon), a.lat + f * (b.lat - a.lat))
}

fn station_trace(
    params: &SyntheticParams,
    station: u32,
    streets: &[Vec<GeoPoint>],
    rng: &mut SmallRng,
    out: &mut Vec<TelemetryPoint>,
) {
    let street = &streets[rng.gen_range(0..streets.len())];
    let station_type = if rng.gen_bool(0.2) { StationType::BUS } else { StationType::PASSENGER_CAR };
    let last = (street.len() - 1) as f64;
    let t0 = rng.gen_range(0.0..last * 0.5);
    let step = (last - t0) / params.samples_per_station.max(1) as f64;
    let cruise = rng.gen_range(5.0..20.0);
    let offset_ms = station as i64 * 37;

    for k in 0..params.samples_per_station {
        let base = along(street, t0 + k as f64 * step);
        let position = GeoPoint::new(
            base.lon + jitter(rng, params.noise_deg),
            base.lat + jitter(rng, params.noise_deg),
        );
        let speed_mps = if rng.gen_bool(params.missing_speed_prob.clamp(0.0, 1.0)) {
            None
        } else {
            let v: f64 = cruise + jitter(rng, 1.0);
            Some((v.max(0.0) * 100.0).round() / 100.0)
        };
        out.push(TelemetryPoint {
            timestamp_ms: params.start_ms + offset_ms + k as i64 * params.sample_interval_ms,
            station_id: StationId(FIRST_STATION_ID + station),
            position,
            station_type,
            speed_mps,
        });
    }
}
