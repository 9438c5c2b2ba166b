//! Row shapes written by the output backends.

use std::fmt::Write as _;

use serde::Serialize;

use cam_core::AggregatedSegment;

/// One segment in the JSON layout consumed by the map viewer.
///
/// ```json
/// { "stationID": 3051, "stationType": 5, "way_id": "way/4217", "speed": 12.7,
///   "coordinates": [[11.5754, 48.1371], [11.5756, 48.1372]],
///   "timestamps": [1720076400123, 1720076400223] }
/// ```
#[derive(Debug, Serialize)]
pub struct SegmentRecord<'a> {
    #[serde(rename = "stationID")]
    pub station_id:   u32,
    #[serde(rename = "stationType")]
    pub station_type: u8,
    pub way_id:       Option<&'a str>,
    /// Mean speed in m/s; `null` when the group had no speed sample.
    pub speed:        Option<f64>,
    /// `[lon, lat]` pairs in timestamp order.
    pub coordinates:  Vec<[f64; 2]>,
    pub timestamps:   &'a [i64],
}

impl<'a> SegmentRecord<'a> {
    pub fn from_segment(s: &'a AggregatedSegment) -> Self {
        Self {
            station_id:   s.station_id.0,
            station_type: s.station_type.0,
            way_id:       s.way_id.as_ref().map(|w| w.as_str()),
            speed:        s.avg_speed_mps,
            coordinates:  s.coordinates.iter().map(|p| [p.lon, p.lat]).collect(),
            timestamps:   &s.timestamps,
        }
    }
}

/// Flat per-segment summary used by the tabular backends.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummaryRow {
    pub station_id:         u32,
    pub station_type:       u8,
    pub way_id:             Option<String>,
    pub avg_speed_mps:      Option<f64>,
    pub point_count:        usize,
    pub first_timestamp_ms: Option<i64>,
    pub last_timestamp_ms:  Option<i64>,
    /// Great-circle length of the sample polyline.
    pub length_m:           f64,
}

impl SegmentSummaryRow {
    pub fn from_segment(s: &AggregatedSegment) -> Self {
        Self {
            station_id:         s.station_id.0,
            station_type:       s.station_type.0,
            way_id:             s.way_id.as_ref().map(|w| w.to_string()),
            avg_speed_mps:      s.avg_speed_mps,
            point_count:        s.len(),
            first_timestamp_ms: s.timestamps.first().copied(),
            last_timestamp_ms:  s.timestamps.last().copied(),
            length_m:           s.path_length_m(),
        }
    }
}

/// Well-known-text geometry of a segment's samples: `POINT` for a single
/// sample, `LINESTRING` otherwise.
pub fn segment_wkt(s: &AggregatedSegment) -> String {
    match s.coordinates.as_slice() {
        [] => "LINESTRING EMPTY".to_string(),
        [p] => format!("POINT({} {})", p.lon, p.lat),
        coords => {
            let mut wkt = String::from("LINESTRING(");
            for (i, p) in coords.iter().enumerate() {
                if i > 0 {
                    wkt.push_str(", ");
                }
                let _ = write!(wkt, "{} {}", p.lon, p.lat);
            }
            wkt.push(')');
            wkt
        }
    }
}
