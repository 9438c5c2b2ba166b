//! The flat "filtered" telemetry format.
//!
//! # Format
//!
//! A single JSON array of flat objects, already unit-converted:
//!
//! ```json
//! [
//! {"timestamp": 1720076400123, "stationID": 3051, "latitude": 48.1371, "longitude": 11.5754, "stationType": 5, "speed_m_s": 13.42},
//! {"timestamp": 1720076400223, "stationID": 3051, "latitude": 48.1372, "longitude": 11.5756, "stationType": 5, "speed_m_s": null}
//! ]
//! ```
//!
//! A fractional `timestamp` (`1720076400123.0`) is truncated to whole
//! milliseconds, as in the raw format.
//!
//! Every field may be `null` on disk.  Reading drops records whose
//! timestamp, station id, position, or station type is null; a null speed is
//! kept as "no speed reported".

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use cam_core::{GeoPoint, StationId, StationType, TelemetryPoint};

use crate::stream::for_each_array_element;
use crate::{DecodeError, DecodeReport, IngestResult};

// ── Record ────────────────────────────────────────────────────────────────────

/// One filtered record exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredRecord {
    /// Milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp:    Option<i64>,
    #[serde(rename = "stationID")]
    pub station_id:   Option<u32>,
    /// Degrees.
    pub latitude:     Option<f64>,
    /// Degrees.
    pub longitude:    Option<f64>,
    #[serde(rename = "stationType")]
    pub station_type: Option<u8>,
    #[serde(rename = "speed_m_s")]
    pub speed_mps:    Option<f64>,
}

impl FilteredRecord {
    /// Convert to a telemetry point, failing on the first absent required
    /// field.
    pub fn to_point(&self) -> Result<TelemetryPoint, DecodeError> {
        let timestamp_ms = self.timestamp.ok_or(DecodeError::MissingField("timestamp"))?;
        let station_id = self.station_id.ok_or(DecodeError::MissingField("stationID"))?;
        let lat = self.latitude.ok_or(DecodeError::MissingField("latitude"))?;
        let lon = self.longitude.ok_or(DecodeError::MissingField("longitude"))?;
        let station_type = self.station_type.ok_or(DecodeError::MissingField("stationType"))?;

        Ok(TelemetryPoint {
            timestamp_ms,
            station_id: StationId(station_id),
            position: GeoPoint::new(lon, lat),
            station_type: StationType(station_type),
            speed_mps: self.speed_mps,
        })
    }

    pub fn from_point(p: &TelemetryPoint) -> Self {
        Self {
            timestamp:    Some(p.timestamp_ms),
            station_id:   Some(p.station_id.0),
            latitude:     Some(p.position.lat),
            longitude:    Some(p.position.lon),
            station_type: Some(p.station_type.0),
            speed_mps:    p.speed_mps,
        }
    }
}

/// Integer milliseconds from a JSON number; a fractional value is truncated.
pub(crate) fn number_to_ms(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
    let Some(n) = Option::<Number>::deserialize(de)? else {
        return Ok(None);
    };
    number_to_ms(&n)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("timestamp {n} is not a millisecond count")))
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Read a filtered telemetry file.
pub fn read_filtered_path(path: &Path) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    let file = File::open(path)?;
    let out = read_filtered_impl(BufReader::new(file))?;
    out.1.log_summary(&path.display().to_string());
    Ok(out)
}

/// Like [`read_filtered_path`] but accepts any `Read` source.
pub fn read_filtered_reader<R: Read>(reader: R) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    let out = read_filtered_impl(reader)?;
    out.1.log_summary("<reader>");
    Ok(out)
}

fn read_filtered_impl<R: Read>(reader: R) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    let mut points = Vec::new();
    let mut report = DecodeReport::default();

    for_each_array_element(reader, |index, value| match decode_filtered_value(value) {
        Ok(p) => {
            points.push(p);
            report.record_decoded();
        }
        Err(e) => report.record_skipped(index, &e),
    })?;

    Ok((points, report))
}

fn decode_filtered_value(value: Value) -> Result<TelemetryPoint, DecodeError> {
    serde_json::from_value::<FilteredRecord>(value)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?
        .to_point()
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Streams filtered records into a JSON array, one record per line.
///
/// Call [`finish`](Self::finish) to close the array; dropping the writer
/// without it leaves an unterminated document.
pub struct FilteredWriter<W: Write> {
    out:      W,
    written:  usize,
    finished: bool,
}

impl FilteredWriter<BufWriter<File>> {
    /// Create (or truncate) `path`.
    pub fn create(path: &Path) -> IngestResult<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> FilteredWriter<W> {
    pub fn new(mut out: W) -> IngestResult<Self> {
        out.write_all(b"[\n")?;
        Ok(Self { out, written: 0, finished: false })
    }

    pub fn write_record(&mut self, record: &FilteredRecord) -> IngestResult<()> {
        if self.written > 0 {
            self.out.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut self.out, record)?;
        self.written += 1;
        Ok(())
    }

    pub fn write_point(&mut self, point: &TelemetryPoint) -> IngestResult<()> {
        self.write_record(&FilteredRecord::from_point(point))
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Close the array and flush.  Idempotent.
    pub fn finish(&mut self) -> IngestResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.written > 0 {
            self.out.write_all(b"\n")?;
        }
        self.out.write_all(b"]\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Write `points` to `path` as a complete filtered file.
pub fn write_filtered_path(path: &Path, points: &[TelemetryPoint]) -> IngestResult<()> {
    let mut w = FilteredWriter::create(path)?;
    for p in points {
        w.write_point(p)?;
    }
    w.finish()
}
