//! Raw CAM capture decoding.
//!
//! # Input
//!
//! A JSON array of captured messages.  Only these paths are read; everything
//! else in a record is ignored:
//!
//! | Path                                                                                  | Unit                 |
//! |---------------------------------------------------------------------------------------|----------------------|
//! | `timestamp`                                                                           | ms since Unix epoch  |
//! | `msg.header.stationID`                                                                | –                    |
//! | `msg.cam.camParameters.basicContainer.stationType`                                    | ETSI code            |
//! | `msg.cam.camParameters.basicContainer.referencePosition.latitude`                     | 1e-7 degree          |
//! | `msg.cam.camParameters.basicContainer.referencePosition.longitude`                    | 1e-7 degree          |
//! | `msg.cam.camParameters.highFrequencyContainer.basicVehicleContainerHighFrequency.speed.speedValue` | 0.01 m/s |
//!
//! Every level is optional.  An absent level, an explicit `null`, or an ETSI
//! "unavailable" value all read as `None`.
//!
//! The "unavailable" handling differs from a plain unit conversion: a
//! decoder that only scales would turn `speedValue = 16383` into 163.83 m/s
//! and average it into the segment speed, and would place unavailable
//! positions at latitude 90.0000001 / longitude 180.0000001.  Here those
//! samples carry no speed or are skipped for lack of a position, so filtered
//! files from the two decoders can differ on exactly those records.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Number, Value};

use cam_core::TelemetryPoint;

use crate::filtered::{FilteredRecord, FilteredWriter, number_to_ms};
use crate::stream::for_each_array_element;
use crate::{DecodeError, DecodeReport, IngestResult};

/// `latitude` value meaning "unavailable".
pub const LATITUDE_UNAVAILABLE: i64 = 900_000_001;
/// `longitude` value meaning "unavailable".
pub const LONGITUDE_UNAVAILABLE: i64 = 1_800_000_001;
/// `speedValue` value meaning "unavailable".
pub const SPEED_UNAVAILABLE: i64 = 16_383;

const DEGREES_PER_UNIT: f64 = 1e-7;
const MPS_PER_UNIT: f64 = 1e-2;

// ── Raw message shape ─────────────────────────────────────────────────────────

/// One captured CAM.  Only the fields the pipeline needs are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCamRecord {
    #[serde(default)]
    pub timestamp: Option<Number>,
    #[serde(default)]
    pub msg:       Option<RawMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub header: Option<RawHeader>,
    #[serde(default)]
    pub cam:    Option<RawCam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHeader {
    #[serde(default, rename = "stationID")]
    pub station_id: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCam {
    #[serde(default, rename = "camParameters")]
    pub cam_parameters: Option<RawCamParameters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCamParameters {
    #[serde(default, rename = "basicContainer")]
    pub basic_container:          Option<RawBasicContainer>,
    #[serde(default, rename = "highFrequencyContainer")]
    pub high_frequency_container: Option<RawHighFrequencyContainer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBasicContainer {
    #[serde(default, rename = "stationType")]
    pub station_type:       Option<u8>,
    #[serde(default, rename = "referencePosition")]
    pub reference_position: Option<RawReferencePosition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReferencePosition {
    #[serde(default)]
    pub latitude:  Option<i64>,
    #[serde(default)]
    pub longitude: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHighFrequencyContainer {
    #[serde(default, rename = "basicVehicleContainerHighFrequency")]
    pub basic_vehicle: Option<RawBasicVehicleHighFrequency>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBasicVehicleHighFrequency {
    #[serde(default)]
    pub speed: Option<RawSpeed>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpeed {
    #[serde(default, rename = "speedValue")]
    pub speed_value: Option<i64>,
}

// ── Accessors ─────────────────────────────────────────────────────────────────

impl RawCamRecord {
    fn parameters(&self) -> Option<&RawCamParameters> {
        self.msg.as_ref()?.cam.as_ref()?.cam_parameters.as_ref()
    }

    fn basic_container(&self) -> Option<&RawBasicContainer> {
        self.parameters()?.basic_container.as_ref()
    }

    fn reference_position(&self) -> Option<&RawReferencePosition> {
        self.basic_container()?.reference_position.as_ref()
    }

    /// Capture time in ms.  Fractional timestamps are truncated.
    pub fn timestamp_ms(&self) -> Option<i64> {
        number_to_ms(self.timestamp.as_ref()?)
    }

    pub fn station_id(&self) -> Option<u32> {
        self.msg.as_ref()?.header.as_ref()?.station_id
    }

    pub fn station_type(&self) -> Option<u8> {
        self.basic_container()?.station_type
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> Option<f64> {
        let raw = self.reference_position()?.latitude?;
        (raw != LATITUDE_UNAVAILABLE).then(|| raw as f64 * DEGREES_PER_UNIT)
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> Option<f64> {
        let raw = self.reference_position()?.longitude?;
        (raw != LONGITUDE_UNAVAILABLE).then(|| raw as f64 * DEGREES_PER_UNIT)
    }

    /// Speed in m/s.
    pub fn speed_mps(&self) -> Option<f64> {
        let raw = self
            .parameters()?
            .high_frequency_container
            .as_ref()?
            .basic_vehicle
            .as_ref()?
            .speed
            .as_ref()?
            .speed_value?;
        (raw != SPEED_UNAVAILABLE).then(|| raw as f64 * MPS_PER_UNIT)
    }

    /// Flatten into the filtered format, keeping absent fields as `None`.
    pub fn to_filtered(&self) -> FilteredRecord {
        FilteredRecord {
            timestamp:    self.timestamp_ms(),
            station_id:   self.station_id(),
            latitude:     self.latitude(),
            longitude:    self.longitude(),
            station_type: self.station_type(),
            speed_mps:    self.speed_mps(),
        }
    }
}

fn parse_raw(value: Value) -> Result<RawCamRecord, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))
}

/// Decode one raw record straight into a telemetry point.
pub fn decode_raw_value(value: Value) -> Result<TelemetryPoint, DecodeError> {
    parse_raw(value)?.to_filtered().to_point()
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Read a raw CAM capture file into telemetry points.
pub fn read_raw_path(path: &Path) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    let file = File::open(path)?;
    let out = read_raw_impl(BufReader::new(file))?;
    out.1.log_summary(&path.display().to_string());
    Ok(out)
}

/// Like [`read_raw_path`] but accepts any `Read` source.
pub fn read_raw_reader<R: Read>(reader: R) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    let out = read_raw_impl(reader)?;
    out.1.log_summary("<reader>");
    Ok(out)
}

fn read_raw_impl<R: Read>(reader: R) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    let mut points = Vec::new();
    let mut report = DecodeReport::default();

    for_each_array_element(reader, |index, value| match decode_raw_value(value) {
        Ok(p) => {
            points.push(p);
            report.record_decoded();
        }
        Err(e) => report.record_skipped(index, &e),
    })?;

    Ok((points, report))
}

/// Convert a raw capture into a filtered file without holding either in
/// memory.
///
/// Every schema-valid record is written, including those with absent fields
/// (as `null`); only malformed records are dropped.  In the returned report
/// `decoded` counts records that would also survive [`read_filtered_path`].
///
/// [`read_filtered_path`]: crate::read_filtered_path
pub fn convert_raw_to_filtered<R: Read, W: Write>(
    reader: R,
    writer: &mut FilteredWriter<W>,
) -> IngestResult<DecodeReport> {
    let mut report = DecodeReport::default();
    let mut write_error = None;

    for_each_array_element(reader, |index, value| {
        if write_error.is_some() {
            return;
        }
        let record = match parse_raw(value) {
            Ok(raw) => raw.to_filtered(),
            Err(e) => {
                report.record_skipped(index, &e);
                return;
            }
        };
        match record.to_point() {
            Ok(_) => report.record_decoded(),
            Err(e) => report.record_skipped(index, &e),
        }
        if let Err(e) = writer.write_record(&record) {
            write_error = Some(e);
        }
    })?;

    if let Some(e) = write_error {
        return Err(e);
    }
    writer.finish()?;
    report.log_summary("raw conversion");
    Ok(report)
}
