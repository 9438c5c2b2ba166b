//! Telemetry records produced by the CAM decoder and consumed by the matcher.

use std::fmt;

use crate::{GeoPoint, RoadId, StationId};

// ── StationType ───────────────────────────────────────────────────────────────

/// ETSI ITS station type code (`basicContainer.stationType`).
///
/// Kept as the raw integer so unknown future codes survive a round trip;
/// [`label`](Self::label) names the codes defined by EN 302 637-2.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct StationType(pub u8);

impl StationType {
    pub const PASSENGER_CAR: StationType = StationType(5);
    pub const BUS: StationType = StationType(6);

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "unknown",
            1 => "pedestrian",
            2 => "cyclist",
            3 => "moped",
            4 => "motorcycle",
            5 => "passengerCar",
            6 => "bus",
            7 => "lightTruck",
            8 => "heavyTruck",
            9 => "trailer",
            10 => "specialVehicles",
            11 => "tram",
            15 => "roadSideUnit",
            _ => "reserved",
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

// ── TelemetryPoint ────────────────────────────────────────────────────────────

/// One decoded CAM sample, already unit-converted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelemetryPoint {
    /// Milliseconds since the Unix epoch, as recorded by the capture.
    pub timestamp_ms: i64,
    pub station_id:   StationId,
    pub position:     GeoPoint,
    pub station_type: StationType,
    /// Metres per second.  `None` when the message carried no speed; never
    /// substituted with zero.
    pub speed_mps:    Option<f64>,
}

// ── MatchedPoint ──────────────────────────────────────────────────────────────

/// A telemetry point plus the road it was snapped to.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedPoint {
    pub point:  TelemetryPoint,
    /// `None` when no indexed road's bounding box contains the point.
    pub way_id: Option<RoadId>,
}

impl MatchedPoint {
    pub fn new(point: TelemetryPoint, way_id: Option<RoadId>) -> Self {
        Self { point, way_id }
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.way_id.is_some()
    }
}
