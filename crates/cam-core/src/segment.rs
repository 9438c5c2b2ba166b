//! The terminal artifact of a pipeline run.

use crate::{GeoPoint, RoadId, StationId, StationType};

/// One station's pass over one road: an ordered polyline of its samples and
/// their mean speed.
///
/// `coordinates[i]` and `timestamps[i]` come from the same source sample, and
/// `timestamps` is non-decreasing.  Built only by the aggregator; treat as
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedSegment {
    pub station_id:    StationId,
    /// Station type of the earliest sample in the group.
    pub station_type:  StationType,
    pub way_id:        Option<RoadId>,
    /// Mean of the group's reported speeds (m/s).  `None` only when the run
    /// allowed groups without any speed sample.
    pub avg_speed_mps: Option<f64>,
    pub coordinates:   Vec<GeoPoint>,
    pub timestamps:    Vec<i64>,
}

impl AggregatedSegment {
    /// Number of samples in the segment.
    #[inline]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Time between the first and last sample.
    pub fn duration_ms(&self) -> i64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }

    /// Great-circle length of the sample polyline in metres.
    pub fn path_length_m(&self) -> f64 {
        self.coordinates
            .windows(2)
            .map(|w| w[0].distance_m(w[1]))
            .sum()
    }
}
