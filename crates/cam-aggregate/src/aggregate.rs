//! `(station, road)` grouping and per-group reduction.
//!
//! # Algorithm
//!
//! 1. One pass over the input assigns each point to the group for its
//!    [`GroupKey`].  Unmatched points form their own per-station group with
//!    `way_id = None`.  Groups are numbered in order of first appearance.
//! 2. Each group is stable-sorted by timestamp, so equal timestamps keep
//!    their input order.
//! 3. The group's mean speed is taken over points that reported one.
//! 4. One [`AggregatedSegment`] is emitted per group, in group-number order.
//!
//! The grouping map and the group vectors are local to one call; nothing
//! survives it except the returned segments.

use std::fmt;

use tracing::{debug, info};

use cam_core::{
    AggregatedSegment, MatchedPoint, MissingSpeedPolicy, RoadId, StationId, TelemetryPoint,
};

use crate::{AggregateError, AggregateResult};

#[cfg(feature = "fx-hash")]
type GroupMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type GroupMap<K, V> = std::collections::HashMap<K, V>;

// ── GroupKey ──────────────────────────────────────────────────────────────────

/// Identity of one output segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub station_id: StationId,
    pub way_id:     Option<RoadId>,
}

impl GroupKey {
    pub fn of(point: &MatchedPoint) -> Self {
        Self { station_id: point.point.station_id, way_id: point.way_id.clone() }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.way_id {
            Some(way) => write!(f, "{} on {}", self.station_id, way),
            None => write!(f, "{} unmatched", self.station_id),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Partition `points` by `(station, road)` and reduce each group to a segment.
///
/// Every input point lands in exactly one segment.  Segment order follows
/// the first appearance of each group in `points`; callers should not depend
/// on it.
///
/// # Errors
///
/// With [`MissingSpeedPolicy::Fail`], returns
/// [`AggregateError::NoSpeedSamples`] naming every group that has no speed
/// sample, and no segments.  With [`MissingSpeedPolicy::EmitNull`] such
/// groups get `avg_speed_mps = None` and the call cannot fail.
pub fn aggregate(
    points: &[MatchedPoint],
    policy: MissingSpeedPolicy,
) -> AggregateResult<Vec<AggregatedSegment>> {
    let groups = group_points(points);
    debug!(points = points.len(), groups = groups.len(), "points grouped");

    let mut segments = Vec::with_capacity(groups.len());
    let mut without_speed = Vec::new();

    for (key, mut members) in groups {
        // `sort_by_key` is stable.
        members.sort_by_key(|p| p.timestamp_ms);

        let avg_speed_mps = mean_speed(&members);
        if avg_speed_mps.is_none() && policy == MissingSpeedPolicy::Fail {
            without_speed.push(key);
            continue;
        }
        segments.push(reduce(key, &members, avg_speed_mps));
    }

    if !without_speed.is_empty() {
        return Err(AggregateError::NoSpeedSamples { groups: without_speed });
    }

    info!(segments = segments.len(), "segments aggregated");
    Ok(segments)
}

/// Mean of the reported speeds, or `None` if no point reported one.
pub fn mean_speed(points: &[&TelemetryPoint]) -> Option<f64> {
    let (sum, n) = points
        .iter()
        .filter_map(|p| p.speed_mps)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Groups in first-appearance order, members in input order.
fn group_points(points: &[MatchedPoint]) -> Vec<(GroupKey, Vec<&TelemetryPoint>)> {
    let mut slot_of: GroupMap<GroupKey, usize> = GroupMap::default();
    let mut groups: Vec<(GroupKey, Vec<&TelemetryPoint>)> = Vec::new();

    for mp in points {
        let slot = *slot_of.entry(GroupKey::of(mp)).or_insert_with_key(|key| {
            groups.push((key.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(&mp.point);
    }
    groups
}

/// Build the segment for one sorted, non-empty group.
fn reduce(key: GroupKey, members: &[&TelemetryPoint], avg_speed_mps: Option<f64>) -> AggregatedSegment {
    AggregatedSegment {
        station_id: key.station_id,
        station_type: members[0].station_type,
        way_id: key.way_id,
        avg_speed_mps,
        coordinates: members.iter().map(|p| p.position).collect(),
        timestamps: members.iter().map(|p| p.timestamp_ms).collect(),
    }
}
