//! Point-to-road matching.

use cam_core::{GeoPoint, RoadHandle, RoadId, TelemetryPoint};

use crate::{GeometryStore, SpatialIndex};

/// The road a point was snapped to.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadMatch {
    pub handle:   RoadHandle,
    pub way_id:   RoadId,
    /// Planar distance (degrees) from the point to the road polyline.
    pub distance: f64,
}

/// Resolves points to roads against a shared, read-only index and store.
///
/// Holds only shared references, so one matcher can be used from many
/// threads at once.  The index must have been built from
/// `store.segments()` so that handles agree.
#[derive(Clone, Copy)]
pub struct PointMatcher<'a> {
    index: &'a SpatialIndex,
    store: &'a GeometryStore,
}

impl<'a> PointMatcher<'a> {
    pub fn new(index: &'a SpatialIndex, store: &'a GeometryStore) -> Self {
        Self { index, store }
    }

    /// Nearest road among those whose bounding box contains `pos`.
    ///
    /// Candidates are scanned in ascending handle order and only a strictly
    /// smaller distance replaces the current best, so on a tie the road
    /// loaded first wins regardless of R-tree layout.  Returns `None` when no
    /// bounding box contains `pos`.
    pub fn nearest(&self, pos: GeoPoint) -> Option<RoadMatch> {
        let mut candidates: Vec<RoadHandle> = self.index.query_point(pos).collect();
        candidates.sort_unstable();

        let mut best: Option<(RoadHandle, f64)> = None;
        for handle in candidates {
            let Some(distance) = self.store.segment(handle).and_then(|s| s.distance_to(pos)) else {
                continue;
            };
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((handle, distance));
            }
        }

        let (handle, distance) = best?;
        let way_id = self.index.road_id(handle)?.clone();
        Some(RoadMatch { handle, way_id, distance })
    }

    /// Road id for one telemetry point, or `None` if it matches nothing.
    #[inline]
    pub fn match_point(&self, point: &TelemetryPoint) -> Option<RoadId> {
        self.nearest(point.position).map(|m| m.way_id)
    }
}

/// Free-function form of [`PointMatcher::match_point`].
pub fn match_point(
    point: &TelemetryPoint,
    index: &SpatialIndex,
    store: &GeometryStore,
) -> Option<RoadId> {
    PointMatcher::new(index, store).match_point(point)
}
