//! Bounding-box spatial index over road segments.
//!
//! # Data layout
//!
//! An R-tree (via `rstar`) holds one entry per road: the road's axis-aligned
//! bounding box and its dense [`RoadHandle`].  The handle is the road's
//! position in the slice passed to [`SpatialIndex::build`]; a side vector maps
//! handles back to [`RoadId`]s so the tree itself never stores strings.
//!
//! # Query semantics
//!
//! Queries return every road whose bounding box intersects the query region,
//! boundaries included.  A point query is a zero-area box, so it only finds
//! roads whose box *contains* the point.  Result order follows the tree
//! layout and carries no meaning.

use rstar::{AABB, RTree, RTreeObject};

use cam_core::{BoundingBox, GeoPoint, RoadHandle, RoadId};

use crate::store::RoadSegment;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a road's `[lon, lat]` envelope and handle.
#[derive(Clone, Debug)]
struct RoadEntry {
    envelope: AABB<[f64; 2]>,
    handle:   RoadHandle,
}

impl RTreeObject for RoadEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_aabb(bbox: &BoundingBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min_lon, bbox.min_lat], [bbox.max_lon, bbox.max_lat])
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Read-only after construction; share freely across matcher threads.
pub struct SpatialIndex {
    tree:     RTree<RoadEntry>,
    /// `RoadId` of each handle.  Indexed by `RoadHandle`.
    road_ids: Vec<RoadId>,
}

impl SpatialIndex {
    /// An index with no roads.  Every query returns nothing.
    pub fn empty() -> Self {
        Self::build(&[])
    }

    /// Compute each segment's bounding box and bulk-load the R-tree.
    ///
    /// Segment `i` gets `RoadHandle(i)`.  A segment with an empty polyline
    /// keeps its handle but is not inserted, so it can never be a candidate.
    ///
    /// Time complexity: O(V) for the boxes (V = total vertices) plus
    /// O(N log N) for the bulk load.
    pub fn build(segments: &[RoadSegment]) -> Self {
        let entries: Vec<RoadEntry> = segments
            .iter()
            .enumerate()
            .filter_map(|(i, seg)| {
                seg.bbox().map(|bbox| RoadEntry {
                    envelope: to_aabb(&bbox),
                    handle:   RoadHandle(i as u32),
                })
            })
            .collect();

        Self {
            tree:     RTree::bulk_load(entries),
            road_ids: segments.iter().map(|s| s.id.clone()).collect(),
        }
    }

    /// Number of handles (including any unindexable segments).
    pub fn len(&self) -> usize {
        self.road_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.road_ids.is_empty()
    }

    #[inline]
    pub fn road_id(&self, handle: RoadHandle) -> Option<&RoadId> {
        self.road_ids.get(handle.index())
    }

    /// Handles of roads whose bounding box contains `p`.
    pub fn query_point(&self, p: GeoPoint) -> impl Iterator<Item = RoadHandle> + '_ {
        self.query_bbox(BoundingBox::from_point(p))
    }

    /// Handles of roads whose bounding box intersects `bbox`.
    pub fn query_bbox(&self, bbox: BoundingBox) -> impl Iterator<Item = RoadHandle> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&to_aabb(&bbox))
            .map(|e| e.handle)
    }
}
