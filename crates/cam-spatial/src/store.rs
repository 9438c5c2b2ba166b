//! Road geometry store and builder.
//!
//! The store owns every [`RoadSegment`] for the lifetime of a run.  Segments
//! are kept in load order and addressed by a dense [`RoadHandle`] equal to
//! their position, which is also the handle the [`SpatialIndex`] uses when
//! built from [`GeometryStore::segments`].
//!
//! [`SpatialIndex`]: crate::SpatialIndex

use std::collections::HashMap;

use cam_core::{BoundingBox, GeoPoint, RoadHandle, RoadId};

use crate::LoadError;

// ── RoadSegment ───────────────────────────────────────────────────────────────

/// One road polyline.  Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub id:       RoadId,
    /// Ordered `(lon, lat)` vertices; at least two once in a store.
    pub polyline: Vec<GeoPoint>,
}

impl RoadSegment {
    pub fn new(id: RoadId, polyline: Vec<GeoPoint>) -> Self {
        Self { id, polyline }
    }

    /// Axis-aligned bounds of the polyline.  `None` for an empty polyline.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.polyline)
    }

    /// Planar distance from `p` to the nearest point on the polyline.
    #[inline]
    pub fn distance_to(&self, p: GeoPoint) -> Option<f64> {
        p.planar_distance_to_polyline(&self.polyline)
    }
}

// ── GeometryStore ─────────────────────────────────────────────────────────────

/// Read-only collection of road segments keyed by [`RoadId`].
///
/// Do not construct directly; use [`GeometryStoreBuilder`] or one of the
/// GeoJSON loaders.
#[derive(Debug, Default)]
pub struct GeometryStore {
    segments: Vec<RoadSegment>,
    /// First handle loaded under each id.
    by_id:    HashMap<RoadId, RoadHandle>,
}

impl GeometryStore {
    /// A store with no roads.  Every point matched against it is unmatched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Look up a road by id.  With duplicate ids, the first one loaded wins.
    pub fn get(&self, id: &str) -> Option<&RoadSegment> {
        self.by_id.get(id).map(|h| &self.segments[h.index()])
    }

    pub fn handle_of(&self, id: &str) -> Option<RoadHandle> {
        self.by_id.get(id).copied()
    }

    #[inline]
    pub fn segment(&self, handle: RoadHandle) -> Option<&RoadSegment> {
        self.segments.get(handle.index())
    }

    /// All segments in handle order.
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoadHandle, &RoadSegment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| (RoadHandle(i as u32), s))
    }
}

// ── GeometryStoreBuilder ──────────────────────────────────────────────────────

/// Construct a [`GeometryStore`] road by road, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use cam_core::{GeoPoint, RoadId};
/// use cam_spatial::GeometryStoreBuilder;
///
/// let mut b = GeometryStoreBuilder::new();
/// b.add_road(
///     RoadId::from("way/1"),
///     vec![GeoPoint::new(11.50, 48.10), GeoPoint::new(11.51, 48.11)],
/// )
/// .unwrap();
/// let store = b.build();
/// assert_eq!(store.len(), 1);
/// assert!(store.get("way/1").is_some());
/// ```
#[derive(Default)]
pub struct GeometryStoreBuilder {
    segments:      Vec<RoadSegment>,
    by_id:         HashMap<RoadId, RoadHandle>,
    duplicate_ids: usize,
}

impl GeometryStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of roads.
    pub fn with_capacity(roads: usize) -> Self {
        Self {
            segments:      Vec::with_capacity(roads),
            by_id:         HashMap::with_capacity(roads),
            duplicate_ids: 0,
        }
    }

    /// Validate and add one road, returning its handle.
    ///
    /// Rejects polylines with fewer than two vertices or any non-finite
    /// coordinate.  A repeated id is accepted and gets its own handle; the
    /// repeat is counted in [`duplicate_ids`](Self::duplicate_ids).
    pub fn add_road(&mut self, id: RoadId, polyline: Vec<GeoPoint>) -> Result<RoadHandle, LoadError> {
        if polyline.len() < 2 {
            return Err(LoadError::DegenerateLine { id, positions: polyline.len() });
        }
        if !polyline.iter().all(|p| p.is_finite()) {
            return Err(LoadError::InvalidCoordinate { id });
        }

        let handle = RoadHandle(self.segments.len() as u32);
        if self.by_id.contains_key(&id) {
            self.duplicate_ids += 1;
        } else {
            self.by_id.insert(id.clone(), handle);
        }
        self.segments.push(RoadSegment::new(id, polyline));
        Ok(handle)
    }

    /// Roads added under an id that was already present.
    pub fn duplicate_ids(&self) -> usize {
        self.duplicate_ids
    }

    pub fn build(self) -> GeometryStore {
        GeometryStore {
            segments: self.segments,
            by_id:    self.by_id,
        }
    }
}
