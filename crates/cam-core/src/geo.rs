//! Geographic coordinate type and planar geometry helpers.
//!
//! Map matching works in raw lon/lat degrees treated as a flat plane.  This
//! is not a metric distance, but for the ranking question "which candidate
//! line is closest" it is what the road-snapping stage has always used and
//! keeps results reproducible.  `GeoPoint` uses `f64` because CAM positions
//! carry 1e-7° resolution, which single precision cannot hold.

/// A WGS-84 coordinate in GeoJSON axis order: `lon` is x, `lat` is y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Euclidean distance in degree space.
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        (self.lon - other.lon).hypot(self.lat - other.lat)
    }

    /// Euclidean distance in degree space from `self` to the closed segment
    /// `a`–`b`.
    ///
    /// The projection parameter is clamped to `[0, 1]`, so points beyond an
    /// endpoint measure to that endpoint.  A zero-length segment degrades to
    /// point distance.
    pub fn planar_distance_to_segment(self, a: GeoPoint, b: GeoPoint) -> f64 {
        let dx = b.lon - a.lon;
        let dy = b.lat - a.lat;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return self.planar_distance(a);
        }

        let t = ((self.lon - a.lon) * dx + (self.lat - a.lat) * dy) / len2;
        let t = t.clamp(0.0, 1.0);
        let proj = GeoPoint::new(a.lon + t * dx, a.lat + t * dy);
        self.planar_distance(proj)
    }

    /// Minimum planar distance from `self` to any segment of `polyline`.
    ///
    /// A single-vertex polyline measures to that vertex.  Returns `None` for
    /// an empty polyline.
    pub fn planar_distance_to_polyline(self, polyline: &[GeoPoint]) -> Option<f64> {
        match polyline {
            [] => None,
            [only] => Some(self.planar_distance(*only)),
            _ => polyline
                .windows(2)
                .map(|w| self.planar_distance_to_segment(w[0], w[1]))
                .reduce(f64::min),
        }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in lon/lat degrees.  Boundaries are closed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    /// Zero-area box at `p`.
    #[inline]
    pub fn from_point(p: GeoPoint) -> Self {
        Self::new(p.lon, p.lat, p.lon, p.lat)
    }

    /// Smallest box enclosing every point.  `None` if `points` is empty.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::from_point(*first);
        for p in rest {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lon >= self.min_lon
            && p.lon <= self.max_lon
            && p.lat >= self.min_lat
            && p.lat <= self.max_lat
    }

    /// `true` if the two boxes share at least one point (touching counts).
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }
}
