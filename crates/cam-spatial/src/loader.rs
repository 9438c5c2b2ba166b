//! GeoJSON road loader.
//!
//! # Input
//!
//! A `FeatureCollection` whose road features look like:
//!
//! ```json
//! { "type": "Feature",
//!   "properties": { "@id": "way/4217", "highway": "residential" },
//!   "geometry": { "type": "LineString", "coordinates": [[11.57, 48.13], [11.58, 48.14]] } }
//! ```
//!
//! The road id is taken from `properties["@id"]`, then `properties["id"]`,
//! then the feature-level `id`.  String ids are used verbatim; numeric ids
//! are rendered in decimal.
//!
//! # What is skipped
//!
//! Features without a usable id, without geometry, with any geometry other
//! than `LineString`, with fewer than two positions, or with a non-finite
//! coordinate.  A feature the GeoJSON parser rejects on its own (an unknown
//! geometry type, a one-ordinate position) is skipped as
//! [`LoadError::Malformed`].  Each skip is logged at `debug` and recorded in
//! the [`LoadReport`]; it never aborts the load.
//!
//! Only the document itself can be fatal: unreadable, not JSON, or not a
//! `FeatureCollection` with a `features` array.  The top level is parsed with
//! `serde_json` and each feature is converted separately, so one bad feature
//! cannot take the others down with it.

use std::borrow::Borrow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geojson::feature::Id;
use geojson::{Feature, JsonValue, Value};
use tracing::{debug, info, warn};

use cam_core::{GeoPoint, RoadId};

use crate::store::{GeometryStore, GeometryStoreBuilder};
use crate::{LoadError, SpatialError, SpatialResult};

// ── Report ────────────────────────────────────────────────────────────────────

/// A feature left out of the store, with its position in the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    pub index: usize,
    pub error: LoadError,
}

/// Summary of one road load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Features in the collection.
    pub features:      usize,
    /// Roads that made it into the store.
    pub loaded:        usize,
    /// Loaded roads whose id was already taken by an earlier road.
    pub duplicate_ids: usize,
    pub skipped:       Vec<SkippedFeature>,
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Load roads from a GeoJSON file.
///
/// # Errors
///
/// [`SpatialError::Io`] if the file cannot be opened,
/// [`SpatialError::GeoJson`] if it is not valid GeoJSON, and
/// [`SpatialError::NotFeatureCollection`] for any other top-level object.
pub fn load_geojson_path(path: &Path) -> SpatialResult<(GeometryStore, LoadReport)> {
    let file = File::open(path)?;
    load_geojson_reader(BufReader::new(file))
}

/// Like [`load_geojson_path`] but accepts any `Read` source.
pub fn load_geojson_reader<R: Read>(reader: R) -> SpatialResult<(GeometryStore, LoadReport)> {
    let doc: JsonValue =
        serde_json::from_reader(reader).map_err(|e| SpatialError::GeoJson(e.to_string()))?;
    load_document(doc)
}

/// Like [`load_geojson_path`] but parses an in-memory string.
pub fn load_geojson_str(s: &str) -> SpatialResult<(GeometryStore, LoadReport)> {
    let doc: JsonValue = serde_json::from_str(s).map_err(|e| SpatialError::GeoJson(e.to_string()))?;
    load_document(doc)
}

/// Build a store from already-parsed features.
pub fn load_features(features: &[Feature]) -> (GeometryStore, LoadReport) {
    build_store(features.len(), features.iter().map(Ok::<_, LoadError>))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Check the top level, then convert each feature on its own.
fn load_document(mut doc: JsonValue) -> SpatialResult<(GeometryStore, LoadReport)> {
    let kind = doc.get("type").and_then(JsonValue::as_str).unwrap_or_default();
    match kind {
        "FeatureCollection" => {}
        "Feature" => return Err(SpatialError::NotFeatureCollection("Feature")),
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon" | "MultiPolygon"
        | "GeometryCollection" => return Err(SpatialError::NotFeatureCollection("Geometry")),
        "" => return Err(SpatialError::GeoJson("top-level object has no \"type\"".into())),
        other => return Err(SpatialError::GeoJson(format!("unknown GeoJSON type `{other}`"))),
    }

    let Some(JsonValue::Array(features)) = doc.get_mut("features").map(JsonValue::take) else {
        return Err(SpatialError::GeoJson("FeatureCollection has no \"features\" array".into()));
    };

    let count = features.len();
    let parsed = features.into_iter().map(|value| {
        Feature::from_json_value(value).map_err(|e| LoadError::Malformed(e.to_string()))
    });
    Ok(build_store(count, parsed))
}

fn build_store<I, F>(count: usize, features: I) -> (GeometryStore, LoadReport)
where
    I: IntoIterator<Item = Result<F, LoadError>>,
    F: Borrow<Feature>,
{
    let mut builder = GeometryStoreBuilder::with_capacity(count);
    let mut skipped = Vec::new();

    for (index, feature) in features.into_iter().enumerate() {
        let result = feature.and_then(|f| {
            let (id, polyline) = road_from_feature(f.borrow())?;
            builder.add_road(id, polyline)
        });
        if let Err(error) = result {
            debug!(feature = index, %error, "skipping road feature");
            skipped.push(SkippedFeature { index, error });
        }
    }

    let duplicate_ids = builder.duplicate_ids();
    let store = builder.build();

    if !skipped.is_empty() {
        warn!(skipped = skipped.len(), "road features skipped");
    }
    info!(roads = store.len(), duplicate_ids, "road geometry loaded");

    let report = LoadReport {
        features: count,
        loaded: store.len(),
        duplicate_ids,
        skipped,
    };
    (store, report)
}

/// Extract `(id, polyline)` from a feature.  Geometry type is checked before
/// the id so a non-road feature reports what it is rather than a missing id.
fn road_from_feature(feature: &Feature) -> Result<(RoadId, Vec<GeoPoint>), LoadError> {
    let geometry = feature.geometry.as_ref().ok_or(LoadError::MissingGeometry)?;
    let Value::LineString(positions) = &geometry.value else {
        return Err(LoadError::UnsupportedGeometry(geometry_kind(&geometry.value)));
    };

    let id = feature_road_id(feature).ok_or(LoadError::MissingId)?;

    let polyline: Option<Vec<GeoPoint>> = positions
        .iter()
        .map(|pos| match (pos.first(), pos.get(1)) {
            (Some(&lon), Some(&lat)) => Some(GeoPoint::new(lon, lat)),
            _ => None,
        })
        .collect();

    match polyline {
        Some(polyline) => Ok((id, polyline)),
        None => Err(LoadError::InvalidCoordinate { id }),
    }
}

fn feature_road_id(feature: &Feature) -> Option<RoadId> {
    let from_props = feature.properties.as_ref().and_then(|props| {
        ["@id", "id"]
            .iter()
            .find_map(|key| props.get(*key).and_then(json_road_id))
    });

    from_props.or_else(|| match feature.id.as_ref()? {
        Id::String(s) if !s.is_empty() => Some(RoadId::from(s.as_str())),
        Id::String(_) => None,
        Id::Number(n) => Some(RoadId::from(n.to_string())),
    })
}

fn json_road_id(value: &JsonValue) -> Option<RoadId> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(RoadId::from(s.as_str())),
        JsonValue::Number(n) => Some(RoadId::from(n.to_string())),
        _ => None,
    }
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
