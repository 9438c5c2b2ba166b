//! Spatial-subsystem error types.

use thiserror::Error;

use cam_core::RoadId;

/// Fatal errors produced by `cam-spatial`: the road dataset as a whole could
/// not be read.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON parse error: {0}")]
    GeoJson(String),

    #[error("expected a GeoJSON FeatureCollection, found {0}")]
    NotFeatureCollection(&'static str),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

/// Why one road feature was left out of the geometry store.
///
/// Never fatal: the loader records it and moves on to the next feature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The feature could not be parsed as GeoJSON.
    #[error("malformed feature: {0}")]
    Malformed(String),

    #[error("feature has no usable identifier")]
    MissingId,

    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("unsupported geometry type {0}")]
    UnsupportedGeometry(&'static str),

    #[error("road {id} has {positions} position(s); a line needs at least 2")]
    DegenerateLine { id: RoadId, positions: usize },

    #[error("road {id} has a non-finite or incomplete coordinate")]
    InvalidCoordinate { id: RoadId },
}
