//! `cam-spatial`: road geometry, spatial indexing, and map matching.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`store`]   | `RoadSegment`, `GeometryStore`, `GeometryStoreBuilder`       |
//! | [`loader`]  | `load_geojson_path`, `load_geojson_reader`, `LoadReport`     |
//! | [`index`]   | `SpatialIndex` (R-tree of road bounding boxes)               |
//! | [`matcher`] | `PointMatcher`, `RoadMatch`, `match_point`                   |
//! | [`error`]   | `SpatialError`, `LoadError`, `SpatialResult<T>`              |
//!
//! # Matching model
//!
//! A telemetry point is only compared against roads whose bounding box
//! contains it.  Among those, the road with the smallest planar distance from
//! the point to its polyline wins; ties go to the road loaded first.  A point
//! outside every bounding box stays unmatched even if a road passes close by.

pub mod error;
pub mod index;
pub mod loader;
pub mod matcher;
pub mod store;


pub use error::{LoadError, SpatialError, SpatialResult};
pub use index::SpatialIndex;
pub use loader::{
    LoadReport, SkippedFeature, load_features, load_geojson_path, load_geojson_reader,
    load_geojson_str,
};
pub use matcher::{PointMatcher, RoadMatch, match_point};
pub use store::{GeometryStore, GeometryStoreBuilder, RoadSegment};
