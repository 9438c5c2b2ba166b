//! `cam-pipeline`: batch driver for the CAM road-segment pipeline.
//!
//! # Two-phase run
//!
//! ```text
//! build:  GeometryStore → SpatialIndex (once per Pipeline)
//! run:
//!   ① Match      each TelemetryPoint → MatchedPoint via PointMatcher
//!                (parallel with the `parallel` feature, input order kept).
//!   ② Aggregate  group by (station, road), sort by time, mean speed.
//! ```
//!
//! Aggregation starts only once every point is matched.  Either the full
//! segment set is returned or the run fails; there is no partial output.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the match phase on Rayon's thread pool.            |
//! | `fx-hash`  | FxHash grouping map in `cam-aggregate`.                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cam_core::PipelineConfig;
//! use cam_pipeline::{PipelineBuilder, TracingObserver};
//!
//! let (store, _) = cam_spatial::load_geojson_path(&roads)?;
//! let (points, _) = cam_ingest::read_filtered_path(&cams)?;
//! let pipeline = PipelineBuilder::new(PipelineConfig::default()).roads(store).build()?;
//! let output = pipeline.run(points, &mut TracingObserver::new())?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod report;

#[cfg(test)]
mod tests;

pub use builder::PipelineBuilder;
pub use error::{PipelineError, PipelineResult};
pub use observer::{NoopObserver, PipelineObserver, TracingObserver};
pub use pipeline::{Pipeline, PipelineOutput};
pub use report::RunReport;
