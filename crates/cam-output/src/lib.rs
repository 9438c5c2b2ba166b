//! `cam-output`: segment writers for the CAM road-segment pipeline.
//!
//! Three backends are provided:
//!
//! | Feature   | Backend | Output                                                  |
//! |-----------|---------|---------------------------------------------------------|
//! | *(none)*  | JSON    | one array of `{stationID, stationType, way_id, speed, coordinates, timestamps}` |
//! | *(none)*  | CSV     | one summary row per segment, geometry as WKT            |
//! | `sqlite`  | SQLite  | `segments` and `segment_points` tables                  |
//!
//! All backends implement [`SegmentWriter`] and can be driven by
//! [`SegmentOutputObserver`], which implements
//! `cam_pipeline::PipelineObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cam_output::{OutputFormat, SegmentOutputObserver, open_writer};
//!
//! let writer = open_writer(OutputFormat::Json, Path::new("segments.json"))?;
//! let mut obs = SegmentOutputObserver::new(writer);
//! pipeline.run(points, &mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonWriter;
pub use observer::SegmentOutputObserver;
pub use row::{SegmentRecord, SegmentSummaryRow, segment_wkt};
pub use writer::{OutputFormat, SegmentWriter, open_writer};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
