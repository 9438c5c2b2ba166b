//! `cam-ingest`: telemetry input for the CAM road-segment pipeline.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`stream`]    | `for_each_array_element` (element-at-a-time JSON array reader)  |
//! | [`cam`]       | Raw CAM record types, `read_raw_path`, `convert_raw_to_filtered`|
//! | [`filtered`]  | `FilteredRecord`, `FilteredWriter`, `read_filtered_path`        |
//! | [`source`]    | `TelemetryFormat`, `read_telemetry_paths` (multi-file)          |
//! | [`report`]    | `DecodeReport`                                                  |
//! | [`synthetic`] | `SyntheticParams`, `SyntheticDataset` (seeded test data)        |
//! | [`error`]     | `IngestError`, `DecodeError`, `IngestResult<T>`                 |
//!
//! # Failure model
//!
//! A file that cannot be opened, is not JSON, or is not a top-level array
//! fails the read with [`IngestError`].  A single record that is malformed
//! or lacks a required field is counted in the [`DecodeReport`], logged at
//! `debug`, and skipped.

pub mod cam;
pub mod error;
pub mod filtered;
pub mod report;
pub mod source;
pub mod stream;
pub mod synthetic;


pub use cam::{RawCamRecord, convert_raw_to_filtered, decode_raw_value, read_raw_path, read_raw_reader};
pub use error::{DecodeError, IngestError, IngestResult};
pub use filtered::{
    FilteredRecord, FilteredWriter, read_filtered_path, read_filtered_reader, write_filtered_path,
};
pub use report::DecodeReport;
pub use source::{TelemetryFormat, read_telemetry_path, read_telemetry_paths};
pub use stream::for_each_array_element;
pub use synthetic::{SyntheticDataset, SyntheticParams};
