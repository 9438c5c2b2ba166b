//! The `SegmentWriter` trait implemented by all backend writers.

use std::path::Path;

use cam_core::AggregatedSegment;

use crate::{CsvWriter, JsonWriter, OutputResult};

/// Trait implemented by the JSON, CSV, and SQLite writers.
///
/// Writers are handed finished segments only; a failed run never reaches
/// them.
pub trait SegmentWriter {
    /// Write a batch of segments.  May be called more than once.
    fn write_segments(&mut self, segments: &[AggregatedSegment]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: SegmentWriter + ?Sized> SegmentWriter for Box<W> {
    fn write_segments(&mut self, segments: &[AggregatedSegment]) -> OutputResult<()> {
        (**self).write_segments(segments)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// Output backend selector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Sqlite,
}

impl OutputFormat {
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Sqlite => "sqlite",
        }
    }
}

/// Open a writer for `format` that writes to `path`, creating or truncating it.
///
/// # Errors
///
/// [`OutputError::FormatUnavailable`](crate::OutputError::FormatUnavailable) for `Sqlite` when built without the
/// `sqlite` feature, otherwise whatever the backend's constructor returns.
pub fn open_writer(format: OutputFormat, path: &Path) -> OutputResult<Box<dyn SegmentWriter>> {
    match format {
        OutputFormat::Json => Ok(Box::new(JsonWriter::create(path)?)),
        OutputFormat::Csv => Ok(Box::new(CsvWriter::create(path)?)),
        #[cfg(feature = "sqlite")]
        OutputFormat::Sqlite => Ok(Box::new(crate::SqliteWriter::create(path)?)),
        #[cfg(not(feature = "sqlite"))]
        OutputFormat::Sqlite => Err(crate::OutputError::FormatUnavailable(format.name())),
    }
}
