//! `SegmentOutputObserver<W>` bridges `PipelineObserver` to a `SegmentWriter`.

use cam_core::AggregatedSegment;
use cam_pipeline::{PipelineObserver, RunReport};

use crate::writer::SegmentWriter;
use crate::{OutputError, OutputResult};

/// A [`PipelineObserver`] that writes the finished segment set to any
/// [`SegmentWriter`] backend and closes it when the run ends.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `pipeline.run()` returns, check for errors
/// with [`take_error`][Self::take_error].  A failed run never calls
/// `on_segments_built`, so nothing is written for it.
pub struct SegmentOutputObserver<W: SegmentWriter> {
    writer:     W,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: SegmentWriter> SegmentOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `pipeline.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Segments handed to the writer so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: SegmentWriter> PipelineObserver for SegmentOutputObserver<W> {
    fn on_segments_built(&mut self, segments: &[AggregatedSegment]) {
        let result = self.writer.write_segments(segments);
        if result.is_ok() {
            self.written += segments.len();
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, _report: &RunReport) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
