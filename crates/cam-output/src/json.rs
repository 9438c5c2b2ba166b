//! JSON output backend.
//!
//! Writes one JSON array of [`SegmentRecord`]s, one segment per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cam_core::AggregatedSegment;

use crate::OutputResult;
use crate::row::SegmentRecord;
use crate::writer::SegmentWriter;

/// Streams segments into a single JSON array.
pub struct JsonWriter<W: Write> {
    out:      W,
    written:  usize,
    finished: bool,
}

impl JsonWriter<BufWriter<File>> {
    /// Create (or truncate) `path`.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> JsonWriter<W> {
    pub fn new(mut out: W) -> OutputResult<Self> {
        out.write_all(b"[\n")?;
        Ok(Self { out, written: 0, finished: false })
    }

    /// Unwrap the inner sink (e.g. to inspect an in-memory buffer).
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SegmentWriter for JsonWriter<W> {
    fn write_segments(&mut self, segments: &[AggregatedSegment]) -> OutputResult<()> {
        for s in segments {
            if self.written > 0 {
                self.out.write_all(b",\n")?;
            }
            serde_json::to_writer(&mut self.out, &SegmentRecord::from_segment(s))?;
            self.written += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.written > 0 {
            self.out.write_all(b"\n")?;
        }
        self.out.write_all(b"]\n")?;
        self.out.flush()?;
        Ok(())
    }
}
