//! CSV output backend.
//!
//! One row per segment:
//!
//! ```csv
//! station_id,station_type,way_id,avg_speed_mps,point_count,first_timestamp_ms,last_timestamp_ms,length_m,coordinates
//! 3051,5,way/4217,12.7,2,1720076400123,1720076400223,13.9,"LINESTRING(11.5754 48.1371, 11.5756 48.1372)"
//! ```
//!
//! A null road id or mean speed is written as an empty field.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use cam_core::AggregatedSegment;

use crate::OutputResult;
use crate::row::{SegmentSummaryRow, segment_wkt};
use crate::writer::SegmentWriter;

pub const CSV_HEADER: [&str; 9] = [
    "station_id",
    "station_type",
    "way_id",
    "avg_speed_mps",
    "point_count",
    "first_timestamp_ms",
    "last_timestamp_ms",
    "length_m",
    "coordinates",
];

/// Writes one CSV row per segment.
pub struct CsvWriter<W: Write> {
    out:      Writer<W>,
    finished: bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut out = Writer::from_writer(inner);
        out.write_record(CSV_HEADER)?;
        Ok(Self { out, finished: false })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl<W: Write> SegmentWriter for CsvWriter<W> {
    fn write_segments(&mut self, segments: &[AggregatedSegment]) -> OutputResult<()> {
        for s in segments {
            let row = SegmentSummaryRow::from_segment(s);
            self.out.write_record(&[
                row.station_id.to_string(),
                row.station_type.to_string(),
                row.way_id.unwrap_or_default(),
                opt(row.avg_speed_mps),
                row.point_count.to_string(),
                opt(row.first_timestamp_ms),
                opt(row.last_timestamp_ms),
                format!("{:.3}", row.length_m),
                segment_wkt(s),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
