//! Reading telemetry from one or more files.

use std::path::{Path, PathBuf};

use cam_core::TelemetryPoint;

use crate::{DecodeReport, IngestResult, read_filtered_path, read_raw_path};

/// On-disk telemetry layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TelemetryFormat {
    /// Nested CAM captures (see [`crate::cam`]).
    Raw,
    /// Flat, unit-converted records (see [`crate::filtered`]).
    #[default]
    Filtered,
}

/// Read one telemetry file in the given format.
pub fn read_telemetry_path(
    path: &Path,
    format: TelemetryFormat,
) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    match format {
        TelemetryFormat::Raw => read_raw_path(path),
        TelemetryFormat::Filtered => read_filtered_path(path),
    }
}

/// Read several telemetry files and concatenate their points in the order
/// the paths are given.  The first unreadable file aborts the read.
pub fn read_telemetry_paths(
    paths: &[PathBuf],
    format: TelemetryFormat,
) -> IngestResult<(Vec<TelemetryPoint>, DecodeReport)> {
    let mut points = Vec::new();
    let mut report = DecodeReport::default();

    for path in paths {
        let (mut file_points, file_report) = read_telemetry_path(path, format)?;
        points.append(&mut file_points);
        report.merge(file_report);
    }

    Ok((points, report))
}
