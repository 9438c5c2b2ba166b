//! Per-read decode statistics.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::DecodeError;

/// Counts for one telemetry read (or several, after [`merge`](Self::merge)).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    /// Array elements seen.
    pub records:   usize,
    /// Records turned into telemetry points.
    pub decoded:   usize,
    /// Records with the wrong JSON shape.
    pub malformed: usize,
    /// Records dropped for an absent field, keyed by the first field missing.
    pub missing:   BTreeMap<&'static str, usize>,
}

impl DecodeReport {
    pub fn skipped(&self) -> usize {
        self.malformed + self.missing.values().sum::<usize>()
    }

    pub(crate) fn record_decoded(&mut self) {
        self.records += 1;
        self.decoded += 1;
    }

    pub(crate) fn record_skipped(&mut self, index: usize, error: &DecodeError) {
        debug!(record = index, %error, "skipping telemetry record");
        self.records += 1;
        match error {
            DecodeError::Malformed(_) => self.malformed += 1,
            DecodeError::MissingField(field) => *self.missing.entry(*field).or_default() += 1,
        }
    }

    /// Fold another file's counts into this one.
    pub fn merge(&mut self, other: DecodeReport) {
        self.records += other.records;
        self.decoded += other.decoded;
        self.malformed += other.malformed;
        for (field, n) in other.missing {
            *self.missing.entry(field).or_default() += n;
        }
    }

    pub(crate) fn log_summary(&self, source: &str) {
        if self.skipped() > 0 {
            warn!(
                source,
                skipped = self.skipped(),
                malformed = self.malformed,
                missing = ?self.missing,
                "telemetry records skipped"
            );
        }
        info!(source, records = self.records, decoded = self.decoded, "telemetry read");
    }
}
