//! Run-level configuration.

use crate::{CoreError, CoreResult};

/// What the aggregator does with a `(station, road)` group in which no
/// sample carried a speed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MissingSpeedPolicy {
    /// Abort aggregation and report every offending group.  No segments are
    /// produced.
    #[default]
    Fail,
    /// Emit the segment with `avg_speed_mps = None`.
    EmitNull,
}

/// Top-level pipeline configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the pipeline builder.  Every field has a default, so a partial file is
/// valid.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    pub missing_speed: MissingSpeedPolicy,

    /// Worker thread count passed to Rayon when matching in parallel.
    /// `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl PipelineConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.num_threads == Some(0) {
            return Err(CoreError::Config(
                "num_threads must be at least 1 (omit it to use all cores)".into(),
            ));
        }
        Ok(())
    }
}
