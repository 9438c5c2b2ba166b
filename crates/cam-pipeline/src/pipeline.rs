//! The `Pipeline` struct and its batch run.

use cam_aggregate::aggregate;
use cam_core::{AggregatedSegment, MatchedPoint, PipelineConfig, TelemetryPoint};
use cam_spatial::{GeometryStore, PointMatcher, SpatialIndex};

use crate::{PipelineObserver, PipelineResult, RunReport};

/// Segments plus the counts that describe how they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub segments: Vec<AggregatedSegment>,
    pub report:   RunReport,
}

/// Road geometry, its spatial index, and the run configuration.
///
/// A run has two phases:
///
/// 1. **Match**: every point is resolved to a road id (optionally in
///    parallel with the `parallel` feature).  Results keep input order.
/// 2. **Aggregate**: the fully matched set is grouped by `(station, road)`
///    and reduced to segments.  Starts only after phase 1 has finished.
///
/// The store and index are never mutated after construction, so one
/// `Pipeline` can serve any number of runs.
///
/// Create via [`PipelineBuilder`][crate::PipelineBuilder].
pub struct Pipeline {
    pub(crate) config: PipelineConfig,
    pub(crate) store:  GeometryStore,
    pub(crate) index:  SpatialIndex,
    /// Dedicated pool when `config.num_threads` is set; otherwise Rayon's
    /// global pool is used.
    #[cfg(feature = "parallel")]
    pub(crate) pool:   Option<rayon::ThreadPool>,
}

impl Pipeline {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &GeometryStore {
        &self.store
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn matcher(&self) -> PointMatcher<'_> {
        PointMatcher::new(&self.index, &self.store)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Resolve each point to its road.  Output order equals input order.
    pub fn match_points(&self, points: Vec<TelemetryPoint>) -> Vec<MatchedPoint> {
        let matcher = self.matcher();

        #[cfg(not(feature = "parallel"))]
        {
            points
                .into_iter()
                .map(|p| {
                    let way_id = matcher.match_point(&p);
                    MatchedPoint::new(p, way_id)
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Indexed parallel collect writes each result to its input slot.
            let run = move || -> Vec<MatchedPoint> {
                points
                    .into_par_iter()
                    .map(|p| {
                        let way_id = matcher.match_point(&p);
                        MatchedPoint::new(p, way_id)
                    })
                    .collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }

    /// Match all points, then aggregate them into segments.
    ///
    /// Calls observer hooks between phases.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Aggregate`][crate::PipelineError::Aggregate] when a
    /// group has no speed sample under `MissingSpeedPolicy::Fail`.  No
    /// segments are returned in that case.
    pub fn run<O: PipelineObserver>(
        &self,
        points: Vec<TelemetryPoint>,
        observer: &mut O,
    ) -> PipelineResult<PipelineOutput> {
        observer.on_index_built(self.index.len());

        let points_in = points.len();
        let matched = self.match_points(points);
        let points_matched = matched.iter().filter(|m| m.is_matched()).count();
        observer.on_points_matched(points_matched, points_in - points_matched);

        let segments = aggregate(&matched, self.config.missing_speed)?;
        observer.on_segments_built(&segments);

        let report = RunReport {
            roads_indexed: self.index.len(),
            points_in,
            points_matched,
            points_unmatched: points_in - points_matched,
            segments: segments.len(),
            segments_without_speed: segments.iter().filter(|s| s.avg_speed_mps.is_none()).count(),
        };
        observer.on_run_end(&report);

        Ok(PipelineOutput { segments, report })
    }
}
