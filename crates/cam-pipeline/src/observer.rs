//! Pipeline observer trait for progress reporting.

use std::time::Instant;

use tracing::info;

use cam_core::AggregatedSegment;

use crate::RunReport;

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] between
/// phases.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Hooks fire between phases only, never
/// while a phase is in progress.
pub trait PipelineObserver {
    /// Called at the start of a run with the number of indexed roads.
    fn on_index_built(&mut self, _roads: usize) {}

    /// Called after every point has been matched, before aggregation starts.
    fn on_points_matched(&mut self, _matched: usize, _unmatched: usize) {}

    /// Called with the complete segment set, before `on_run_end`.
    fn on_segments_built(&mut self, _segments: &[AggregatedSegment]) {}

    /// Called once after a successful run.
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Forwards every hook to both observers, first `A` then `B`.
impl<A: PipelineObserver, B: PipelineObserver> PipelineObserver for (A, B) {
    fn on_index_built(&mut self, roads: usize) {
        self.0.on_index_built(roads);
        self.1.on_index_built(roads);
    }

    fn on_points_matched(&mut self, matched: usize, unmatched: usize) {
        self.0.on_points_matched(matched, unmatched);
        self.1.on_points_matched(matched, unmatched);
    }

    fn on_segments_built(&mut self, segments: &[AggregatedSegment]) {
        self.0.on_segments_built(segments);
        self.1.on_segments_built(segments);
    }

    fn on_run_end(&mut self, report: &RunReport) {
        self.0.on_run_end(report);
        self.1.on_run_end(report);
    }
}

/// Logs each phase through `tracing` at `info` level, with the time elapsed
/// since the observer was created.
pub struct TracingObserver {
    started: Instant,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineObserver for TracingObserver {
    fn on_index_built(&mut self, roads: usize) {
        info!(roads, elapsed_ms = self.elapsed_ms(), "spatial index built");
    }

    fn on_points_matched(&mut self, matched: usize, unmatched: usize) {
        info!(matched, unmatched, elapsed_ms = self.elapsed_ms(), "points matched");
    }

    fn on_segments_built(&mut self, segments: &[AggregatedSegment]) {
        info!(segments = segments.len(), elapsed_ms = self.elapsed_ms(), "segments built");
    }

    fn on_run_end(&mut self, report: &RunReport) {
        info!(
            roads = report.roads_indexed,
            points = report.points_in,
            match_rate = report.match_rate(),
            segments = report.segments,
            segments_without_speed = report.segments_without_speed,
            elapsed_ms = self.elapsed_ms(),
            "run complete"
        );
    }
}
