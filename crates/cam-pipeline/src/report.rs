//! Summary counts for one pipeline run.

/// What a run consumed and produced.
///
/// `points_matched + points_unmatched == points_in` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub roads_indexed:          usize,
    pub points_in:              usize,
    pub points_matched:         usize,
    /// Points outside every road bounding box.  They still form segments
    /// under a null road id.
    pub points_unmatched:       usize,
    pub segments:               usize,
    /// Segments emitted with no mean speed (only possible under
    /// `MissingSpeedPolicy::EmitNull`).
    pub segments_without_speed: usize,
}

impl RunReport {
    /// Fraction of points that matched a road, in `[0, 1]`.  Zero for an
    /// empty run.
    pub fn match_rate(&self) -> f64 {
        if self.points_in == 0 {
            0.0
        } else {
            self.points_matched as f64 / self.points_in as f64
        }
    }
}
