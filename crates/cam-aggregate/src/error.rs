use thiserror::Error;

use crate::GroupKey;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// Groups in which no point carried a speed, so no mean exists.
    /// Raised only under `MissingSpeedPolicy::Fail`; no segments are produced.
    #[error("{} group(s) have no speed sample: {}", .groups.len(), preview(.groups))]
    NoSpeedSamples { groups: Vec<GroupKey> },
}

pub type AggregateResult<T> = Result<T, AggregateError>;

fn preview(groups: &[GroupKey]) -> String {
    const SHOWN: usize = 5;
    let mut s = groups
        .iter()
        .take(SHOWN)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if groups.len() > SHOWN {
        s.push_str(&format!(", … ({} more)", groups.len() - SHOWN));
    }
    s
}
