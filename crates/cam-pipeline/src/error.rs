use cam_aggregate::AggregateError;
use cam_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("could not start matcher thread pool: {0}")]
    ThreadPool(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
