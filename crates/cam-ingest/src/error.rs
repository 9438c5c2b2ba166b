use thiserror::Error;

/// Fatal telemetry I/O failures.  Any of these aborts the whole read.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or its top level is not an array.
    #[error("telemetry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Why a single telemetry record was dropped.  Never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The record does not have the expected JSON shape (e.g. a string where
    /// a number belongs).
    #[error("malformed record: {0}")]
    Malformed(String),

    /// A field needed to place the sample in time, space, or group is absent
    /// or carries the ETSI "unavailable" value.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}
