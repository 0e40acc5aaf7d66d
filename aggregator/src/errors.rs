use crate::reading::Source;
use http::StatusCode;
use thiserror::Error;

/// Result type alias for aggregator operations
pub type Result<T, E = AggregatorError> = std::result::Result<T, E>;

/// Errors that can occur while serving aggregate requests
#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Upstream request failed for {0}: {1}")]
    UpstreamRequestFailed(Source, String),

    #[error("Upstream {0} responded with status {1}")]
    UpstreamStatus(Source, StatusCode),

    #[error("Upstream timeout for {0}")]
    UpstreamTimeout(Source),

    #[error("Malformed response body from {0}: {1}")]
    MalformedBody(Source, String),

    #[error("Upstream {0} returned a value that is not a number: {1}")]
    NotANumber(Source, String),

    #[error("Upstream task failed: {0}")]
    TaskFailed(String),

    #[error("Readings were not collected from every upstream")]
    IncompleteReadings,

    #[error("Response serialization error: {0}")]
    ResponseSerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AggregatorError {
    /// The upstream that caused the failure, if any.
    pub fn source_name(&self) -> Option<Source> {
        match self {
            AggregatorError::UpstreamRequestFailed(source, _)
            | AggregatorError::UpstreamStatus(source, _)
            | AggregatorError::UpstreamTimeout(source)
            | AggregatorError::MalformedBody(source, _)
            | AggregatorError::NotANumber(source, _) => Some(*source),
            AggregatorError::TaskFailed(_)
            | AggregatorError::IncompleteReadings
            | AggregatorError::ResponseSerializationError(_)
            | AggregatorError::Io(_) => None,
        }
    }
}
