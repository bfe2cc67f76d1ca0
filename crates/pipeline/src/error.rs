//! Pipeline error types
//!
//! Startup failures. Once running, the pipeline logs failures instead of
//! returning them.

use thiserror::Error;

use goodslog_sinks::SinkError;
use goodslog_sources::StreamError;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Store unreachable or rejected the ping
    #[error("store unavailable: {0}")]
    Sink(#[from] SinkError),

    /// Broker, stream or durable consumer unavailable
    #[error("stream unavailable: {0}")]
    Stream(#[from] StreamError),

    /// Settings the pipeline cannot run with
    #[error("invalid pipeline config: {0}")]
    InvalidConfig(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::from(SinkError::connection("http://ch:8123", "refused"));
        assert!(err.to_string().starts_with("store unavailable"));
        assert!(err.to_string().contains("http://ch:8123"));

        let err = PipelineError::from(StreamError::stream("GOODS", "not found"));
        assert!(err.to_string().starts_with("stream unavailable"));
        assert!(err.to_string().contains("GOODS"));

        let err = PipelineError::InvalidConfig("batch_size must be at least 1".into());
        assert!(err.to_string().contains("batch_size"));
    }
}
