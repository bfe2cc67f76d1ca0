//! Stream errors

use thiserror::Error;

/// Errors raised by message streams
#[derive(Debug, Error)]
pub enum StreamError {
    /// Broker unreachable
    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Stream lookup failed
    #[error("stream {name} unavailable: {reason}")]
    Stream { name: String, reason: String },

    /// Durable consumer could not be created or bound
    #[error("consumer {name} unavailable: {reason}")]
    Consumer { name: String, reason: String },

    /// Fetch failed (connection loss, timeout at the transport level)
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Acknowledgment failed
    #[error("ack failed: {0}")]
    Ack(String),
}

impl StreamError {
    /// Create a connect error
    pub fn connect(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connect {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a stream lookup error
    pub fn stream(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Stream {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a consumer error
    pub fn consumer(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Consumer {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a fetch error
    pub fn fetch(reason: impl ToString) -> Self {
        Self::Fetch(reason.to_string())
    }

    /// Create an ack error
    pub fn ack(reason: impl ToString) -> Self {
        Self::Ack(reason.to_string())
    }

    /// Whether this error happened before the stream was usable
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::Stream { .. } | Self::Consumer { .. }
        )
    }
}
