//! Decode error types
//!
//! Errors that can occur when turning a message body into a `GoodEvent`.

use thiserror::Error;

/// Errors that can occur while decoding a message payload
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not valid JSON for the event schema
    #[error("invalid event payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Required identifier is absent or zero
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Empty message body
    #[error("empty payload")]
    EmptyPayload,
}

impl DecodeError {
    /// Create a missing field error
    #[inline]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(field)
    }
}
