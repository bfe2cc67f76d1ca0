//! Common types for sinks
//!
//! The capability every sink implements, and the error it reports.

use std::future::Future;

use goodslog_protocol::GoodEvent;
use thiserror::Error;

/// A destination that accepts one batch of events per call
///
/// Implementations are all-or-nothing per call: partial success is not
/// modeled. Callers never pass an empty slice, but implementations treat one
/// as a no-op anyway.
pub trait BulkSink: Send + Sync + 'static {
    /// Sink name for logging
    fn name(&self) -> &str;

    /// Write every event in `rows`, in order, as one bulk insert
    fn append(&self, rows: &[GoodEvent]) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// ClickHouse client error
    #[error("clickhouse error: {0}")]
    ClickHouse(#[from] clickhouse::error::Error),

    /// Store unreachable at startup
    #[error("failed to connect to {url}: {reason}")]
    Connection {
        /// Store URL
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// The batch was rejected as a whole
    #[error("insert of {rows} rows into {table} failed: {reason}")]
    Insert {
        /// Target table
        table: String,
        /// Rows in the rejected batch
        rows: usize,
        /// Underlying failure
        reason: String,
    },
}

impl SinkError {
    /// Create a connection error
    pub fn connection(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connection {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an insert error
    pub fn insert(table: impl Into<String>, rows: usize, reason: impl ToString) -> Self {
        Self::Insert {
            table: table.into(),
            rows,
            reason: reason.to_string(),
        }
    }
}
