//! goodslog - Sinks
//!
//! Bulk sinks that persist a flushed batch of `GoodEvent`s in one call.
//!
//! # Architecture
//!
//! The batch accumulator owns exactly one sink and calls
//! [`BulkSink::append`] once per flush. A sink holds no state beyond its
//! connection: no buffering, no retry. A failed append is reported once for
//! the whole batch.
//!
//! ```text
//! [Accumulator] --&[GoodEvent]--> [BulkSink::append] --> [Destination]
//! ```
//!
//! # Available Sinks
//!
//! | Sink | Purpose |
//! |------|---------|
//! | `clickhouse` | Analytics database (one INSERT per flush) |
//! | `memory` | Records batches in process (tests, dry runs) |
//!
//! # Example
//!
//! ```ignore
//! use goodslog_sinks::{BulkSink, ClickHouseConfig, ClickHouseSink};
//!
//! let sink = ClickHouseSink::connect(ClickHouseConfig::default()).await?;
//! sink.append(&events).await?;
//! ```

/// ClickHouse sink - analytical store
pub mod clickhouse;

/// Memory sink - records every appended batch
pub mod memory;

/// Sink trait and shared error type
mod common;

pub use clickhouse::{ClickHouseConfig, ClickHouseSink, GoodRow};
pub use common::{BulkSink, SinkError};
pub use memory::MemorySink;

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;
