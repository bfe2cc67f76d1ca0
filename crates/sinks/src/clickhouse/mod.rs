//! ClickHouse Sink - analytical store for catalog changes
//!
//! Writes each flushed batch as one INSERT into the goods table.
//!
//! # Table
//!
//! | Column | Type | Source |
//! |--------|------|--------|
//! | Id | Int64 | `GoodEvent::id` |
//! | ProjectId | Int64 | `GoodEvent::project_id` |
//! | Name | String | `GoodEvent::name` |
//! | Description | String | `GoodEvent::description` (empty when absent) |
//! | Priority | Int32 | `GoodEvent::priority` |
//! | Removed | UInt8 | `GoodEvent::removed` as 0/1 |
//! | EventTime | DateTime | server default `now()` |
//!
//! The sink itself never creates the table; see [`schema`] for the DDL used
//! by the `goodslog clickhouse` commands.

mod config;
pub mod schema;
mod sink;
mod table;

pub use config::{ClickHouseConfig, DEFAULT_DATABASE, DEFAULT_TABLE, DEFAULT_URL};
pub use sink::ClickHouseSink;
pub use table::GoodRow;
