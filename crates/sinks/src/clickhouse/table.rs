//! Goods table row type

use clickhouse::Row;
use goodslog_protocol::GoodEvent;
use serde::Serialize;

/// One row of the goods table
///
/// Field order matches the INSERT column order; serde names match the
/// ClickHouse column names.
///
/// ```sql
/// CREATE TABLE goods (
///     Id Int64,
///     ProjectId Int64,
///     Name String,
///     Description String,
///     Priority Int32,
///     Removed UInt8,
///     EventTime DateTime DEFAULT now()
/// ) ENGINE = MergeTree()
/// ORDER BY (ProjectId, Id, EventTime);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Row, Serialize)]
pub struct GoodRow {
    #[serde(rename = "Id")]
    pub id: i64,

    #[serde(rename = "ProjectId")]
    pub project_id: i64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Priority")]
    pub priority: i32,

    /// 1 when the item was removed, 0 otherwise
    #[serde(rename = "Removed")]
    pub removed: u8,
}

impl From<&GoodEvent> for GoodRow {
    fn from(event: &GoodEvent) -> Self {
        Self {
            id: event.id,
            project_id: event.project_id,
            name: event.name.clone(),
            description: event.description.clone().unwrap_or_default(),
            priority: event.priority,
            removed: u8::from(event.removed),
        }
    }
}
