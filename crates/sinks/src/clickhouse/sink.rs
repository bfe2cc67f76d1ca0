//! ClickHouse sink implementation
//!
//! One [`BulkSink::append`] call is one INSERT statement.

use clickhouse::{Client, insert::Insert};
use goodslog_protocol::GoodEvent;

use crate::common::{BulkSink, SinkError};

use super::config::ClickHouseConfig;
use super::table::GoodRow;

/// ClickHouse sink for the goods table
pub struct ClickHouseSink {
    /// Configuration
    config: ClickHouseConfig,

    /// ClickHouse client
    client: Client,

    /// Sink name for identification
    name: String,
}

impl ClickHouseSink {
    /// Create a sink without contacting the server
    pub fn new(config: ClickHouseConfig) -> Self {
        let client = config.build_client();

        Self {
            client,
            config,
            name: "clickhouse".into(),
        }
    }

    /// Create a sink and verify the server answers a trivial query
    pub async fn connect(config: ClickHouseConfig) -> Result<Self, SinkError> {
        let sink = Self::new(config);
        sink.ping().await?;

        tracing::info!(
            url = %sink.config.url,
            database = %sink.config.database,
            table = %sink.config.table,
            "connected to clickhouse"
        );

        Ok(sink)
    }

    /// Round-trip `SELECT 1`
    pub async fn ping(&self) -> Result<(), SinkError> {
        self.client
            .query("SELECT 1")
            .execute()
            .await
            .map_err(|e| SinkError::connection(&self.config.url, e))
    }

    async fn do_insert(&self, rows: &[GoodEvent]) -> Result<(), clickhouse::error::Error> {
        let mut insert: Insert<GoodRow> = self.client.insert(&self.config.table).await?;

        for event in rows {
            insert.write(&GoodRow::from(event)).await?;
        }

        insert.end().await
    }
}

impl BulkSink for ClickHouseSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append(&self, rows: &[GoodEvent]) -> Result<(), SinkError> {
        if rows.is_empty() {
            return Ok(());
        }

        self.do_insert(rows)
            .await
            .map_err(|e| SinkError::insert(&self.config.table, rows.len(), e))?;

        tracing::debug!(table = %self.config.table, rows = rows.len(), "insert committed");
        Ok(())
    }
}
