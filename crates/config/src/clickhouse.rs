//! ClickHouse sink configuration
//!
//! Connection parameters for the analytical store plus the time trigger for
//! batch flushes.

use serde::Deserialize;
use std::time::Duration;

/// Analytical store settings
///
/// # Example
///
/// ```toml
/// [clickhouse]
/// url = "http://clickhouse:8123"
/// database = "catalog"
/// table = "goods"
/// username = "writer"
/// password = "secret"
/// flush_interval = "30s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClickHouseSinkConfig {
    /// ClickHouse HTTP URL
    /// Default: "http://localhost:8123"
    pub url: String,

    /// Database name
    /// Default: "catalog"
    pub database: String,

    /// Target table
    /// Default: "goods"
    pub table: String,

    /// Username for authentication
    /// Default: "default"
    pub username: String,

    /// Password for authentication
    /// Default: ""
    pub password: String,

    /// Flush a partial batch after this long without reaching batch_size
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,
}

impl Default for ClickHouseSinkConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".into(),
            database: "catalog".into(),
            table: "goods".into(),
            username: "default".into(),
            password: String::new(),
            flush_interval: Duration::from_secs(30),
        }
    }
}
