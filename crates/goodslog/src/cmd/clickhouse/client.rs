//! ClickHouse client for schema operations
//!
//! Provides connection and query execution for init/check/destroy commands.

use anyhow::{Context, Result};
use clickhouse::Client;

use super::Target;

/// ClickHouse client wrapper for schema operations
///
/// No default database is set, so `CREATE DATABASE` works before the
/// database exists.
pub struct SchemaClient {
    client: Client,
}

impl SchemaClient {
    /// Create a new client and test connection
    pub async fn connect(target: &Target) -> Result<Self> {
        let mut client = Client::default().with_url(&target.url);
        if !target.username.is_empty() {
            client = client
                .with_user(&target.username)
                .with_password(&target.password);
        }

        client
            .query("SELECT 1")
            .execute()
            .await
            .with_context(|| format!("failed to connect to ClickHouse at {}", target.url))?;

        Ok(Self { client })
    }

    /// Execute a single SQL statement
    pub async fn execute(&self, sql: &str) -> Result<()> {
        self.client
            .query(sql)
            .execute()
            .await
            .with_context(|| format!("failed to execute: {}", truncate_sql(sql)))?;
        Ok(())
    }

    /// Check if a database exists
    pub async fn database_exists(&self, name: &str) -> Result<bool> {
        let result = self
            .client
            .query("SELECT 1 FROM system.databases WHERE name = ? LIMIT 1")
            .bind(name)
            .fetch_optional::<u8>()
            .await
            .context("failed to check database existence")?;
        Ok(result.is_some())
    }

    /// Check if a table exists
    pub async fn table_exists(&self, database: &str, table: &str) -> Result<bool> {
        let result = self
            .client
            .query("SELECT 1 FROM system.tables WHERE database = ? AND name = ? LIMIT 1")
            .bind(database)
            .bind(table)
            .fetch_optional::<u8>()
            .await
            .context("failed to check table existence")?;
        Ok(result.is_some())
    }

    /// Count rows in a table
    pub async fn count_rows(&self, database: &str, table: &str) -> Result<u64> {
        let count = self
            .client
            .query(&format!("SELECT count() FROM {database}.{table}"))
            .fetch_one::<u64>()
            .await
            .context("failed to count rows")?;
        Ok(count)
    }

    /// Get ClickHouse version
    pub async fn version(&self) -> Result<String> {
        let version = self
            .client
            .query("SELECT version()")
            .fetch_one::<String>()
            .await
            .context("failed to get ClickHouse version")?;
        Ok(version)
    }
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    let first_line = sql.lines().next().unwrap_or(sql);
    if first_line.chars().count() > 80 {
        let head: String = first_line.chars().take(77).collect();
        format!("{head}...")
    } else {
        first_line.to_string()
    }
}
