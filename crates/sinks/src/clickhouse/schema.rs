//! Goods table DDL
//!
//! Statements used by the `goodslog clickhouse` commands. The sink never
//! runs these.

/// Columns written by the sink, in insert order
pub const INSERT_COLUMNS: &[&str] = &[
    "Id",
    "ProjectId",
    "Name",
    "Description",
    "Priority",
    "Removed",
];

/// `CREATE DATABASE IF NOT EXISTS` for `database`
pub fn create_database_sql(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {database}")
}

/// `CREATE TABLE IF NOT EXISTS` for the goods table
pub fn create_table_sql(database: &str, table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {database}.{table} (
    Id Int64,
    ProjectId Int64,
    Name String,
    Description String,
    Priority Int32,
    Removed UInt8,
    EventTime DateTime DEFAULT now()
) ENGINE = MergeTree()
ORDER BY (ProjectId, Id, EventTime)"
    )
}

/// `DROP TABLE IF EXISTS` for the goods table
pub fn drop_table_sql(database: &str, table: &str) -> String {
    format!("DROP TABLE IF EXISTS {database}.{table}")
}

/// Everything `init` runs, in order
pub fn init_statements(database: &str, table: &str) -> Vec<String> {
    vec![
        create_database_sql(database),
        create_table_sql(database, table),
    ]
}
