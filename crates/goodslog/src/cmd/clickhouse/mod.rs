//! ClickHouse management commands
//!
//! Create, inspect and drop the goods table the pipeline writes to.
//!
//! # Commands
//!
//! ```bash
//! goodslog clickhouse init                        # create database and table
//! goodslog clickhouse init --dry-run              # print the DDL only
//! goodslog clickhouse check                       # connectivity, database, table
//! goodslog clickhouse destroy --yes               # drop the table
//! ```
//!
//! Connection settings come from the `[clickhouse]` section of the loaded
//! config; `--url`, `--database` and `--table` override it.

mod check;
mod client;
mod destroy;
mod init;

use anyhow::Result;
use clap::{Args, Subcommand};
use goodslog_config::Config;

pub use check::CheckArgs;
pub use destroy::DestroyArgs;
pub use init::InitArgs;

/// ClickHouse management commands
#[derive(Args, Debug)]
pub struct ClickHouseArgs {
    #[command(subcommand)]
    pub command: ClickHouseCommand,
}

#[derive(Subcommand, Debug)]
pub enum ClickHouseCommand {
    /// Create the database and goods table
    Init(InitArgs),

    /// Check connectivity and that the goods table exists
    Check(CheckArgs),

    /// Drop the goods table (removes all data!)
    Destroy(DestroyArgs),
}

/// Overrides shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// ClickHouse HTTP URL
    #[arg(long)]
    pub url: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,

    /// Table name
    #[arg(long)]
    pub table: Option<String>,
}

/// Resolved connection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub database: String,
    pub table: String,
    pub username: String,
    pub password: String,
}

impl TargetArgs {
    /// Apply overrides on top of the `[clickhouse]` section
    pub fn resolve(&self, config: &Config) -> Target {
        let ch = &config.clickhouse;
        Target {
            url: self.url.clone().unwrap_or_else(|| ch.url.clone()),
            database: self.database.clone().unwrap_or_else(|| ch.database.clone()),
            table: self.table.clone().unwrap_or_else(|| ch.table.clone()),
            username: ch.username.clone(),
            password: ch.password.clone(),
        }
    }
}

pub async fn run(args: ClickHouseArgs, config: &Config) -> Result<()> {
    match args.command {
        ClickHouseCommand::Init(args) => init::run(args, config).await,
        ClickHouseCommand::Check(args) => check::run(args, config).await,
        ClickHouseCommand::Destroy(args) => destroy::run(args, config).await,
    }
}
