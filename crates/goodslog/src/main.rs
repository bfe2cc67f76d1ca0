//! goodslog - catalog change ingestion
//!
//! Pulls change notifications off a NATS JetStream subject and bulk-inserts
//! them into ClickHouse.
//!
//! # Usage
//!
//! ```bash
//! # Run the pipeline (default)
//! goodslog
//! goodslog --config configs/config.toml
//! GOODSLOG_CONFIG=/etc/goodslog.toml goodslog serve
//!
//! # Manage the goods table
//! goodslog clickhouse init
//! goodslog clickhouse check
//! goodslog clickhouse destroy --yes
//! ```

mod cmd;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// goodslog - catalog change ingestion
#[derive(Parser, Debug)]
#[command(name = "goodslog")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline until SIGINT/SIGTERM
    Serve,

    /// Goods table management
    Clickhouse(cmd::clickhouse::ClickHouseArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, config_path) = cmd::load_config(cli.config.as_deref())?;

    match cli.command {
        // No subcommand = run the pipeline
        Some(Command::Serve) | None => {
            logging::init_logging(&config.log, cli.log_level.as_deref())?;
            cmd::serve::run(config, config_path).await
        }
        Some(Command::Clickhouse(args)) => {
            // Schema commands print their own progress to stdout
            cmd::clickhouse::run(args, &config).await
        }
    }
}
