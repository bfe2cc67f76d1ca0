//! ClickHouse check command
//!
//! Verifies connectivity and that the goods table exists.
//!
//! # Usage
//!
//! ```bash
//! goodslog clickhouse check
//! goodslog clickhouse check --url http://clickhouse:8123
//! ```

use anyhow::{Result, bail};
use clap::Args;
use goodslog_config::Config;
use owo_colors::OwoColorize;

use super::TargetArgs;
use super::client::SchemaClient;

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn run(args: CheckArgs, config: &Config) -> Result<()> {
    let target = args.target.resolve(config);

    println!();
    println!("{}", "goodslog ClickHouse Check".bold());
    println!("{}", "─".repeat(50));
    println!("URL           {}", target.url.dimmed());
    println!("Database      {}", target.database.cyan());
    println!("Table         {}", target.table.cyan());
    println!("{}", "─".repeat(50));
    println!();

    print!("Connecting to ClickHouse... ");
    let client = match SchemaClient::connect(&target).await {
        Ok(c) => {
            println!("{}", "✓".green());
            c
        }
        Err(e) => {
            println!("{}", "✗".red());
            println!("  {}", e.to_string().red());
            return Err(e);
        }
    };

    if let Ok(version) = client.version().await {
        println!("  Version: {}", version.dimmed());
    }

    let mut all_ok = true;

    print!("Database '{}'... ", target.database);
    if client.database_exists(&target.database).await? {
        println!("{}", "✓".green());
    } else {
        println!("{}", "✗ not found".red());
        all_ok = false;
    }

    print!("Table '{}'... ", target.table);
    if all_ok && client.table_exists(&target.database, &target.table).await? {
        println!("{}", "✓".green());
        let rows = client.count_rows(&target.database, &target.table).await?;
        println!("  Rows: {}", rows.to_string().dimmed());
    } else {
        println!("{}", "✗ not found".red());
        all_ok = false;
    }

    println!();

    if !all_ok {
        println!(
            "{}",
            "Some checks failed. Run 'goodslog clickhouse init' to set up.".yellow()
        );
        println!();
        bail!("schema check failed");
    }

    println!("{}", "All checks passed!".green().bold());
    println!();

    Ok(())
}
