//! ClickHouse init command
//!
//! Creates the database and the goods table. Safe to re-run.
//!
//! # Usage
//!
//! ```bash
//! goodslog clickhouse init
//! goodslog clickhouse init --url http://clickhouse:8123
//! goodslog clickhouse init --dry-run
//! ```

use anyhow::Result;
use clap::Args;
use goodslog_config::Config;
use goodslog_sinks::clickhouse::schema;
use owo_colors::OwoColorize;

use super::client::SchemaClient;
use super::{Target, TargetArgs};

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show what would be created without executing
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: InitArgs, config: &Config) -> Result<()> {
    let target = args.target.resolve(config);

    print_header(&target);

    if args.dry_run {
        println!("{}", "[DRY RUN] Would execute:".yellow().bold());
        println!();
        for sql in schema::init_statements(&target.database, &target.table) {
            println!("{sql};");
            println!();
        }
        return Ok(());
    }

    print!("Connecting to ClickHouse... ");
    let client = SchemaClient::connect(&target).await?;
    println!("{}", "✓".green());

    if client.table_exists(&target.database, &target.table).await? {
        println!(
            "{}",
            format!(
                "Table '{}.{}' already exists, nothing to do.",
                target.database, target.table
            )
            .yellow()
        );
        println!();
        return Ok(());
    }

    print!("Creating database '{}'... ", target.database);
    client
        .execute(&schema::create_database_sql(&target.database))
        .await?;
    println!("{}", "✓".green());

    print!("Creating table '{}'... ", target.table);
    client
        .execute(&schema::create_table_sql(&target.database, &target.table))
        .await?;
    println!("{}", "✓".green());

    println!();
    println!("{}", "Schema ready.".green().bold());
    println!();

    Ok(())
}

fn print_header(target: &Target) {
    println!();
    println!("{}", "goodslog ClickHouse Init".bold());
    println!("{}", "─".repeat(50));
    println!("URL           {}", target.url.dimmed());
    println!("Database      {}", target.database.cyan());
    println!("Table         {}", target.table.cyan());
    println!("{}", "─".repeat(50));
    println!();
}
