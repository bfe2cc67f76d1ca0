//! ClickHouse destroy command
//!
//! Drops the goods table. The database is left in place.
//!
//! # Usage
//!
//! ```bash
//! goodslog clickhouse destroy
//! goodslog clickhouse destroy --yes  # skip confirmation
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use goodslog_config::Config;
use goodslog_sinks::clickhouse::schema;
use owo_colors::OwoColorize;

use super::TargetArgs;
use super::client::SchemaClient;

#[derive(Args, Debug)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,

    /// Show what would be dropped without executing
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: DestroyArgs, config: &Config) -> Result<()> {
    let target = args.target.resolve(config);
    let qualified = format!("{}.{}", target.database, target.table);

    println!();
    println!("{}", "goodslog ClickHouse Destroy".bold().red());
    println!("{}", "─".repeat(50));
    println!("URL           {}", target.url.dimmed());
    println!("Table         {}", qualified.cyan());
    println!("{}", "─".repeat(50));
    println!();

    println!(
        "{}",
        "WARNING: This will permanently delete:".yellow().bold()
    );
    println!("  - Table: {qualified}");
    println!("  - All rows in {qualified}");
    println!();

    if args.dry_run {
        println!("{}", "[DRY RUN] Would execute:".yellow().bold());
        println!();
        println!(
            "{};",
            schema::drop_table_sql(&target.database, &target.table)
        );
        println!();
        return Ok(());
    }

    if !args.yes {
        print!("Type '{}' to confirm: ", target.table.red().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim() != target.table {
            println!();
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    println!();

    print!("Connecting to ClickHouse... ");
    let client = SchemaClient::connect(&target).await?;
    println!("{}", "✓".green());

    if !client.table_exists(&target.database, &target.table).await? {
        println!(
            "{}",
            format!("Table '{qualified}' does not exist, nothing to do.").yellow()
        );
        println!();
        return Ok(());
    }

    print!("Dropping table '{}'... ", qualified);
    client
        .execute(&schema::drop_table_sql(&target.database, &target.table))
        .await?;
    println!("{}", "✓".green());

    println!();
    println!(
        "{}",
        format!("Table '{qualified}' destroyed.").green().bold()
    );
    println!();

    Ok(())
}
