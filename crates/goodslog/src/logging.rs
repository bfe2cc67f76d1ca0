//! Tracing subscriber setup
//!
//! Level from `--log-level` or `[log].level`, format from `[log].format`,
//! destination from `[log].output`.

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use goodslog_config::{LogConfig, LogFormat, LogLevel, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Resolve log level: CLI flag > config file
pub fn resolve_level(cli_level: Option<&str>, config: &LogConfig) -> Result<LogLevel> {
    match cli_level {
        Some(level) => level.parse::<LogLevel>().context("invalid --log-level"),
        None => Ok(config.level),
    }
}

/// Build the writer for the configured destination
///
/// Returns the writer and whether ANSI colors make sense for it.
fn make_writer(output: &LogOutput) -> Result<(BoxMakeWriter, bool)> {
    match output {
        LogOutput::Stdout => Ok((BoxMakeWriter::new(std::io::stdout), true)),
        LogOutput::Stderr => Ok((BoxMakeWriter::new(std::io::stderr), true)),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {path}"))?;
            Ok((BoxMakeWriter::new(Arc::new(file)), false))
        }
    }
}

/// Initialize the tracing subscriber for logging
pub fn init_logging(config: &LogConfig, cli_level: Option<&str>) -> Result<()> {
    let level = resolve_level(cli_level, config)?;
    let filter = EnvFilter::try_new(level.as_str())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let (writer, ansi) = make_writer(&config.output)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
