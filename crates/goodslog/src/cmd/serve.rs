//! Serve command - run the pipeline

use std::path::PathBuf;

use anyhow::{Context, Result};
use goodslog_config::Config;
use goodslog_pipeline::{Pipeline, PipelineReport};
use tokio::signal;
use tracing::{error, info};

/// Run the serve command
pub async fn run(config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let config_source = config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        config = %config_source,
        nats = %config.nats.server_url(),
        subject = %config.nats.subject,
        clickhouse = %config.clickhouse.url,
        table = %format!("{}.{}", config.clickhouse.database, config.clickhouse.table),
        "goodslog starting"
    );

    let mut pipeline = match Pipeline::connect(&config).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "startup failed");
            return Err(e).context("failed to start pipeline");
        }
    };

    wait_for_shutdown().await;

    info!("shutdown signal received, stopping pipeline...");
    let report = pipeline.stop().await;
    log_report(&report);

    info!("goodslog shutdown complete");
    Ok(())
}

fn log_report(report: &PipelineReport) {
    if let Some(consumer) = report.consumer {
        info!(
            fetches = consumer.fetches,
            fetch_errors = consumer.fetch_errors,
            messages_received = consumer.messages_received,
            decode_errors = consumer.decode_errors,
            backpressure_drops = consumer.backpressure_drops,
            acks = consumer.acks,
            "consumer summary"
        );
    }

    if let Some(accumulator) = report.accumulator {
        info!(
            events_received = accumulator.events_received,
            flushes = accumulator.flushes,
            flush_failures = accumulator.flush_failures,
            rows_written = accumulator.rows_written,
            rows_lost = accumulator.rows_lost,
            avg_flush_rows = accumulator.avg_flush_rows(),
            flush_time = ?accumulator.flush_duration,
            "accumulator summary"
        );
    }
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
