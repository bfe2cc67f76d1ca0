//! Lifecycle controller
//!
//! Wires one [`MessageStream`] to one [`BulkSink`] through a bounded channel
//! and runs the consumer and the accumulator as separate tasks.
//!
//! # Shutdown Order
//!
//! 1. cancel the consumer and wait for it (bounded by `shutdown_timeout`)
//! 2. make sure the flush signal fired (the consumer fires it on exit)
//! 3. wait for the accumulator to drain and flush
//!
//! Stopping twice returns the first report.

use std::sync::Arc;
use std::time::Duration;

use goodslog_config::{Config, MAX_BATCH_SIZE, MAX_INTERVAL};
use goodslog_sinks::{BulkSink, ClickHouseConfig, ClickHouseSink};
use goodslog_sources::{
    ConsumerConfig, ConsumerMetrics, ConsumerMetricsSnapshot, FETCH_ERROR_BACKOFF, FETCH_WAIT,
    JetStreamConfig, JetStreamSource, MessageStream, StreamConsumer,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::accumulator::{Accumulator, AccumulatorConfig};
use crate::error::{PipelineError, Result};
use crate::metrics::{AccumulatorMetrics, AccumulatorMetricsSnapshot};

/// Default bound on each shutdown wait
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Pipeline tuning
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Events per fetch and per size-triggered flush
    pub batch_size: usize,

    /// Flush a partial batch after this long
    pub flush_interval: Duration,

    /// Upper bound on one idle fetch
    pub fetch_wait: Duration,

    /// Pause after a failed fetch
    pub fetch_error_backoff: Duration,

    /// Bound on each wait during [`Pipeline::stop`]
    pub shutdown_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            flush_interval: Duration::from_secs(30),
            fetch_wait: FETCH_WAIT,
            fetch_error_backoff: FETCH_ERROR_BACKOFF,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    /// Set batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set flush interval
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set shutdown timeout
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Capacity of the consumer-to-accumulator channel
    pub fn channel_capacity(&self) -> usize {
        self.batch_size.saturating_mul(2)
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(PipelineError::InvalidConfig(format!(
                "batch_size must be at most {MAX_BATCH_SIZE}"
            )));
        }
        if self.flush_interval.is_zero() {
            return Err(PipelineError::InvalidConfig(
                "flush_interval must be greater than zero".into(),
            ));
        }
        if self.flush_interval > MAX_INTERVAL {
            return Err(PipelineError::InvalidConfig(
                "flush_interval must be at most 24h".into(),
            ));
        }
        Ok(())
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.nats.batch_size,
            flush_interval: config.clickhouse.flush_interval,
            ..Default::default()
        }
    }
}

/// Build the JetStream settings from the `[nats]` section
pub fn jetstream_config(config: &Config) -> JetStreamConfig {
    let nats = &config.nats;
    JetStreamConfig {
        url: nats.server_url(),
        credentials: nats
            .credentials()
            .map(|(user, password)| (user.to_string(), password.to_string())),
        stream_name: nats.stream_name.clone(),
        subject: nats.subject.clone(),
        consumer_name: nats.consumer_name.clone(),
        ack_wait: nats.ack_wait,
    }
}

/// Build the ClickHouse settings from the `[clickhouse]` section
pub fn clickhouse_config(config: &Config) -> ClickHouseConfig {
    let ch = &config.clickhouse;
    let mut sink = ClickHouseConfig::default()
        .with_url(&ch.url)
        .with_database(&ch.database)
        .with_table(&ch.table);
    if !ch.username.is_empty() {
        sink = sink.with_credentials(&ch.username, &ch.password);
    }
    sink
}

/// Final metrics of a stopped pipeline
///
/// A task that did not finish within the shutdown timeout, or panicked,
/// reports `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub consumer: Option<ConsumerMetricsSnapshot>,
    pub accumulator: Option<AccumulatorMetricsSnapshot>,
}

/// Running pipeline
pub struct Pipeline {
    cancel: CancellationToken,
    flush_signal: CancellationToken,
    consumer: Option<JoinHandle<ConsumerMetricsSnapshot>>,
    accumulator: Option<JoinHandle<AccumulatorMetricsSnapshot>>,
    consumer_metrics: Arc<ConsumerMetrics>,
    accumulator_metrics: Arc<AccumulatorMetrics>,
    shutdown_timeout: Duration,
    report: Option<PipelineReport>,
}

impl Pipeline {
    /// Start a pipeline over any stream and sink
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S, K>(stream: S, sink: K, config: PipelineConfig) -> Result<Self>
    where
        S: MessageStream,
        K: BulkSink,
    {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.channel_capacity());
        let cancel = CancellationToken::new();
        let flush_signal = CancellationToken::new();

        let accumulator = Accumulator::new(
            rx,
            sink,
            AccumulatorConfig {
                batch_size: config.batch_size,
                flush_interval: config.flush_interval,
            },
        );

        let consumer = StreamConsumer::new(
            stream,
            tx,
            flush_signal.clone(),
            ConsumerConfig {
                batch_size: config.batch_size,
                fetch_wait: config.fetch_wait,
                error_backoff: config.fetch_error_backoff,
            },
        );

        let consumer_metrics = consumer.metrics();
        let accumulator_metrics = accumulator.metrics();

        let accumulator = tokio::spawn(accumulator.run(flush_signal.clone()));
        let consumer = tokio::spawn(consumer.run(cancel.clone()));

        tracing::info!(
            batch_size = config.batch_size,
            channel_capacity = config.channel_capacity(),
            flush_interval = ?config.flush_interval,
            "pipeline started"
        );

        Ok(Self {
            cancel,
            flush_signal,
            consumer: Some(consumer),
            accumulator: Some(accumulator),
            consumer_metrics,
            accumulator_metrics,
            shutdown_timeout: config.shutdown_timeout,
            report: None,
        })
    }

    /// Connect to ClickHouse and JetStream, then start
    ///
    /// The store is pinged first; any connection failure aborts startup
    /// before a message is pulled.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pipeline_config = PipelineConfig::from(config);
        pipeline_config.validate()?;

        let sink = ClickHouseSink::connect(clickhouse_config(config)).await?;
        let stream = JetStreamSource::connect(jetstream_config(config)).await?;

        Self::spawn(stream, sink, pipeline_config)
    }

    /// Whether `stop` has not completed yet
    pub fn is_running(&self) -> bool {
        self.report.is_none()
    }

    /// Live consumer counters
    pub fn consumer_metrics(&self) -> ConsumerMetricsSnapshot {
        self.consumer_metrics.snapshot()
    }

    /// Live accumulator counters
    pub fn accumulator_metrics(&self) -> AccumulatorMetricsSnapshot {
        self.accumulator_metrics.snapshot()
    }

    /// Stop gracefully and return the final metrics
    pub async fn stop(&mut self) -> PipelineReport {
        if let Some(report) = self.report {
            return report;
        }

        tracing::info!("pipeline stopping");
        self.cancel.cancel();

        let consumer = match self.consumer.take() {
            Some(handle) => join_with_timeout(handle, self.shutdown_timeout, "consumer").await,
            None => None,
        };

        // No-op when the consumer already fired it on exit.
        self.flush_signal.cancel();

        let accumulator = match self.accumulator.take() {
            Some(handle) => join_with_timeout(handle, self.shutdown_timeout, "accumulator").await,
            None => None,
        };

        let report = PipelineReport {
            consumer,
            accumulator,
        };
        self.report = Some(report);

        tracing::info!(
            consumer_stopped = report.consumer.is_some(),
            accumulator_stopped = report.accumulator.is_some(),
            "pipeline stopped"
        );
        report
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.flush_signal.cancel();
    }
}

async fn join_with_timeout<T>(
    mut handle: JoinHandle<T>,
    timeout: Duration,
    task: &'static str,
) -> Option<T> {
    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            tracing::error!(task, error = %e, "task failed during shutdown");
            None
        }
        Err(_) => {
            tracing::warn!(task, timeout = ?timeout, "task did not stop in time, aborting");
            handle.abort();
            None
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
