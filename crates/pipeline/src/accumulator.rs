//! Batch accumulator
//!
//! Owns the batch buffer and the sink. Three things can flush it:
//!
//! - **size**: the buffer reached `batch_size`; flush and restart the timer
//! - **interval**: the timer fired; flush if non-empty, restart the timer
//! - **shutdown**: the flush signal fired; drain the channel, flush, exit
//!
//! A closed channel ends the loop without a flush. The consumer cancels the
//! flush signal before dropping its sender, so a normal shutdown always
//! takes the drain path.
//!
//! Every flush clears the buffer, whether or not the sink accepted it.

use std::sync::Arc;
use std::time::Duration;

use goodslog_protocol::GoodEvent;
use goodslog_sinks::BulkSink;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::metrics::{AccumulatorMetrics, AccumulatorMetricsSnapshot};

/// Upper bound on the buffer reserved up front
const INITIAL_BATCH_CAPACITY: usize = 1024;

/// Timer deadline when `now + flush_interval` is not representable
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// What caused a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    Size,
    Interval,
    Shutdown,
}

impl FlushTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Interval => "interval",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Accumulator tuning
#[derive(Debug, Clone)]
pub struct AccumulatorConfig {
    /// Flush as soon as this many events are buffered
    pub batch_size: usize,

    /// Flush a partial buffer after this much time without a flush
    pub flush_interval: Duration,
}

/// Buffers events and writes them to a [`BulkSink`] in batches
pub struct Accumulator<K: BulkSink> {
    receiver: mpsc::Receiver<GoodEvent>,
    sink: K,
    batch: Vec<GoodEvent>,
    config: AccumulatorConfig,
    metrics: Arc<AccumulatorMetrics>,
}

impl<K: BulkSink> Accumulator<K> {
    /// Create an accumulator reading from `receiver`
    pub fn new(receiver: mpsc::Receiver<GoodEvent>, sink: K, config: AccumulatorConfig) -> Self {
        Self {
            receiver,
            sink,
            batch: Vec::with_capacity(config.batch_size.min(INITIAL_BATCH_CAPACITY)),
            config,
            metrics: Arc::new(AccumulatorMetrics::new()),
        }
    }

    /// Get a shared handle to the live metrics
    pub fn metrics(&self) -> Arc<AccumulatorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run until the flush signal fires or the channel closes
    pub async fn run(mut self, flush_signal: CancellationToken) -> AccumulatorMetricsSnapshot {
        tracing::info!(
            sink = %self.sink.name(),
            batch_size = self.config.batch_size,
            flush_interval = ?self.config.flush_interval,
            "accumulator starting"
        );

        let timer = tokio::time::sleep(self.config.flush_interval);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                biased;

                _ = flush_signal.cancelled() => {
                    self.drain().await;
                    break;
                }
                event = self.receiver.recv() => {
                    match event {
                        Some(event) => {
                            self.push(event);
                            if self.batch.len() >= self.config.batch_size {
                                self.flush(FlushTrigger::Size).await;
                                timer.as_mut().reset(next_deadline(self.config.flush_interval));
                            }
                        }
                        None => {
                            if !self.batch.is_empty() {
                                self.metrics.record_lost(self.batch.len());
                                tracing::warn!(
                                    batch_size = self.batch.len(),
                                    "channel closed, buffered events discarded"
                                );
                            }
                            break;
                        }
                    }
                }
                _ = &mut timer => {
                    self.flush(FlushTrigger::Interval).await;
                    timer.as_mut().reset(next_deadline(self.config.flush_interval));
                }
            }
        }

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            events_received = snapshot.events_received,
            flushes = snapshot.flushes,
            flush_failures = snapshot.flush_failures,
            rows_written = snapshot.rows_written,
            rows_lost = snapshot.rows_lost,
            "accumulator stopped"
        );
        snapshot
    }

    fn push(&mut self, event: GoodEvent) {
        self.metrics.record_received();
        self.batch.push(event);
    }

    /// Move everything still queued into batches, then flush the remainder
    async fn drain(&mut self) {
        self.receiver.close();

        while let Ok(event) = self.receiver.try_recv() {
            self.push(event);
            if self.batch.len() >= self.config.batch_size {
                self.flush(FlushTrigger::Shutdown).await;
            }
        }

        self.flush(FlushTrigger::Shutdown).await;
    }

    /// Hand the buffer to the sink and clear it
    async fn flush(&mut self, trigger: FlushTrigger) {
        if self.batch.is_empty() {
            return;
        }

        let rows = self.batch.len();
        let start = Instant::now();
        let result = self.sink.append(&self.batch).await;
        let duration = start.elapsed();

        match result {
            Ok(()) => {
                self.metrics.record_flush(rows, duration);
                tracing::info!(
                    batch_size = rows,
                    duration = ?duration,
                    trigger = trigger.as_str(),
                    "batch flushed"
                );
            }
            Err(e) => {
                self.metrics.record_flush_failure(rows, duration);
                tracing::error!(
                    error = %e,
                    batch_size = rows,
                    duration = ?duration,
                    trigger = trigger.as_str(),
                    "flush failed, batch dropped"
                );
            }
        }

        self.batch.clear();
    }
}

fn next_deadline(interval: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(interval).unwrap_or_else(|| now + FAR_FUTURE)
}

#[cfg(test)]
#[path = "accumulator_test.rs"]
mod accumulator_test;
