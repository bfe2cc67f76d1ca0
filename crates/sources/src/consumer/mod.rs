//! Stream consumer - pull loop feeding the accumulator
//!
//! Each iteration fetches up to `batch_size` messages, decodes them, offers
//! each event to the bounded channel without waiting, and then acks every
//! message the channel accepted.
//!
//! # Delivery
//!
//! | Outcome | Ack | Log |
//! |---------|-----|-----|
//! | decoded, channel accepted | yes | - |
//! | decoded, channel full | no | warn |
//! | decode failure | no | warn |
//! | channel closed | no | info, consumer stops |
//!
//! The ack happens when the event is handed to the accumulator, before it
//! reaches the store. A failed flush afterwards loses acknowledged events.
//!
//! # Shutdown
//!
//! Cancellation is checked between iterations; a fetch in progress finishes
//! first. On exit the consumer closes the stream, then cancels the flush
//! signal so the accumulator drains the channel and flushes once more.

mod metrics;

use std::sync::Arc;
use std::time::Duration;

use goodslog_protocol::GoodEvent;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::stream::{MessageStream, StreamMessage};

pub use metrics::{ConsumerMetrics, ConsumerMetricsSnapshot};

/// Upper bound on one fetch when the stream is idle
pub const FETCH_WAIT: Duration = Duration::from_secs(2);

/// Pause after a failed fetch
pub const FETCH_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Consumer tuning
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Messages per fetch
    pub batch_size: usize,

    /// Fetch wait bound
    pub fetch_wait: Duration,

    /// Pause after a failed fetch
    pub error_backoff: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            fetch_wait: FETCH_WAIT,
            error_backoff: FETCH_ERROR_BACKOFF,
        }
    }
}

impl ConsumerConfig {
    /// Config with the given fetch size and default timings
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Default::default()
        }
    }
}

/// Pulls from a [`MessageStream`] into the accumulator channel
pub struct StreamConsumer<S: MessageStream> {
    stream: S,
    sender: mpsc::Sender<GoodEvent>,
    flush_signal: CancellationToken,
    config: ConsumerConfig,
    metrics: Arc<ConsumerMetrics>,
}

impl<S: MessageStream> StreamConsumer<S> {
    /// Create a consumer
    ///
    /// `flush_signal` is cancelled when the consumer exits, for any reason.
    pub fn new(
        stream: S,
        sender: mpsc::Sender<GoodEvent>,
        flush_signal: CancellationToken,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            stream,
            sender,
            flush_signal,
            config,
            metrics: Arc::new(ConsumerMetrics::new()),
        }
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<ConsumerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run until cancelled or the channel closes
    pub async fn run(mut self, cancel: CancellationToken) -> ConsumerMetricsSnapshot {
        tracing::info!(
            batch_size = self.config.batch_size,
            fetch_wait = ?self.config.fetch_wait,
            "stream consumer starting"
        );

        while !cancel.is_cancelled() {
            let messages = match self
                .stream
                .fetch(self.config.batch_size, self.config.fetch_wait)
                .await
            {
                Ok(messages) => messages,
                Err(e) => {
                    self.metrics.record_fetch_error();
                    tracing::warn!(
                        error = %e,
                        backoff = ?self.config.error_backoff,
                        "fetch failed, retrying"
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.config.error_backoff) => continue,
                    }
                }
            };

            self.metrics.record_fetch(messages.len());

            if !self.process(messages).await {
                tracing::info!("accumulator gone, stream consumer stopping");
                break;
            }
        }

        self.stream.close().await;
        self.flush_signal.cancel();

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            messages_received = snapshot.messages_received,
            events_enqueued = snapshot.events_enqueued,
            decode_errors = snapshot.decode_errors,
            backpressure_drops = snapshot.backpressure_drops,
            acks = snapshot.acks,
            ack_errors = snapshot.ack_errors,
            "stream consumer stopped"
        );
        snapshot
    }

    /// Decode, enqueue and ack one fetched batch
    ///
    /// Returns false once the channel is closed.
    async fn process(&mut self, messages: Vec<S::Message>) -> bool {
        let mut accepted = Vec::with_capacity(messages.len());
        let mut open = true;

        for message in messages {
            let event = match GoodEvent::decode(message.payload()) {
                Ok(event) => event,
                Err(e) => {
                    self.metrics.record_decode_error();
                    tracing::warn!(
                        error = %e,
                        payload_len = message.payload().len(),
                        "skipping undecodable message"
                    );
                    continue;
                }
            };

            match self.sender.try_send(event) {
                Ok(()) => {
                    self.metrics.record_enqueued();
                    accepted.push(message);
                }
                Err(TrySendError::Full(event)) => {
                    self.metrics.record_backpressure_drop();
                    tracing::warn!(
                        id = event.id,
                        project_id = event.project_id,
                        "accumulator channel full, event dropped without ack"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    open = false;
                    break;
                }
            }
        }

        for message in &accepted {
            match self.stream.ack(message).await {
                Ok(()) => self.metrics.record_ack(),
                Err(e) => {
                    self.metrics.record_ack_error();
                    tracing::warn!(error = %e, "failed to ack message");
                }
            }
        }

        open
    }
}
