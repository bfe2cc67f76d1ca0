//! Stream consumer metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one consumer
#[derive(Debug, Default)]
pub struct ConsumerMetrics {
    /// Fetch calls that returned (empty or not)
    pub fetches: AtomicU64,

    /// Fetch calls that failed
    pub fetch_errors: AtomicU64,

    /// Messages pulled from the stream
    pub messages_received: AtomicU64,

    /// Payloads that did not decode
    pub decode_errors: AtomicU64,

    /// Events accepted by the channel
    pub events_enqueued: AtomicU64,

    /// Events dropped because the channel was full
    pub backpressure_drops: AtomicU64,

    /// Successful acks
    pub acks: AtomicU64,

    /// Failed acks
    pub ack_errors: AtomicU64,
}

impl ConsumerMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            fetches: AtomicU64::new(0),
            fetch_errors: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            events_enqueued: AtomicU64::new(0),
            backpressure_drops: AtomicU64::new(0),
            acks: AtomicU64::new(0),
            ack_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_fetch(&self, messages: usize) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.messages_received
            .fetch_add(messages as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_fetch_error(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_enqueued(&self) {
        self.events_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_backpressure_drop(&self) {
        self.backpressure_drops.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_ack(&self) {
        self.acks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_ack_error(&self) {
        self.ack_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> ConsumerMetricsSnapshot {
        ConsumerMetricsSnapshot {
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            events_enqueued: self.events_enqueued.load(Ordering::Relaxed),
            backpressure_drops: self.backpressure_drops.load(Ordering::Relaxed),
            acks: self.acks.load(Ordering::Relaxed),
            ack_errors: self.ack_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of consumer metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerMetricsSnapshot {
    pub fetches: u64,
    pub fetch_errors: u64,
    pub messages_received: u64,
    pub decode_errors: u64,
    pub events_enqueued: u64,
    pub backpressure_drops: u64,
    pub acks: u64,
    pub ack_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_tracking() {
        let metrics = ConsumerMetrics::new();

        metrics.record_fetch(3);
        metrics.record_fetch(0);
        metrics.record_fetch_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.fetches, 2);
        assert_eq!(snapshot.messages_received, 3);
        assert_eq!(snapshot.fetch_errors, 1);
    }

    #[test]
    fn test_delivery_tracking() {
        let metrics = ConsumerMetrics::new();

        metrics.record_enqueued();
        metrics.record_enqueued();
        metrics.record_backpressure_drop();
        metrics.record_decode_error();
        metrics.record_ack();
        metrics.record_ack_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_enqueued, 2);
        assert_eq!(snapshot.backpressure_drops, 1);
        assert_eq!(snapshot.decode_errors, 1);
        assert_eq!(snapshot.acks, 1);
        assert_eq!(snapshot.ack_errors, 1);
    }
}
