//! Accumulator metrics
//!
//! Atomic counters, relaxed ordering. Values may be slightly stale when read
//! from another task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics for the batch accumulator
#[derive(Debug, Default)]
pub struct AccumulatorMetrics {
    /// Events taken off the channel
    events_received: AtomicU64,

    /// Successful flushes
    flushes: AtomicU64,

    /// Failed flushes
    flush_failures: AtomicU64,

    /// Rows the store accepted
    rows_written: AtomicU64,

    /// Rows dropped by failed flushes or left behind on channel close
    rows_lost: AtomicU64,

    /// Total time spent in successful and failed flushes, in nanoseconds
    flush_duration_ns: AtomicU64,
}

impl AccumulatorMetrics {
    /// Create new metrics instance with all counters at zero
    #[inline]
    pub const fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            rows_written: AtomicU64::new(0),
            rows_lost: AtomicU64::new(0),
            flush_duration_ns: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a flush the store accepted
    #[inline]
    pub fn record_flush(&self, rows: usize, duration: Duration) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.rows_written.fetch_add(rows as u64, Ordering::Relaxed);
        self.add_duration(duration);
    }

    /// Record a flush the store rejected
    #[inline]
    pub fn record_flush_failure(&self, rows: usize, duration: Duration) {
        self.flush_failures.fetch_add(1, Ordering::Relaxed);
        self.rows_lost.fetch_add(rows as u64, Ordering::Relaxed);
        self.add_duration(duration);
    }

    /// Record rows discarded without a flush attempt
    #[inline]
    pub fn record_lost(&self, rows: usize) {
        self.rows_lost.fetch_add(rows as u64, Ordering::Relaxed);
    }

    #[inline]
    fn add_duration(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.flush_duration_ns.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> AccumulatorMetricsSnapshot {
        AccumulatorMetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            rows_written: self.rows_written.load(Ordering::Relaxed),
            rows_lost: self.rows_lost.load(Ordering::Relaxed),
            flush_duration: Duration::from_nanos(self.flush_duration_ns.load(Ordering::Relaxed)),
        }
    }
}

/// Point-in-time snapshot of accumulator metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorMetricsSnapshot {
    pub events_received: u64,
    pub flushes: u64,
    pub flush_failures: u64,
    pub rows_written: u64,
    pub rows_lost: u64,
    pub flush_duration: Duration,
}

impl AccumulatorMetricsSnapshot {
    /// Average rows per successful flush
    pub fn avg_flush_rows(&self) -> f64 {
        if self.flushes == 0 {
            0.0
        } else {
            self.rows_written as f64 / self.flushes as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_accounting() {
        let metrics = AccumulatorMetrics::new();

        for _ in 0..5 {
            metrics.record_received();
        }
        metrics.record_flush(3, Duration::from_millis(10));
        metrics.record_flush_failure(2, Duration::from_millis(5));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_received, 5);
        assert_eq!(snapshot.flushes, 1);
        assert_eq!(snapshot.flush_failures, 1);
        assert_eq!(snapshot.rows_written, 3);
        assert_eq!(snapshot.rows_lost, 2);
        assert_eq!(snapshot.flush_duration, Duration::from_millis(15));
    }

    #[test]
    fn test_avg_flush_rows() {
        let metrics = AccumulatorMetrics::new();
        assert_eq!(metrics.snapshot().avg_flush_rows(), 0.0);

        metrics.record_flush(4, Duration::ZERO);
        metrics.record_flush(2, Duration::ZERO);
        assert_eq!(metrics.snapshot().avg_flush_rows(), 3.0);
    }

    #[test]
    fn test_lost_without_flush() {
        let metrics = AccumulatorMetrics::new();
        metrics.record_lost(7);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rows_lost, 7);
        assert_eq!(snapshot.flush_failures, 0);
    }
}
