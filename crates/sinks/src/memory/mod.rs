//! Memory sink - records every appended batch
//!
//! Keeps each successful `append` call as its own batch so callers can
//! assert on flush boundaries, not just on the rows that arrived. Clones
//! share the same storage: hand one clone to the pipeline and inspect the
//! other.
//!
//! Failures can be scripted with [`MemorySink::fail_next`] or
//! [`MemorySink::fail_always`]. A failed call records nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use goodslog_protocol::GoodEvent;
use parking_lot::Mutex;

use crate::common::{BulkSink, SinkError};

#[derive(Default)]
struct Inner {
    batches: Mutex<Vec<Vec<GoodEvent>>>,
    calls: AtomicUsize,
    fail_next: AtomicUsize,
    fail_always: AtomicBool,
}

/// In-process sink that stores batches
#[derive(Clone, Default)]
pub struct MemorySink {
    inner: Arc<Inner>,
}

impl MemorySink {
    /// Create an empty memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` append calls
    pub fn fail_next(&self, n: usize) {
        self.inner.fail_next.store(n, Ordering::SeqCst);
    }

    /// Fail every append call until turned off
    pub fn fail_always(&self, enabled: bool) {
        self.inner.fail_always.store(enabled, Ordering::SeqCst);
    }

    /// Snapshot of every recorded batch, in append order
    pub fn batches(&self) -> Vec<Vec<GoodEvent>> {
        self.inner.batches.lock().clone()
    }

    /// Sizes of recorded batches, in append order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.inner.batches.lock().iter().map(Vec::len).collect()
    }

    /// All recorded rows, flattened
    pub fn rows(&self) -> Vec<GoodEvent> {
        self.inner.batches.lock().iter().flatten().cloned().collect()
    }

    /// Number of append calls with a non-empty slice, failed ones included
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    fn should_fail(&self) -> bool {
        if self.inner.fail_always.load(Ordering::SeqCst) {
            return true;
        }
        self.inner
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl BulkSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn append(&self, rows: &[GoodEvent]) -> Result<(), SinkError> {
        if rows.is_empty() {
            return Ok(());
        }

        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail() {
            return Err(SinkError::insert("memory", rows.len(), "injected failure"));
        }

        self.inner.batches.lock().push(rows.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
