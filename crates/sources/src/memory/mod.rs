//! Memory stream - scripted in-process message stream
//!
//! Payloads are queued with [`MemoryStream::push`] and handed out in order,
//! up to `max` per fetch. An empty queue makes `fetch` sleep for the full
//! wait and return nothing, like a broker with no traffic. Clones share state
//! so a test can keep a handle after moving the stream into a consumer.
//!
//! Acks are recorded by sequence number. Nothing is ever redelivered.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use goodslog_protocol::GoodEvent;
use parking_lot::Mutex;

use crate::error::StreamError;
use crate::stream::{MessageStream, StreamMessage};

/// Message handed out by [`MemoryStream`]
#[derive(Debug, Clone)]
pub struct MemoryMessage {
    /// Sequence number, starting at 1 in push order
    pub seq: u64,
    payload: Vec<u8>,
}

impl StreamMessage for MemoryMessage {
    fn payload(&self) -> &[u8] {
        &self.payload
    }
}

#[derive(Default)]
struct State {
    queue: VecDeque<MemoryMessage>,
    next_seq: u64,
    acked: Vec<u64>,
    fail_fetches: usize,
    fetches: usize,
    closed: bool,
}

/// In-process [`MessageStream`]
#[derive(Clone, Default)]
pub struct MemoryStream {
    state: Arc<Mutex<State>>,
}

impl MemoryStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw payload, returning its sequence number
    pub fn push(&self, payload: impl Into<Vec<u8>>) -> u64 {
        let mut state = self.state.lock();
        state.next_seq += 1;
        let seq = state.next_seq;
        state.queue.push_back(MemoryMessage {
            seq,
            payload: payload.into(),
        });
        seq
    }

    /// Queue an encoded event, returning its sequence number
    pub fn push_event(&self, event: &GoodEvent) -> u64 {
        // Encoding a plain struct of scalars and strings cannot fail.
        let payload = event.encode().unwrap_or_default();
        self.push(payload)
    }

    /// Make the next `n` fetches fail
    pub fn fail_fetches(&self, n: usize) {
        self.state.lock().fail_fetches = n;
    }

    /// Sequence numbers acknowledged so far, in ack order
    pub fn acked(&self) -> Vec<u64> {
        self.state.lock().acked.clone()
    }

    /// Messages still queued
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Fetch calls made so far, failed ones included
    pub fn fetches(&self) -> usize {
        self.state.lock().fetches
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl MessageStream for MemoryStream {
    type Message = MemoryMessage;

    async fn fetch(
        &mut self,
        max: usize,
        wait: Duration,
    ) -> Result<Vec<Self::Message>, StreamError> {
        let batch = {
            let mut state = self.state.lock();
            state.fetches += 1;

            if state.closed {
                return Err(StreamError::fetch("subscription closed"));
            }

            if state.fail_fetches > 0 {
                state.fail_fetches -= 1;
                return Err(StreamError::fetch("injected failure"));
            }

            let n = max.min(state.queue.len());
            state.queue.drain(..n).collect::<Vec<_>>()
        };

        if batch.is_empty() {
            tokio::time::sleep(wait).await;
        }

        Ok(batch)
    }

    async fn ack(&self, message: &Self::Message) -> Result<(), StreamError> {
        self.state.lock().acked.push(message.seq);
        Ok(())
    }

    async fn close(&mut self) {
        self.state.lock().closed = true;
    }
}
