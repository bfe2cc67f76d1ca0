//! Stream abstraction
//!
//! The three broker operations the consumer needs.

use std::future::Future;
use std::time::Duration;

use crate::error::StreamError;

/// A message pulled from a stream
pub trait StreamMessage: Send + Sync + 'static {
    /// Raw message body
    fn payload(&self) -> &[u8];
}

/// A durable, pull-based message stream with explicit acknowledgment
pub trait MessageStream: Send + 'static {
    /// Message type yielded by [`fetch`](Self::fetch)
    type Message: StreamMessage;

    /// Pull up to `max` messages, waiting at most `wait` for them
    ///
    /// An empty vector means nothing arrived within `wait`; it is not an
    /// error.
    fn fetch(
        &mut self,
        max: usize,
        wait: Duration,
    ) -> impl Future<Output = Result<Vec<Self::Message>, StreamError>> + Send;

    /// Acknowledge one message so the broker will not redeliver it
    fn ack(&self, message: &Self::Message) -> impl Future<Output = Result<(), StreamError>> + Send;

    /// Release the subscription
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
