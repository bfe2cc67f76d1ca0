//! goodslog - Sources
//!
//! Pulls change notifications from a durable message stream and hands the
//! decoded [`GoodEvent`](goodslog_protocol::GoodEvent)s to the accumulator.
//!
//! # Architecture
//!
//! ```text
//! [JetStream] --fetch--> [StreamConsumer] --try_send--> mpsc --> [Accumulator]
//!                               |
//!                               +--ack (only for events the channel accepted)
//! ```
//!
//! The broker is reached through the [`MessageStream`] trait so the consumer
//! runs unchanged against [`MemoryStream`] in tests.
//!
//! # Available Streams
//!
//! | Stream | Purpose |
//! |--------|---------|
//! | `jetstream` | NATS JetStream durable pull consumer |
//! | `memory` | Scripted in-process stream (tests) |

pub mod consumer;
pub mod jetstream;
pub mod memory;

mod error;
mod stream;

pub use consumer::{
    ConsumerConfig, ConsumerMetrics, ConsumerMetricsSnapshot, FETCH_ERROR_BACKOFF, FETCH_WAIT,
    StreamConsumer,
};
pub use error::StreamError;
pub use jetstream::{JetStreamConfig, JetStreamSource};
pub use memory::{MemoryMessage, MemoryStream};
pub use stream::{MessageStream, StreamMessage};
