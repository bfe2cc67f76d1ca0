//! goodslog - Pipeline
//!
//! Connects the stream consumer to the bulk sink and owns their lifecycle.
//!
//! # Architecture
//!
//! ```text
//! [StreamConsumer] --try_send--> mpsc(2 x batch_size) --> [Accumulator] --append--> [BulkSink]
//!        |                                                     ^
//!        +------------------ flush signal (on exit) -----------+
//! ```
//!
//! - The batch buffer lives inside the accumulator task; nothing else
//!   touches it.
//! - The consumer never blocks on the channel. A full channel drops the
//!   event without acknowledging it.
//! - Shutdown cancels the consumer first. When it exits it fires the flush
//!   signal, and the accumulator drains the channel and flushes one last
//!   time.
//!
//! # Example
//!
//! ```ignore
//! use goodslog_pipeline::Pipeline;
//!
//! let mut pipeline = Pipeline::connect(&config).await?;
//! wait_for_shutdown().await;
//! let report = pipeline.stop().await;
//! ```

mod accumulator;
mod error;
mod metrics;
mod pipeline;

pub use accumulator::{Accumulator, AccumulatorConfig, FlushTrigger};
pub use error::{PipelineError, Result};
pub use metrics::{AccumulatorMetrics, AccumulatorMetricsSnapshot};
pub use pipeline::{
    DEFAULT_SHUTDOWN_TIMEOUT, Pipeline, PipelineConfig, PipelineReport, clickhouse_config,
    jetstream_config,
};
