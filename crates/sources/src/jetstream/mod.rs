//! JetStream source - durable pull consumer on a NATS stream
//!
//! Binds (or creates) one durable consumer with explicit acknowledgment on an
//! existing stream, then serves [`MessageStream::fetch`] as bounded batch
//! pulls.
//!
//! # Consumer Settings
//!
//! | Setting | Value |
//! |---------|-------|
//! | durable name | `consumer_name` |
//! | deliver policy | new (messages from creation onward) |
//! | ack policy | explicit |
//! | max deliver | 1 |
//! | ack wait | `ack_wait` |
//! | filter subject | `subject` |
//!
//! With max deliver 1 a message that is never acknowledged is not
//! redelivered.
//!
//! # Example
//!
//! ```ignore
//! use goodslog_sources::{JetStreamConfig, JetStreamSource};
//!
//! let source = JetStreamSource::connect(JetStreamConfig::default()).await?;
//! ```

use std::time::Duration;

use async_nats::jetstream::{
    self,
    consumer::{AckPolicy, DeliverPolicy, PullConsumer, pull},
};
use futures_util::StreamExt;

use crate::error::StreamError;
use crate::stream::{MessageStream, StreamMessage};

// =============================================================================
// Configuration
// =============================================================================

/// Connection and consumer settings
#[derive(Debug, Clone)]
pub struct JetStreamConfig {
    /// Server URL (e.g., "nats://localhost:4222")
    pub url: String,

    /// Username/password pair, if the server requires auth
    pub credentials: Option<(String, String)>,

    /// Existing stream to consume from
    pub stream_name: String,

    /// Filter subject
    pub subject: String,

    /// Durable consumer name
    pub consumer_name: String,

    /// Time the broker waits for an ack before the delivery is considered failed
    pub ack_wait: Duration,
}

impl Default for JetStreamConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".into(),
            credentials: None,
            stream_name: "GOODS".into(),
            subject: "goods.logs".into(),
            consumer_name: "goods-logs-consumer".into(),
            ack_wait: Duration::from_secs(30),
        }
    }
}

impl JetStreamConfig {
    /// Durable pull consumer definition for this config
    pub fn consumer_config(&self) -> pull::Config {
        pull::Config {
            durable_name: Some(self.consumer_name.clone()),
            deliver_policy: DeliverPolicy::New,
            ack_policy: AckPolicy::Explicit,
            max_deliver: 1,
            ack_wait: self.ack_wait,
            filter_subject: self.subject.clone(),
            ..Default::default()
        }
    }
}

// =============================================================================
// Source
// =============================================================================

/// Live JetStream subscription
pub struct JetStreamSource {
    client: async_nats::Client,
    consumer: Option<PullConsumer>,
    config: JetStreamConfig,
}

impl JetStreamSource {
    /// Connect, look up the stream, and ensure the durable consumer exists
    ///
    /// Every failure here is a startup failure.
    pub async fn connect(config: JetStreamConfig) -> Result<Self, StreamError> {
        let mut options = async_nats::ConnectOptions::new().name("goodslog");
        if let Some((user, password)) = &config.credentials {
            options = options.user_and_password(user.clone(), password.clone());
        }

        let client = options
            .connect(config.url.as_str())
            .await
            .map_err(|e| StreamError::connect(&config.url, e))?;

        let context = jetstream::new(client.clone());

        let stream = context
            .get_stream(&config.stream_name)
            .await
            .map_err(|e| StreamError::stream(&config.stream_name, e))?;

        let consumer: PullConsumer = stream
            .get_or_create_consumer(&config.consumer_name, config.consumer_config())
            .await
            .map_err(|e| StreamError::consumer(&config.consumer_name, e))?;

        tracing::info!(
            url = %config.url,
            stream = %config.stream_name,
            subject = %config.subject,
            consumer = %config.consumer_name,
            "jetstream consumer ready"
        );

        Ok(Self {
            client,
            consumer: Some(consumer),
            config,
        })
    }
}

impl StreamMessage for jetstream::Message {
    fn payload(&self) -> &[u8] {
        &self.message.payload
    }
}

impl MessageStream for JetStreamSource {
    type Message = jetstream::Message;

    async fn fetch(
        &mut self,
        max: usize,
        wait: Duration,
    ) -> Result<Vec<Self::Message>, StreamError> {
        let Some(consumer) = self.consumer.as_ref() else {
            return Err(StreamError::fetch("subscription closed"));
        };

        let mut batch = consumer
            .batch()
            .max_messages(max)
            .expires(wait)
            .messages()
            .await
            .map_err(StreamError::fetch)?;

        let mut messages = Vec::with_capacity(max);
        while let Some(item) = batch.next().await {
            match item {
                Ok(message) => messages.push(message),
                // Keep what arrived before the error; the next fetch retries.
                Err(e) if !messages.is_empty() => {
                    tracing::warn!(error = %e, received = messages.len(), "fetch ended early");
                    break;
                }
                Err(e) => return Err(StreamError::fetch(e)),
            }
        }

        Ok(messages)
    }

    async fn ack(&self, message: &Self::Message) -> Result<(), StreamError> {
        message.ack().await.map_err(StreamError::ack)
    }

    async fn close(&mut self) {
        if self.consumer.take().is_none() {
            return;
        }

        if let Err(e) = self.client.flush().await {
            tracing::warn!(error = %e, "failed to flush nats connection on close");
        }

        tracing::info!(consumer = %self.config.consumer_name, "jetstream subscription closed");
    }
}
