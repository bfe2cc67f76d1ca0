//! NATS JetStream source configuration
//!
//! Where the pipeline pulls change events from, and how much it pulls at once.

use serde::Deserialize;
use std::time::Duration;

/// Durable stream subscription settings
///
/// # Example
///
/// ```toml
/// [nats]
/// host = "nats"
/// port = 4222
/// user = "ingest"
/// password = "secret"
/// stream_name = "GOODS"
/// subject = "goods.logs"
/// consumer_name = "goods-logs-consumer"
/// ack_wait = "30s"
/// batch_size = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NatsSourceConfig {
    /// Broker host
    /// Default: "localhost"
    pub host: String,

    /// Broker port
    /// Default: 4222
    pub port: u16,

    /// Username, empty for an unauthenticated connection
    /// Default: ""
    pub user: String,

    /// Password
    /// Default: ""
    pub password: String,

    /// JetStream stream that holds the subject
    /// Default: "GOODS"
    pub stream_name: String,

    /// Subject the change events are published on
    /// Default: "goods.logs"
    pub subject: String,

    /// Durable consumer name (survives restarts)
    /// Default: "goods-logs-consumer"
    pub consumer_name: String,

    /// How long the broker waits for an ack before giving up on a message
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub ack_wait: Duration,

    /// Messages per fetch, and rows per bulk insert
    /// Default: 10
    pub batch_size: usize,
}

impl Default for NatsSourceConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 4222,
            user: String::new(),
            password: String::new(),
            stream_name: "GOODS".into(),
            subject: "goods.logs".into(),
            consumer_name: "goods-logs-consumer".into(),
            ack_wait: Duration::from_secs(30),
            batch_size: 10,
        }
    }
}

impl NatsSourceConfig {
    /// Server address in `nats://host:port` form
    ///
    /// Credentials are kept out of the URL so it is safe to log.
    pub fn server_url(&self) -> String {
        format!("nats://{}:{}", self.host, self.port)
    }

    /// Credentials, if a username is configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.user.is_empty() {
            None
        } else {
            Some((self.user.as_str(), self.password.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NatsSourceConfig::default();
        assert_eq!(config.server_url(), "nats://localhost:4222");
        assert_eq!(config.ack_wait, Duration::from_secs(30));
        assert_eq!(config.batch_size, 10);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_credentials() {
        let config = NatsSourceConfig {
            user: "ingest".into(),
            password: "secret".into(),
            ..Default::default()
        };
        assert_eq!(config.credentials(), Some(("ingest", "secret")));
        assert!(!config.server_url().contains("secret"));
    }

    #[test]
    fn test_deserialize_humantime() {
        let config: NatsSourceConfig = toml::from_str("ack_wait = \"1m 30s\"").unwrap();
        assert_eq!(config.ack_wait, Duration::from_secs(90));
        assert_eq!(config.subject, "goods.logs");
    }
}
