//! Configuration validation
//!
//! Rejects configs the pipeline cannot start with:
//! - Empty connection or naming fields
//! - Zero batch size, zero port
//! - Zero durations (a zero flush interval would spin the timer)
//! - Batch sizes above [`MAX_BATCH_SIZE`] and durations above
//!   [`MAX_INTERVAL`]

use std::time::Duration;

use crate::Config;
use crate::clickhouse::ClickHouseSinkConfig;
use crate::error::{ConfigError, Result};
use crate::nats::NatsSourceConfig;

/// Largest accepted `batch_size`
///
/// Sizes the fetch, the flush, and twice over the channel.
pub const MAX_BATCH_SIZE: usize = 100_000;

/// Largest accepted `ack_wait` and `flush_interval`
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_nats(&config.nats)?;
    validate_clickhouse(&config.clickhouse)?;
    Ok(())
}

fn validate_nats(nats: &NatsSourceConfig) -> Result<()> {
    require_non_empty("nats", "host", &nats.host)?;
    require_non_empty("nats", "stream_name", &nats.stream_name)?;
    require_non_empty("nats", "subject", &nats.subject)?;
    require_non_empty("nats", "consumer_name", &nats.consumer_name)?;

    if nats.port == 0 {
        return Err(ConfigError::invalid_value("nats", "port", "must be non-zero"));
    }

    if nats.batch_size == 0 {
        return Err(ConfigError::invalid_value(
            "nats",
            "batch_size",
            "must be at least 1",
        ));
    }

    if nats.batch_size > MAX_BATCH_SIZE {
        return Err(ConfigError::invalid_value(
            "nats",
            "batch_size",
            format!("must be at most {MAX_BATCH_SIZE}"),
        ));
    }

    require_interval("nats", "ack_wait", nats.ack_wait)?;

    Ok(())
}

fn validate_clickhouse(clickhouse: &ClickHouseSinkConfig) -> Result<()> {
    require_non_empty("clickhouse", "url", &clickhouse.url)?;
    require_non_empty("clickhouse", "database", &clickhouse.database)?;
    require_non_empty("clickhouse", "table", &clickhouse.table)?;
    require_interval("clickhouse", "flush_interval", clickhouse.flush_interval)?;
    Ok(())
}

fn require_non_empty(section: &'static str, field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::missing_field(section, field));
    }
    Ok(())
}

fn require_interval(section: &'static str, field: &'static str, value: Duration) -> Result<()> {
    if value.is_zero() {
        return Err(ConfigError::invalid_value(section, field, "must be positive"));
    }
    if value > MAX_INTERVAL {
        return Err(ConfigError::invalid_value(section, field, "must be at most 24h"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_subject_rejected() {
        let err = Config::from_str("[nats]\nsubject = \"\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                section: "nats",
                field: "subject"
            }
        ));
    }

    #[test]
    fn test_blank_consumer_name_rejected() {
        let err = Config::from_str("[nats]\nconsumer_name = \"   \"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                field: "consumer_name",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_port_rejected() {
        let err = Config::from_str("[nats]\nport = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "port", .. }));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = Config::from_str("[nats]\nbatch_size = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "batch_size",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_flush_interval_rejected() {
        let err = Config::from_str("[clickhouse]\nflush_interval = \"0s\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "clickhouse",
                field: "flush_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_ack_wait_rejected() {
        let err = Config::from_str("[nats]\nack_wait = \"0s\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "ack_wait", .. }));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = Config::from_str("[clickhouse]\ntable = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "table", .. }));
    }

    #[test]
    fn test_oversized_batch_size_rejected() {
        let err = Config::from_str(&format!("[nats]\nbatch_size = {}", MAX_BATCH_SIZE + 1))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "batch_size",
                ..
            }
        ));
    }

    #[test]
    fn test_max_batch_size_accepted() {
        let config = Config::from_str(&format!("[nats]\nbatch_size = {MAX_BATCH_SIZE}")).unwrap();
        assert_eq!(config.nats.batch_size, MAX_BATCH_SIZE);
    }

    #[test]
    fn test_huge_flush_interval_rejected() {
        let err = Config::from_str("[clickhouse]\nflush_interval = \"500000000000years\"")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "clickhouse",
                field: "flush_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_day_long_flush_interval_accepted() {
        let config = Config::from_str("[clickhouse]\nflush_interval = \"24h\"").unwrap();
        assert_eq!(config.clickhouse.flush_interval, MAX_INTERVAL);
    }

    #[test]
    fn test_oversized_ack_wait_rejected() {
        let err = Config::from_str("[nats]\nack_wait = \"25h\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "ack_wait", .. }));
    }
}
