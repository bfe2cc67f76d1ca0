//! goodslog Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid config: every field falls back to a default that
//! points at a local NATS server and a local ClickHouse.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use goodslog_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[nats]\nbatch_size = 50").unwrap();
//! assert_eq!(config.nats.batch_size, 50);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "json"
//!
//! [nats]
//! host = "nats"
//! stream_name = "GOODS"
//! subject = "goods.logs"
//! consumer_name = "goods-logs-consumer"
//! ack_wait = "30s"
//! batch_size = 10
//!
//! [clickhouse]
//! url = "http://clickhouse:8123"
//! database = "catalog"
//! table = "goods"
//! flush_interval = "30s"
//! ```

mod clickhouse;
mod error;
mod logging;
mod nats;
mod validation;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use clickhouse::ClickHouseSinkConfig;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use nats::NatsSourceConfig;
pub use validation::{MAX_BATCH_SIZE, MAX_INTERVAL};

use serde::Deserialize;

/// Environment variable consulted when no `--config` flag is given
pub const CONFIG_ENV_VAR: &str = "GOODSLOG_CONFIG";

/// Config files probed, in order, when neither flag nor env var is set
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["configs/config.toml", "config.toml"];

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Durable stream subscription (NATS JetStream)
    pub nats: NatsSourceConfig,

    /// Analytical store (ClickHouse) and flush timing
    pub clickhouse: ClickHouseSinkConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Pick the config file to load
///
/// Priority: explicit path > `GOODSLOG_CONFIG` value > first existing entry
/// of `DEFAULT_CONFIG_PATHS`. Returns `None` when nothing applies, in which
/// case the caller runs on defaults.
pub fn resolve_config_path(explicit: Option<&Path>, env_value: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(value) = env_value
        && !value.is_empty()
    {
        return Some(PathBuf::from(value));
    }

    DEFAULT_CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}
