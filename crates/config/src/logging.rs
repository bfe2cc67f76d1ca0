//! Logging configuration
//!
//! The level applies to every target, so `debug` and `trace` also surface
//! the NATS and ClickHouse client crates. `--log-level` overrides `level`
//! for one run.

use serde::Deserialize;
use std::str::FromStr;

use crate::error::ConfigError;

/// Minimum severity written
///
/// Each level also writes everything listed below it.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Adds the NATS and HTTP client crates' internal tracing
    Trace,
    /// Adds one line per committed insert
    Debug,
    /// One line per flush with its trigger, plus startup and shutdown summaries
    #[default]
    Info,
    /// Undecodable payloads, backpressure drops, failed acks and fetch retries
    Warn,
    /// Batches the store rejected, and tasks that died during shutdown
    Error,
}

impl LogLevel {
    /// Convert to tracing level filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::invalid_value(
                "log",
                "level",
                format!("unknown level '{other}'"),
            )),
        }
    }
}

/// Line format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text with target and colors, for a terminal
    #[default]
    Console,
    /// One JSON object per line, for a log collector
    Json,
}

/// Log output destination
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output (default)
    #[default]
    Stdout,
    /// Standard error
    Stderr,
    /// Any other value is a path, opened in append mode without colors
    #[serde(untagged)]
    File(String),
}

/// `[log]` section
///
/// # Example
///
/// ```toml
/// [log]
/// level = "info"
/// format = "json"
/// output = "/var/log/goodslog.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `trace`, `debug`, `info` (default), `warn` or `error`
    pub level: LogLevel,

    /// `console` (default) or `json`
    pub format: LogFormat,

    /// `stdout` (default), `stderr`, or a file path
    pub output: LogOutput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.output, LogOutput::Stdout);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "debug"
format = "json"
output = "stderr"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    fn test_deserialize_file_output() {
        let config: LogConfig = toml::from_str("output = \"/tmp/goodslog.log\"").unwrap();
        assert_eq!(config.output, LogOutput::File("/tmp/goodslog.log".into()));
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_as_str_round_trips() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        }
    }
}
