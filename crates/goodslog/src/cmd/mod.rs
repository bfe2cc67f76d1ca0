//! Subcommands and shared config loading

pub mod clickhouse;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use goodslog_config::{CONFIG_ENV_VAR, Config, resolve_config_path};

/// Load configuration for any subcommand
///
/// A path given by flag or env var must exist. Without either, the default
/// locations are probed and built-in defaults are used when none exists.
/// Returns the config and the file it came from.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let env_value = std::env::var(CONFIG_ENV_VAR).ok();
    load_config_from(explicit, env_value.as_deref())
}

fn load_config_from(
    explicit: Option<&Path>,
    env_value: Option<&str>,
) -> Result<(Config, Option<PathBuf>)> {
    let Some(path) = resolve_config_path(explicit, env_value) else {
        return Ok((Config::default(), None));
    };

    if !path.exists() {
        return Err(anyhow::anyhow!(
            "config file not found: {}",
            path.display()
        ));
    }

    let config = Config::from_file(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok((config, Some(path)))
}
