//! Logger configuration loading
//!
//! The configuration document for a profile lives at
//! `<dir>/logger.<profile>.yml`. The profile comes from `SQLSCOPE_ENV`
//! (a `.env` file is honoured) and defaults to `develop`.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::LogConfig;
use crate::error::{ConfigurationError, Result};

/// Environment variable naming the active profile.
pub const PROFILE_ENV: &str = "SQLSCOPE_ENV";
/// Profile used when `SQLSCOPE_ENV` is unset.
pub const DEFAULT_PROFILE: &str = "develop";

/// Name of the active profile.
pub fn current_profile() -> String {
    dotenvy::dotenv().ok();
    std::env::var(PROFILE_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// Path of the configuration document for `profile` under `dir`.
pub fn config_path(dir: &Path, profile: &str) -> PathBuf {
    dir.join(format!("logger.{}.yml", profile))
}

/// Load configuration from a YAML file
///
/// Also applies SQLSCOPE_LOG_* env var overrides after loading.
pub fn load_config(path: &Path) -> Result<LogConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&contents)
}

/// Load configuration from a YAML string (useful for testing)
pub fn load_config_from_str(yaml: &str) -> Result<LogConfig> {
    let mut config: LogConfig = serde_yaml::from_str(yaml)?;
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Apply SQLSCOPE_LOG_* environment variable overrides to a config.
///
/// Supported env vars:
/// - `SQLSCOPE_LOG_LEVEL` - Override level
/// - `SQLSCOPE_LOG_ENCODING` - Override encoding
/// - `SQLSCOPE_LOG_FILE` - Override the rotated file path
pub fn apply_env_overrides(config: &mut LogConfig) {
    if let Ok(val) = std::env::var("SQLSCOPE_LOG_LEVEL") {
        debug!("Overriding level from SQLSCOPE_LOG_LEVEL");
        config.level = val;
    }
    if let Ok(val) = std::env::var("SQLSCOPE_LOG_ENCODING") {
        debug!("Overriding encoding from SQLSCOPE_LOG_ENCODING");
        config.encoding = val;
    }
    if let Ok(val) = std::env::var("SQLSCOPE_LOG_FILE") {
        debug!("Overriding rotation filename from SQLSCOPE_LOG_FILE");
        config.rotation.filename = PathBuf::from(val);
    }
}
