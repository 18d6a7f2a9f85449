//! Logger configuration document

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Reserved destination name for standard output.
pub const STDOUT: &str = "stdout";
/// Reserved destination name for standard error.
pub const STDERR: &str = "stderr";

/// Logger configuration as loaded from `logger.<profile>.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Minimum level (`debug`, `info`, `warn`, `error`)
    #[serde(default = "default_level")]
    pub level: String,

    /// Encoder name (`console` or `json`); validated when the pipeline is built
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Destinations for log records
    #[serde(default = "default_output_paths")]
    pub output_paths: Vec<String>,

    /// Destinations for the logger's own write failures
    #[serde(default = "default_error_output_paths")]
    pub error_output_paths: Vec<String>,

    #[serde(default)]
    pub development: bool,

    #[serde(default)]
    pub disable_caller: bool,

    #[serde(default)]
    pub disable_stacktrace: bool,

    /// Rotation settings shared by every file destination
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_encoding() -> String {
    "console".to_string()
}

fn default_output_paths() -> Vec<String> {
    vec![STDOUT.to_string()]
}

fn default_error_output_paths() -> Vec<String> {
    vec![STDERR.to_string()]
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            encoding: default_encoding(),
            output_paths: default_output_paths(),
            error_output_paths: default_error_output_paths(),
            development: false,
            disable_caller: false,
            disable_stacktrace: false,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LogConfig {
    /// Check the shape of the document; encoder and level names are checked at build.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.output_paths.is_empty() {
            return Err(ConfigurationError::Invalid(
                "outputPaths must name at least one destination".to_string(),
            ));
        }
        if let Some(path) = self
            .output_paths
            .iter()
            .chain(&self.error_output_paths)
            .find(|p| p.trim().is_empty())
        {
            return Err(ConfigurationError::Invalid(format!(
                "empty output path {:?}",
                path
            )));
        }
        Ok(())
    }
}

/// File rotation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RotationPolicy {
    /// Log file path; empty means "use the destination name"
    pub filename: PathBuf,

    /// Megabytes before the file is rotated (0 means 100)
    pub max_size: u64,

    /// Rotated files to keep (0 keeps all)
    pub max_backups: usize,

    /// Days to keep rotated files (0 disables age-based removal)
    pub max_age: u32,

    /// Gzip rotated files
    pub compress: bool,
}

/// Size used when `maxSize` is 0.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            filename: PathBuf::new(),
            max_size: DEFAULT_MAX_SIZE_MB,
            max_backups: 0,
            max_age: 0,
            compress: false,
        }
    }
}

impl RotationPolicy {
    pub fn max_size_bytes(&self) -> u64 {
        let mb = if self.max_size == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size
        };
        mb.saturating_mul(1024 * 1024)
    }
}

/// Record encoder selected by `encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Human-readable lines
    Console,
    /// One JSON object per line
    Json,
}

impl FromStr for Encoding {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            other => Err(ConfigurationError::UnknownEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => f.write_str("console"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Record severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Threshold at which records carry a stack trace.
    pub fn stacktrace_threshold(development: bool) -> Self {
        if development {
            Self::Warn
        } else {
            Self::Error
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigurationError::UnknownLevel(s.to_string()))
    }
}
