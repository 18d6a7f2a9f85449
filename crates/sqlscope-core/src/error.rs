//! Error types for sqlscope

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn configuration into a working logger.
///
/// Always fatal to pipeline construction; callers decide whether to abort
/// or fall back to a minimal logger.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Configuration document could not be read
    #[error("Failed to read logger configuration {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid YAML for `LogConfig`
    #[error("Malformed logger configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Structurally valid but unusable configuration
    #[error("Invalid logger configuration: {0}")]
    Invalid(String),

    #[error("Unknown encoding: {0:?}")]
    UnknownEncoding(String),

    #[error("Unknown log level: {0:?}")]
    UnknownLevel(String),

    /// A file destination could not be opened
    #[error("Failed to open log sink {path:?}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for ConfigurationError
pub type Result<T> = std::result::Result<T, ConfigurationError>;
