//! Shared test utilities and fixtures for SQLScope integration tests.

pub use sqlscope_core::{Encoding, LogConfig, LogLevel, ScalarValue, SqlEvent, TraceArg};
pub use sqlscope_logging::{Logger, LoggerOptions, MemorySink};

/// In-memory logger helpers
pub mod memory {
    use super::*;
    use sqlscope_logging::{assemble, CompositeSink};
    use std::sync::Arc;

    /// A logger writing to memory, with its output and error sinks
    pub struct MemoryLogger {
        pub logger: Arc<Logger>,
        pub output: MemorySink,
        pub errors: MemorySink,
    }

    /// Create a logger at debug level without caller or stack traces
    pub fn debug_logger(encoding: Encoding) -> MemoryLogger {
        memory_logger(
            encoding,
            LoggerOptions {
                level: LogLevel::Debug,
                development: false,
                add_caller: false,
                stacktrace_level: None,
            },
        )
    }

    /// Create a logger with the given options
    pub fn memory_logger(encoding: Encoding, options: LoggerOptions) -> MemoryLogger {
        let output = MemorySink::new();
        let errors = MemorySink::new();
        let logger = assemble(
            encoding,
            CompositeSink::new(vec![Arc::new(output.clone())]),
            CompositeSink::new(vec![Arc::new(errors.clone())]),
            options,
        );
        MemoryLogger {
            logger: Arc::new(logger),
            output,
            errors,
        }
    }
}

/// Configuration fixtures
pub mod fixtures {
    use std::path::Path;

    /// Logger configuration writing JSON to a rotating file under `dir`
    pub fn file_config_yaml(dir: &Path, level: &str) -> String {
        format!(
            r#"level: {level}
encoding: json
outputPaths:
  - {log}
errorOutputPaths:
  - stderr
development: false
disableCaller: true
disableStacktrace: true
rotation:
  filename: {log}
  maxSize: 1
  maxBackups: 3
  maxAge: 7
  compress: false
"#,
            level = level,
            log = dir.join("sqlscope.log").display()
        )
    }

    /// Write a `logger.<profile>.yml` into `dir`, returning its path
    pub fn write_profile_config(dir: &Path, profile: &str, yaml: &str) -> std::path::PathBuf {
        let path = dir.join(format!("logger.{}.yml", profile));
        std::fs::write(&path, yaml).expect("Failed to write config");
        path
    }

    /// A typical driver payload for a positional query
    pub fn select_book_args() -> Vec<super::TraceArg> {
        use super::{ScalarValue, TraceArg};
        vec![
            TraceArg::from("sql"),
            TraceArg::from("book_repository.rs:42"),
            TraceArg::from(std::time::Duration::from_micros(1500)),
            TraceArg::from("SELECT * FROM book WHERE title = ? AND isbn = ?"),
            TraceArg::Values(vec![
                ScalarValue::from("Go in Action"),
                ScalarValue::from("9781617291784"),
            ]),
            TraceArg::from(1_i64),
        ]
    }
}

/// Database test helpers
pub mod db {
    use sqlscope_logging::Logger;
    use sqlscope_storage::TracedConnection;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Database file name
    const DB_FILE: &str = "sqlscope.db";

    /// Create a temporary traced database for testing
    pub struct TestDatabase {
        pub db: TracedConnection,
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        /// Create a new test database in a temporary directory
        pub fn new(logger: Arc<Logger>) -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join("data").join(DB_FILE);
            let db = TracedConnection::open(&db_path, logger).expect("Failed to open test database");
            Self {
                db,
                db_path,
                _temp_dir: temp_dir,
            }
        }

        /// Get the full database file path
        pub fn db_path(&self) -> &Path {
            &self.db_path
        }
    }
}
