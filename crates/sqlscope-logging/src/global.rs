//! Process-wide default logger
//!
//! Components that can take an `Arc<Logger>` should; this is the injectable
//! default for call sites that cannot. Install once at startup, before
//! other threads start logging. Installing again replaces the previous
//! logger (last writer wins) but is not meant to race with readers.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use sqlscope_core::config::{config_path, current_profile, load_config};
use sqlscope_core::{ConfigurationError, TraceArg};
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::logger::Logger;
use crate::pipeline::{fallback_logger, LogPipelineBuilder};

lazy_static! {
    static ref INSTALLED: RwLock<Option<Arc<Logger>>> = RwLock::new(None);
    static ref FALLBACK: Arc<Logger> = Arc::new(fallback_logger());
}

/// Make `logger` the process-wide default.
pub fn install(logger: Arc<Logger>) {
    *INSTALLED.write() = Some(logger);
}

/// The installed logger, or a stderr console logger if none was installed.
pub fn logger() -> Arc<Logger> {
    INSTALLED
        .read()
        .clone()
        .unwrap_or_else(|| FALLBACK.clone())
}

pub fn is_installed() -> bool {
    INSTALLED.read().is_some()
}

/// Hand a driver trace payload to the default logger.
#[track_caller]
pub fn print(args: &[TraceArg]) {
    logger().print(args);
}

/// Flush the default logger's sinks.
pub fn sync() -> io::Result<()> {
    logger().sync()
}

/// Build the logger for the active profile from `<config_dir>/logger.<profile>.yml`
/// and install it.
pub fn init_from_profile(config_dir: &Path) -> Result<Arc<Logger>, ConfigurationError> {
    let profile = current_profile();
    init_from_file(&config_path(config_dir, &profile))
}

/// Build the logger from a configuration file and install it.
pub fn init_from_file(path: &Path) -> Result<Arc<Logger>, ConfigurationError> {
    let config = load_config(path)?;
    let logger = Arc::new(LogPipelineBuilder::new(config).build()?);
    install(logger.clone());

    logger.info(format!(
        "Success to read logger configuration: {}",
        path.display()
    ));
    // Startup line is best effort; sinks already opened fine.
    let _ = logger.sync();

    Ok(logger)
}
