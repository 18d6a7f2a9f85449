//! SQLScope Logging Pipeline
//!
//! Builds a structured logger from a [`LogConfig`](sqlscope_core::LogConfig)
//! and turns driver trace payloads into `[sql] : ...` debug records.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              global (install / logger / print)       │
//! ├──────────────────────────────────────────────────────┤
//! │     Logger (levels, caller, stack traces, SQL)       │
//! ├──────────────────────────────────────────────────────┤
//! │  LogPipelineBuilder (encoder + options + sinks)      │
//! ├──────────────────────────────────────────────────────┤
//! │      SinkResolver ──▶ CompositeSink                  │
//! │   (StdStream, RotatingFile, MemorySink)              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use sqlscope_logging::{global, LogPipelineBuilder};
//! use std::sync::Arc;
//!
//! let config = sqlscope_core::config::load_config(path)?;
//! let logger = Arc::new(LogPipelineBuilder::new(config).build()?);
//! global::install(logger.clone());
//!
//! logger.trace_sql(&SqlEvent::new("SELECT * FROM book WHERE id = ?", vec![1.into()]));
//! logger.sync()?;
//! ```

pub mod global;
mod logger;
mod pipeline;
mod rotating;
mod sink;

pub use logger::{Logger, LoggerOptions, LOG_TARGET};
pub use pipeline::{assemble, fallback_logger, ErrorRoutingWriter, LogPipelineBuilder, RoutedWriter};
pub use rotating::RotatingFile;
pub use sink::{CompositeSink, CompositeWriter, MemorySink, Sink, SinkResolver, StdStream};
