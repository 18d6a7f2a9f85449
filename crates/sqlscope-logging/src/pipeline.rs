//! Logger construction from configuration
//!
//! ```text
//! LogConfig ──▶ encoding ──────────────▶ fmt layer (compact / full / json)
//!           ──▶ outputPaths ──┐                      │
//!           ──▶ errorOutputPaths ─▶ SinkResolver     │ writes
//!           ──▶ flags ──▶ LoggerOptions              ▼
//!                                      ErrorRoutingWriter ──▶ output sinks
//!                                               │ on failure
//!                                               ▼
//!                                        error output sinks
//! ```

use sqlscope_core::{ConfigurationError, Encoding, LogConfig, LogLevel};
use std::io::{self, Write};
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;

use crate::logger::{Logger, LoggerOptions};
use crate::sink::{CompositeSink, Sink, SinkResolver};

/// Builds a [`Logger`] from a [`LogConfig`].
pub struct LogPipelineBuilder {
    config: LogConfig,
}

impl LogPipelineBuilder {
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }

    /// Assemble the logger. Any configuration problem fails the build.
    pub fn build(self) -> Result<Logger, ConfigurationError> {
        let config = self.config;
        config.validate()?;

        let encoding: Encoding = config.encoding.parse()?;
        let level: LogLevel = config.level.parse()?;

        let mut resolver = SinkResolver::new();
        let output = resolver.resolve(&config.output_paths, &config.rotation)?;
        let error_output = resolver.resolve(&config.error_output_paths, &config.rotation)?;

        let options = LoggerOptions {
            level,
            development: config.development,
            add_caller: !config.disable_caller,
            stacktrace_level: (!config.disable_stacktrace)
                .then(|| LogLevel::stacktrace_threshold(config.development)),
        };

        Ok(assemble(encoding, output, error_output, options))
    }
}

/// Wire the encoder, sinks and options into a logger.
pub fn assemble(
    encoding: Encoding,
    output: CompositeSink,
    error_output: CompositeSink,
    options: LoggerOptions,
) -> Logger {
    let writer = ErrorRoutingWriter::new(output.clone(), error_output.clone());
    let filter = LevelFilter::from_level(to_tracing_level(options.level));

    let dispatch = match encoding {
        Encoding::Json => Dispatch::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_target(options.development)
                    .with_thread_ids(options.development)
                    .with_ansi(false)
                    .log_internal_errors(false)
                    .with_writer(writer),
            ),
        ),
        Encoding::Console if options.development => Dispatch::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_ansi(false)
                    .log_internal_errors(false)
                    .with_writer(writer),
            ),
        ),
        Encoding::Console => Dispatch::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_ansi(false)
                    .log_internal_errors(false)
                    .with_writer(writer),
            ),
        ),
    };

    Logger::new(dispatch, output, error_output, options)
}

/// Minimal console logger on stderr at info level.
pub fn fallback_logger() -> Logger {
    let stderr = CompositeSink::new(vec![std::sync::Arc::new(crate::StdStream::Stderr)]);
    assemble(
        Encoding::Console,
        stderr.clone(),
        stderr,
        LoggerOptions::default(),
    )
}

fn to_tracing_level(level: LogLevel) -> tracing::Level {
    match level {
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    }
}

/// Writes records to the output sinks and reports failures to the error sinks.
#[derive(Clone, Debug)]
pub struct ErrorRoutingWriter {
    output: CompositeSink,
    errors: CompositeSink,
}

impl ErrorRoutingWriter {
    pub fn new(output: CompositeSink, errors: CompositeSink) -> Self {
        Self { output, errors }
    }

    fn report(&self, err: &io::Error) {
        let line = format!(
            "{} write error: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            err
        );
        // Nowhere left to report a failing error sink.
        let _ = self.errors.write_all(line.as_bytes());
        let _ = self.errors.flush();
    }
}

/// Per-record handle returned by [`ErrorRoutingWriter`].
pub struct RoutedWriter<'a> {
    inner: &'a ErrorRoutingWriter,
}

impl Write for RoutedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Sink::write_all(&self.inner.output, buf).map_err(|e| {
            self.inner.report(&e);
            e
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        Sink::flush(&self.inner.output).map_err(|e| {
            self.inner.report(&e);
            e
        })
    }
}

impl<'a> MakeWriter<'a> for ErrorRoutingWriter {
    type Writer = RoutedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter { inner: self }
    }
}
