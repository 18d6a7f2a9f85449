//! The structured logger
//!
//! A [`Logger`] owns a `tracing` dispatcher built by
//! [`LogPipelineBuilder`](crate::LogPipelineBuilder) together with the
//! sinks it writes to. Records are emitted through the dispatcher directly,
//! so a logger works whether or not it is the process-wide default.

use sqlscope_core::{filter_trace, sql_line, LogLevel, SqlEvent, TraceArg, TraceEvent};
use std::backtrace::Backtrace;
use std::fmt::Display;
use std::io;
use std::panic::Location;
use tracing::Dispatch;

use crate::sink::{CompositeSink, Sink};

/// Target attached to every record.
pub const LOG_TARGET: &str = "sqlscope";

/// Options assembled from the configuration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerOptions {
    pub level: LogLevel,
    pub development: bool,
    /// Attach `caller=file:line` to every record
    pub add_caller: bool,
    /// Attach a stack trace to records at or above this level
    pub stacktrace_level: Option<LogLevel>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            development: false,
            add_caller: true,
            stacktrace_level: Some(LogLevel::stacktrace_threshold(false)),
        }
    }
}

#[derive(Default)]
struct Fields<'a> {
    source: Option<&'a str>,
    elapsed_ms: Option<f64>,
    rows: Option<i64>,
}

macro_rules! emit {
    ($level:expr, $($rest:tt)*) => {
        match $level {
            LogLevel::Debug => tracing::event!(target: LOG_TARGET, tracing::Level::DEBUG, $($rest)*),
            LogLevel::Info => tracing::event!(target: LOG_TARGET, tracing::Level::INFO, $($rest)*),
            LogLevel::Warn => tracing::event!(target: LOG_TARGET, tracing::Level::WARN, $($rest)*),
            LogLevel::Error => tracing::event!(target: LOG_TARGET, tracing::Level::ERROR, $($rest)*),
        }
    };
}

/// Structured logger writing to resolved sinks.
pub struct Logger {
    dispatch: Dispatch,
    output: CompositeSink,
    error_output: CompositeSink,
    options: LoggerOptions,
}

impl Logger {
    pub(crate) fn new(
        dispatch: Dispatch,
        output: CompositeSink,
        error_output: CompositeSink,
        options: LoggerOptions,
    ) -> Self {
        Self {
            dispatch,
            output,
            error_output,
            options,
        }
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    /// The dispatcher, e.g. for `tracing::dispatcher::set_global_default`.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's default `tracing` dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.options.level
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Display) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(LogLevel::Error, message);
    }

    /// Log at error level, then panic in development mode.
    #[track_caller]
    pub fn dpanic(&self, message: impl Display) {
        let message = message.to_string();
        self.log(LogLevel::Error, &message);
        if self.options.development {
            panic!("{}", message);
        }
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Display) {
        if self.enabled(level) {
            self.emit(level, &message.to_string(), Fields::default(), Location::caller());
        }
    }

    /// Tracing entry point for driver hooks.
    ///
    /// Payloads that are not SQL events are ignored.
    #[track_caller]
    pub fn print(&self, args: &[TraceArg]) {
        if let TraceEvent::Sql(event) = filter_trace(args) {
            self.trace_sql(&event);
        }
    }

    /// Log an executed statement at debug level as `[sql] : <statement>`.
    #[track_caller]
    pub fn trace_sql(&self, event: &SqlEvent) {
        if !self.enabled(LogLevel::Debug) {
            return;
        }
        let fields = Fields {
            source: event.source.as_deref(),
            elapsed_ms: event.elapsed.map(|d| d.as_secs_f64() * 1000.0),
            rows: event.rows,
        };
        self.emit(LogLevel::Debug, &sql_line(event), fields, Location::caller());
    }

    /// Flush every sink; returns the first failure.
    pub fn sync(&self) -> io::Result<()> {
        let output = self.output.flush();
        let errors = self.error_output.flush();
        output.and(errors)
    }

    fn emit(&self, level: LogLevel, message: &str, fields: Fields<'_>, location: &Location<'_>) {
        let caller = self
            .options
            .add_caller
            .then(|| format!("{}:{}", location.file(), location.line()));
        let stacktrace = self
            .options
            .stacktrace_level
            .filter(|threshold| level >= *threshold)
            .map(|_| Backtrace::force_capture().to_string());

        tracing::dispatcher::with_default(&self.dispatch, || {
            emit!(
                level,
                caller = caller.as_deref(),
                source = fields.source,
                elapsed_ms = fields.elapsed_ms,
                rows = fields.rows,
                stacktrace = stacktrace.as_deref(),
                "{}",
                message
            )
        });
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("output", &self.output)
            .field("error_output", &self.error_output)
            .field("options", &self.options)
            .finish()
    }
}
