//! Driver trace payloads

use super::ScalarValue;
use std::time::Duration;

/// Tag carried by loggable SQL trace events.
pub const SQL_TAG: &str = "sql";

/// One element of the argument list a driver trace hook hands over.
///
/// The hook payload for a statement is
/// `[tag, source, elapsed, template, values, rows]`.
#[derive(Debug, Clone)]
pub enum TraceArg {
    Text(String),
    Int(i64),
    Duration(Duration),
    Values(Vec<ScalarValue>),
}

impl From<&str> for TraceArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TraceArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for TraceArg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Duration> for TraceArg {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl From<Vec<ScalarValue>> for TraceArg {
    fn from(value: Vec<ScalarValue>) -> Self {
        Self::Values(value)
    }
}

/// A classified driver trace event.
#[derive(Debug, Clone)]
pub enum TraceEvent {
    Sql(SqlEvent),
    /// Anything that should not produce a log line
    Other,
}

/// An executed statement with its bound values.
#[derive(Debug, Clone, Default)]
pub struct SqlEvent {
    pub template: String,
    pub values: Vec<ScalarValue>,
    /// Call site reported by the driver
    pub source: Option<String>,
    pub elapsed: Option<Duration>,
    /// Rows affected or returned
    pub rows: Option<i64>,
}

impl SqlEvent {
    pub fn new(template: impl Into<String>, values: Vec<ScalarValue>) -> Self {
        Self {
            template: template.into(),
            values,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    pub fn with_rows(mut self, rows: i64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Build the hook payload for this event.
    pub fn to_args(&self) -> Vec<TraceArg> {
        vec![
            TraceArg::from(SQL_TAG),
            TraceArg::Text(self.source.clone().unwrap_or_default()),
            TraceArg::Duration(self.elapsed.unwrap_or_default()),
            TraceArg::Text(self.template.clone()),
            TraceArg::Values(self.values.clone()),
            TraceArg::Int(self.rows.unwrap_or(-1)),
        ]
    }
}
