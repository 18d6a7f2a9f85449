//! Trace formatting services

pub mod sql_formatter;
pub mod trace_filter;
pub mod value_formatter;

pub use sql_formatter::{reconstruct, Dialect};
pub use trace_filter::filter_trace;
pub use value_formatter::{format_value, format_values};

use crate::domain::SqlEvent;

/// Fixed prefix of every SQL trace line.
pub const SQL_LINE_PREFIX: &str = "[sql] : ";

/// Render a statement event as a complete log message.
pub fn sql_line(event: &SqlEvent) -> String {
    let values = format_values(&event.values);
    format!("{}{}", SQL_LINE_PREFIX, reconstruct(&event.template, &values))
}
