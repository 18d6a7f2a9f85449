//! Classification of driver trace payloads

use crate::domain::{SqlEvent, TraceArg, TraceEvent, SQL_TAG};

const TAG_INDEX: usize = 0;
const SOURCE_INDEX: usize = 1;
const ELAPSED_INDEX: usize = 2;
const TEMPLATE_INDEX: usize = 3;
const VALUES_INDEX: usize = 4;
const ROWS_INDEX: usize = 5;

/// Decide whether a hook payload describes a loggable statement.
///
/// Returns [`TraceEvent::Other`] for anything else, including a `"sql"`
/// payload with no usable template.
pub fn filter_trace(args: &[TraceArg]) -> TraceEvent {
    if args.len() <= 1 {
        return TraceEvent::Other;
    }
    match args.get(TAG_INDEX) {
        Some(TraceArg::Text(tag)) if tag == SQL_TAG => {}
        _ => return TraceEvent::Other,
    }

    let template = match args.get(TEMPLATE_INDEX) {
        Some(TraceArg::Text(template)) => template.clone(),
        _ => return TraceEvent::Other,
    };

    let values = match args.get(VALUES_INDEX) {
        Some(TraceArg::Values(values)) => values.clone(),
        _ => Vec::new(),
    };

    let source = match args.get(SOURCE_INDEX) {
        Some(TraceArg::Text(source)) if !source.is_empty() => Some(source.clone()),
        _ => None,
    };

    let elapsed = match args.get(ELAPSED_INDEX) {
        Some(TraceArg::Duration(elapsed)) => Some(*elapsed),
        _ => None,
    };

    let rows = match args.get(ROWS_INDEX) {
        Some(TraceArg::Int(rows)) if *rows >= 0 => Some(*rows),
        _ => None,
    };

    TraceEvent::Sql(SqlEvent {
        template,
        values,
        source,
        elapsed,
        rows,
    })
}
