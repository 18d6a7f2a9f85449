//! Conversion of rusqlite bind parameters into trace values

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use sqlscope_core::ScalarValue;
use std::borrow::Cow;

lazy_static! {
    static ref SQLITE_PLACEHOLDER: Regex = Regex::new(r"\?(\d*)").unwrap();
    static ref SQLITE_NUMBERED: Regex = Regex::new(r"\?\d").unwrap();
}

/// Capture the value a parameter binds as.
///
/// A parameter that fails to convert is recorded as `Null`; the statement
/// itself reports the conversion error.
pub fn to_scalar(param: &dyn ToSql) -> ScalarValue {
    match param.to_sql() {
        Ok(ToSqlOutput::Borrowed(value)) => from_value_ref(value),
        Ok(ToSqlOutput::Owned(value)) => from_value_ref(ValueRef::from(&value)),
        Ok(_) => ScalarValue::Null,
        Err(e) => {
            tracing::trace!("bind parameter could not be captured: {}", e);
            ScalarValue::Null
        }
    }
}

/// Capture every parameter, in order.
pub fn to_scalars(params: &[&dyn ToSql]) -> Vec<ScalarValue> {
    params.iter().map(|p| to_scalar(*p)).collect()
}

/// Rewrite SQLite's numbered `?NNN` parameters as `$NNN` so the trace line
/// binds each value at its declared index.
///
/// A bare `?` next to numbered ones takes the index after the largest seen
/// so far, as SQLite numbers it. Statements with only bare `?` are returned
/// unchanged.
pub fn trace_template(sql: &str) -> Cow<'_, str> {
    if !SQLITE_NUMBERED.is_match(sql) {
        return Cow::Borrowed(sql);
    }

    let mut largest = 0_usize;
    SQLITE_PLACEHOLDER.replace_all(sql, |caps: &Captures| {
        let index = match caps[1].parse::<usize>() {
            Ok(n) => n,
            Err(_) => largest + 1,
        };
        largest = largest.max(index);
        format!("${}", index)
    })
}

fn from_value_ref(value: ValueRef<'_>) -> ScalarValue {
    match value {
        ValueRef::Null => ScalarValue::Null,
        ValueRef::Integer(i) => ScalarValue::Int(i),
        ValueRef::Real(f) => ScalarValue::Float(f),
        ValueRef::Text(bytes) => ScalarValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => ScalarValue::Bytes(bytes.to_vec()),
    }
}
