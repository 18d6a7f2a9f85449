//! Bound value formatting for SQL trace lines

use crate::domain::ScalarValue;

/// Text used for SQL NULL and for values that cannot be produced.
pub const NULL_TEXT: &str = "NULL";
/// Replacement for byte values that are not printable text.
pub const BINARY_TEXT: &str = "'<binary>'";
/// Replacement for the zero/unset timestamp.
pub const ZERO_TIMESTAMP_TEXT: &str = "'0000-00-00 00:00:00'";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render one bound value as it would appear inside a SQL statement.
///
/// Never fails: values that cannot be rendered degrade to `NULL` or
/// `'<binary>'`.
pub fn format_value(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Null => NULL_TEXT.to_string(),
        ScalarValue::Timestamp(None) => ZERO_TIMESTAMP_TEXT.to_string(),
        ScalarValue::Timestamp(Some(ts)) => quote(&ts.format(TIMESTAMP_FORMAT)),
        ScalarValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) if is_printable(text) => quote(&text),
            _ => BINARY_TEXT.to_string(),
        },
        ScalarValue::Driver(inner) => match inner.driver_value() {
            Ok(Some(bytes @ ScalarValue::Bytes(_))) => format_value(&bytes),
            Ok(Some(produced)) if !produced.is_null() => quote(&produced),
            Ok(_) => NULL_TEXT.to_string(),
            Err(e) => {
                tracing::trace!("driver value failed, logging NULL: {}", e);
                NULL_TEXT.to_string()
            }
        },
        ScalarValue::Int(v) => v.to_string(),
        ScalarValue::UInt(v) => v.to_string(),
        ScalarValue::Float(v) => v.to_string(),
        ScalarValue::Bool(v) => v.to_string(),
        ScalarValue::Text(text) => quote(text),
    }
}

/// Render every bound value; the output has one entry per input value.
pub fn format_values(values: &[ScalarValue]) -> Vec<String> {
    values.iter().map(format_value).collect()
}

fn quote(value: &dyn std::fmt::Display) -> String {
    format!("'{}'", value)
}

/// Unicode general category `Cf` (format characters).
const FORMAT_CHARS: &[(char, char)] = &[
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{0890}', '\u{0891}'),
    ('\u{08E2}', '\u{08E2}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
    ('\u{110BD}', '\u{110BD}'),
    ('\u{110CD}', '\u{110CD}'),
    ('\u{13430}', '\u{1343F}'),
    ('\u{1BCA0}', '\u{1BCA3}'),
    ('\u{1D173}', '\u{1D17A}'),
    ('\u{E0001}', '\u{E0001}'),
    ('\u{E0020}', '\u{E007F}'),
];

fn is_format_char(c: char) -> bool {
    FORMAT_CHARS
        .iter()
        .any(|&(start, end)| (start..=end).contains(&c))
}

/// True when every character is graphic or the ASCII space.
pub fn is_printable(text: &str) -> bool {
    text.chars()
        .all(|c| c == ' ' || !(c.is_control() || c.is_whitespace() || is_format_char(c)))
}
