//! SQL trace reconstruction
//!
//! Interpolates formatted bind values back into a statement template so a
//! debug log shows the statement as it was executed. Two placeholder
//! dialects are recognised:
//!
//! - positional: `SELECT * FROM t WHERE a = ? AND b = ?`
//! - numeric: `SELECT * FROM t WHERE a = $1 AND b = $2`
//!
//! A template containing any `$n` placeholder is always treated as numeric,
//! even if it also contains literal `?` characters.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref NUMERIC_PLACEHOLDER: Regex = Regex::new(r"\$(\d+)").unwrap();
}

const POSITIONAL_PLACEHOLDER: char = '?';

/// Placeholder convention used by a statement template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `?`
    Positional,
    /// `$1`, `$2`, ...
    Numeric,
}

impl Dialect {
    pub fn detect(template: &str) -> Self {
        if NUMERIC_PLACEHOLDER.is_match(template) {
            Self::Numeric
        } else {
            Self::Positional
        }
    }
}

/// Build the executed statement from its template and formatted values.
///
/// Best effort: surplus placeholders stay in the output, surplus values are
/// dropped, and an empty value list returns the template unchanged.
pub fn reconstruct(template: &str, values: &[String]) -> String {
    if values.is_empty() {
        return template.to_string();
    }

    match Dialect::detect(template) {
        Dialect::Numeric => substitute_numeric(template, values),
        Dialect::Positional => substitute_positional(template, values),
    }
}

fn substitute_positional(template: &str, values: &[String]) -> String {
    let mut result = String::with_capacity(template.len() + values.iter().map(String::len).sum::<usize>());
    let mut segments = template.split(POSITIONAL_PLACEHOLDER).peekable();
    let mut index = 0;

    while let Some(segment) = segments.next() {
        result.push_str(segment);
        if segments.peek().is_none() {
            break;
        }
        match values.get(index) {
            Some(value) => result.push_str(value),
            None => result.push(POSITIONAL_PLACEHOLDER),
        }
        index += 1;
    }

    result
}

// The digit run is matched greedily, so `$1` is never taken out of `$10`
// and whatever follows the placeholder is left in place. An index written
// with a leading zero (`$01`) is not a placeholder.
fn substitute_numeric(template: &str, values: &[String]) -> String {
    NUMERIC_PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            Some(&caps[1])
                .filter(|digits| !digits.starts_with('0'))
                .and_then(|digits| digits.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| values.get(i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
