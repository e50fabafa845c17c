//! Groovy literal rendering for script templates
//!
//! Templates never write quotes around interpolated values themselves. The
//! environment formatter turns every `{{ value }}` into a complete Groovy
//! literal, so caller-supplied text always stays inside its string.

use minijinja::value::{Value, ValueKind};
use minijinja::{Error, ErrorKind, Output, State};
use std::fmt::Write;

/// Render `s` as a single-quoted Groovy string literal.
///
/// Single-quoted strings are not interpolated, so `$` needs no escaping.
/// Backslashes are doubled before anything else is emitted, which keeps a
/// literal `\u0027` in the input from reading as a unicode escape.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render a template value as a Groovy literal
pub fn literal(value: &Value) -> Result<String, Error> {
    match value.kind() {
        ValueKind::String => Ok(quote(value.as_str().unwrap_or_default())),
        ValueKind::None => Ok("null".to_string()),
        ValueKind::Bool => Ok(if value.is_true() { "true" } else { "false" }.to_string()),
        ValueKind::Number => Ok(value.to_string()),
        ValueKind::Seq | ValueKind::Iterable => {
            let items = value
                .try_iter()?
                .map(|item| literal(&item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", items.join(", ")))
        }
        ValueKind::Undefined => Err(Error::new(
            ErrorKind::UndefinedError,
            "script parameter is undefined",
        )),
        kind => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot render a {} as a Groovy literal", kind),
        )),
    }
}

/// Environment formatter: every printed expression becomes a literal
pub fn format_literal(out: &mut Output<'_>, _state: &State<'_, '_>, value: &Value) -> Result<(), Error> {
    let rendered = literal(value)?;
    out.write_str(&rendered)
        .map_err(|_| Error::new(ErrorKind::WriteFailure, "failed to write script text"))
}
