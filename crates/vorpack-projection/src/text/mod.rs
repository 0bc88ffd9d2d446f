//! The INI-style text block format.
//!
//! Each block is a `[TypeName]` header line, one `Name=value` line per
//! member in declared order, and a terminating blank line. Readers also
//! treat a new `[...]` header or a line starting with `;` as end of
//! block. Values are escaped so a value can never fabricate one of those
//! terminators; see [`escape_value`].

mod reader;
mod writer;

pub use reader::{TextReader, read_text};
pub use writer::{TextWriter, write_text};

use chrono::{DateTime, Utc};

use crate::error::{ProjectionError, Result};
use crate::value::{Value, ValueKind};

/// Escapes a value for a `Name=value` line: backslash, newline, and
/// carriage return become `\\`, `\n`, and `\r`.
///
/// Nothing else needs escaping. Parsers split on the first `=`, and the
/// comment and header markers only count at line starts, which escaped
/// values cannot produce.
pub fn escape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reverses [`escape_value`].
pub fn unescape_value(escaped: &str) -> Result<String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            _ => {
                return Err(ProjectionError::InvalidEscape {
                    text: escaped.to_owned(),
                });
            }
        }
    }
    Ok(out)
}

/// Renders one value for a `Name=value` line.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::I8(v) => v.to_string(),
        Value::U8(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::String(v) => escape_value(v),
        Value::DateTime(v) => v.to_rfc3339(),
    }
}

/// Parses one line value as the member's declared kind.
pub(crate) fn parse_value(kind: ValueKind, member: &'static str, text: &str) -> Result<Value> {
    let invalid = || ProjectionError::InvalidValue {
        member,
        kind,
        text: text.to_owned(),
    };
    let value = match kind {
        ValueKind::I8 => Value::I8(text.parse().map_err(|_| invalid())?),
        ValueKind::U8 => Value::U8(text.parse().map_err(|_| invalid())?),
        ValueKind::I16 => Value::I16(text.parse().map_err(|_| invalid())?),
        ValueKind::U16 => Value::U16(text.parse().map_err(|_| invalid())?),
        ValueKind::I32 => Value::I32(text.parse().map_err(|_| invalid())?),
        ValueKind::U32 => Value::U32(text.parse().map_err(|_| invalid())?),
        ValueKind::I64 => Value::I64(text.parse().map_err(|_| invalid())?),
        ValueKind::U64 => Value::U64(text.parse().map_err(|_| invalid())?),
        ValueKind::F32 => Value::F32(text.parse().map_err(|_| invalid())?),
        ValueKind::F64 => Value::F64(text.parse().map_err(|_| invalid())?),
        ValueKind::Decimal => Value::Decimal(text.parse().map_err(|_| invalid())?),
        ValueKind::Bool => Value::Bool(text.parse().map_err(|_| invalid())?),
        ValueKind::String => Value::String(unescape_value(text)?),
        ValueKind::DateTime => {
            let parsed = DateTime::parse_from_rfc3339(text).map_err(|_| invalid())?;
            Value::DateTime(parsed.with_timezone(&Utc))
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip() {
        let raw = "first\\second\nthird\rfourth";
        let escaped = escape_value(raw);
        assert_eq!(escaped, "first\\\\second\\nthird\\rfourth");
        assert!(!escaped.contains('\n'));
        assert_eq!(unescape_value(&escaped).unwrap(), raw);
    }

    #[test]
    fn test_terminator_characters_pass_through() {
        assert_eq!(escape_value("[a]=b;c"), "[a]=b;c");
    }

    #[test]
    fn test_unescape_rejects_bad_sequences() {
        assert!(matches!(
            unescape_value("trailing\\").unwrap_err(),
            ProjectionError::InvalidEscape { .. }
        ));
        assert!(matches!(
            unescape_value("un\\known").unwrap_err(),
            ProjectionError::InvalidEscape { .. }
        ));
    }

    #[test]
    fn test_format_and_parse_scalars() {
        let cases = [
            (ValueKind::I32, Value::I32(-42)),
            (ValueKind::U64, Value::U64(u64::MAX)),
            (ValueKind::F64, Value::F64(3.5)),
            (ValueKind::Bool, Value::Bool(false)),
        ];
        for (kind, value) in cases {
            let text = format_value(&value);
            assert_eq!(parse_value(kind, "m", &text).unwrap(), value);
        }
    }

    #[test]
    fn test_float_text_is_shortest_roundtrip() {
        let value = Value::F64(0.1);
        let text = format_value(&value);
        assert_eq!(text, "0.1");
        assert_eq!(parse_value(ValueKind::F64, "m", &text).unwrap(), value);
    }

    #[test]
    fn test_parse_failure_names_member_and_kind() {
        let err = parse_value(ValueKind::U8, "level", "300").unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidValue {
                member: "level",
                kind: ValueKind::U8,
                ..
            }
        ));
    }
}
