//! The tagged value union over the fixed primitive set.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Type tag for a persistable member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    Bool,
    String,
    DateTime,
}

impl ValueKind {
    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::I8 => "i8",
            ValueKind::U8 => "u8",
            ValueKind::I16 => "i16",
            ValueKind::U16 => "u16",
            ValueKind::I32 => "i32",
            ValueKind::U32 => "u32",
            ValueKind::I64 => "i64",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Decimal => "decimal",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::DateTime => "date-time",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One member value, tagged by kind.
///
/// Equality is derived, so float comparisons keep IEEE semantics
/// (`NaN != NaN`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Bool(bool),
    String(String),
    DateTime(DateTime<Utc>),
}

impl Value {
    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::I8(_) => ValueKind::I8,
            Value::U8(_) => ValueKind::U8,
            Value::I16(_) => ValueKind::I16,
            Value::U16(_) => ValueKind::U16,
            Value::I32(_) => ValueKind::I32,
            Value::U32(_) => ValueKind::U32,
            Value::I64(_) => ValueKind::I64,
            Value::U64(_) => ValueKind::U64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::DateTime(_) => ValueKind::DateTime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(Value::I32(7).kind(), ValueKind::I32);
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::String(String::new()).kind(), ValueKind::String);
        assert_eq!(ValueKind::DateTime.name(), "date-time");
    }

    #[test]
    fn test_float_equality_keeps_ieee_semantics() {
        assert_ne!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert_eq!(Value::F32(f32::INFINITY), Value::F32(f32::INFINITY));
        assert_ne!(Value::F64(0.0), Value::I64(0));
    }
}
