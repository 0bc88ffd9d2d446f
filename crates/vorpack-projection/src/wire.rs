//! Per-kind binary encoding of member values.
//!
//! Integers are little-endian fixed width, floats IEEE-754 little-endian,
//! decimals their 16-byte serialized form, booleans one byte, strings
//! length-prefixed UTF-8, and date-times an RFC 3339 string encoded like
//! any other string.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use vorpack_wire::{SliceReader, write_string};

use crate::error::{ProjectionError, Result};
use crate::value::{Value, ValueKind};

/// Appends one value's binary encoding.
pub(crate) fn encode_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::I8(v) => out.push(*v as u8),
        Value::U8(v) => out.push(*v),
        Value::I16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::F32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::F64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Decimal(v) => out.extend_from_slice(&v.serialize()),
        Value::Bool(v) => out.push(u8::from(*v)),
        Value::String(v) => write_string(out, v),
        Value::DateTime(v) => write_string(out, &v.to_rfc3339()),
    }
}

/// Decodes one value of `kind` at the cursor.
pub(crate) fn decode_value(kind: ValueKind, reader: &mut SliceReader<'_>) -> Result<Value> {
    let value = match kind {
        ValueKind::I8 => Value::I8(reader.read_u8()? as i8),
        ValueKind::U8 => Value::U8(reader.read_u8()?),
        ValueKind::I16 => Value::I16(i16::from_le_bytes(reader.read_array()?)),
        ValueKind::U16 => Value::U16(u16::from_le_bytes(reader.read_array()?)),
        ValueKind::I32 => Value::I32(i32::from_le_bytes(reader.read_array()?)),
        ValueKind::U32 => Value::U32(u32::from_le_bytes(reader.read_array()?)),
        ValueKind::I64 => Value::I64(i64::from_le_bytes(reader.read_array()?)),
        ValueKind::U64 => Value::U64(u64::from_le_bytes(reader.read_array()?)),
        ValueKind::F32 => Value::F32(f32::from_le_bytes(reader.read_array()?)),
        ValueKind::F64 => Value::F64(f64::from_le_bytes(reader.read_array()?)),
        ValueKind::Decimal => Value::Decimal(Decimal::deserialize(reader.read_array()?)),
        ValueKind::Bool => match reader.read_u8()? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            other => {
                return Err(ProjectionError::invalid_format(format!(
                    "invalid boolean byte {other:#04x}"
                )));
            }
        },
        ValueKind::String => Value::String(reader.read_string()?),
        ValueKind::DateTime => {
            let text = reader.read_string()?;
            let parsed = DateTime::parse_from_rfc3339(&text).map_err(|e| {
                ProjectionError::invalid_format(format!("invalid date-time {text:?}: {e}"))
            })?;
            Value::DateTime(parsed.with_timezone(&Utc))
        }
    };
    Ok(value)
}
