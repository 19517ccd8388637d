//! Tagged primitive values.
//!
//! Record properties carry values from a small, closed set of comparable primitive kinds.
//! Each value is written as an `i32` type tag followed by its payload; a bare null tag stands
//! for an absent value.

use crate::wire::{WireError, WireReader, WireResult, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TAG_NULL: i32 = 0;
pub const TAG_BYTE: i32 = -3;
pub const TAG_BOOLEAN: i32 = -4;
pub const TAG_SHORT: i32 = -6;
pub const TAG_INTEGER: i32 = -7;
pub const TAG_LONG: i32 = -8;
pub const TAG_FLOAT: i32 = -9;
pub const TAG_DOUBLE: i32 = -10;
pub const TAG_STRING: i32 = -11;

/// A wire-representable property value.
///
/// In JSON the variants are untagged and tried in declaration order, so integers come back
/// as `Long` and fractional numbers as `Double`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaggedValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
}

impl TaggedValue {
    pub fn tag(&self) -> i32 {
        match self {
            TaggedValue::Byte(_) => TAG_BYTE,
            TaggedValue::Bool(_) => TAG_BOOLEAN,
            TaggedValue::Short(_) => TAG_SHORT,
            TaggedValue::Int(_) => TAG_INTEGER,
            TaggedValue::Long(_) => TAG_LONG,
            TaggedValue::Float(_) => TAG_FLOAT,
            TaggedValue::Double(_) => TAG_DOUBLE,
            TaggedValue::String(_) => TAG_STRING,
        }
    }

    fn write_payload(&self, out: &mut WireWriter) {
        match self {
            TaggedValue::Byte(v) => out.write_i8(*v),
            TaggedValue::Bool(v) => out.write_bool(*v),
            TaggedValue::Short(v) => out.write_i16(*v),
            TaggedValue::Int(v) => out.write_i32(*v),
            TaggedValue::Long(v) => out.write_i64(*v),
            TaggedValue::Float(v) => out.write_f32(*v),
            TaggedValue::Double(v) => out.write_f64(*v),
            TaggedValue::String(v) => out.write_string(v),
        }
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggedValue::Byte(v) => write!(f, "{v}"),
            TaggedValue::Bool(v) => write!(f, "{v}"),
            TaggedValue::Short(v) => write!(f, "{v}"),
            TaggedValue::Int(v) => write!(f, "{v}"),
            TaggedValue::Long(v) => write!(f, "{v}"),
            TaggedValue::Float(v) => write!(f, "{v}"),
            TaggedValue::Double(v) => write!(f, "{v}"),
            TaggedValue::String(v) => f.write_str(v),
        }
    }
}

impl From<&str> for TaggedValue {
    fn from(value: &str) -> Self {
        TaggedValue::String(value.to_string())
    }
}

impl From<String> for TaggedValue {
    fn from(value: String) -> Self {
        TaggedValue::String(value)
    }
}

impl From<i32> for TaggedValue {
    fn from(value: i32) -> Self {
        TaggedValue::Int(value)
    }
}

impl From<i64> for TaggedValue {
    fn from(value: i64) -> Self {
        TaggedValue::Long(value)
    }
}

impl From<bool> for TaggedValue {
    fn from(value: bool) -> Self {
        TaggedValue::Bool(value)
    }
}

/// Writes a tag followed by the payload of `value`.
pub fn write_value(out: &mut WireWriter, value: &TaggedValue) {
    out.write_i32(value.tag());
    value.write_payload(out);
}

pub fn write_nullable_value(out: &mut WireWriter, value: Option<&TaggedValue>) {
    match value {
        Some(value) => write_value(out, value),
        None => out.write_i32(TAG_NULL),
    }
}

/// Reads a tagged value, `None` for the null tag.
///
/// # Errors
/// `UnknownTag` for a tag outside the supported kinds, or a truncation error from the payload.
pub fn read_nullable_value(input: &mut WireReader) -> WireResult<Option<TaggedValue>> {
    let tag = input.read_i32()?;
    let value = match tag {
        TAG_NULL => return Ok(None),
        TAG_BYTE => TaggedValue::Byte(input.read_i8()?),
        TAG_BOOLEAN => TaggedValue::Bool(input.read_bool()?),
        TAG_SHORT => TaggedValue::Short(input.read_i16()?),
        TAG_INTEGER => TaggedValue::Int(input.read_i32()?),
        TAG_LONG => TaggedValue::Long(input.read_i64()?),
        TAG_FLOAT => TaggedValue::Float(input.read_f32()?),
        TAG_DOUBLE => TaggedValue::Double(input.read_f64()?),
        TAG_STRING => TaggedValue::String(input.read_string()?),
        other => return Err(WireError::UnknownTag(other)),
    };
    Ok(Some(value))
}

/// Reads a value that must not be null.
pub fn read_value(input: &mut WireReader) -> WireResult<TaggedValue> {
    read_nullable_value(input)?.ok_or(WireError::UnknownTag(TAG_NULL))
}
