//! Dynamically typed column values
//!
//! `Value` is the intermediate every bound argument and every scanned column
//! passes through. `FieldValue` converts between a declared Rust field type
//! and `Value`; a failed conversion yields `None` and the caller decides what
//! to do with it.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::field::FieldKind;

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Whether this is the zero value of its kind
    ///
    /// Zero values route `save` to an insert.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Int(v) => *v == 0,
            Value::UInt(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Bool(v) => !*v,
            Value::Text(v) => v.is_empty(),
            Value::Blob(v) => v.is_empty(),
            Value::Timestamp(v) => v.timestamp() == 0 && v.timestamp_subsec_nanos() == 0,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view, accepting unsigned values that fit
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            Value::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Parse a timestamp scanned back as text
///
/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS[.f]` shape SQL engines use
/// for `CURRENT_TIMESTAMP`.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Conversion between a declared field type and `Value`
pub trait FieldValue: Sized {
    /// Storage kind used for column type inference
    const KIND: FieldKind;

    fn to_value(&self) -> Value;

    /// Convert a scanned value; `None` when not directly convertible
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! signed_field_value {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: FieldKind = $kind;

                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: Value) -> Option<Self> {
                    value.as_i64().and_then(|v| <$ty>::try_from(v).ok())
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    v.to_value()
                }
            }
        )*
    };
}

macro_rules! unsigned_field_value {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: FieldKind = $kind;

                fn to_value(&self) -> Value {
                    Value::UInt(u64::from(*self))
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::UInt(v) => <$ty>::try_from(v).ok(),
                        other => other.as_i64().and_then(|v| <$ty>::try_from(v).ok()),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    v.to_value()
                }
            }
        )*
    };
}

signed_field_value!(
    i8 => FieldKind::Int32,
    i16 => FieldKind::Int32,
    i32 => FieldKind::Int32,
    i64 => FieldKind::Int64,
);

unsigned_field_value!(
    u8 => FieldKind::Int32,
    u16 => FieldKind::Int32,
    u32 => FieldKind::UInt32,
    u64 => FieldKind::UInt64,
);

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            Value::Int(v) => Some(v != 0),
            Value::UInt(v) => Some(v != 0),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FieldValue for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v),
            Value::Blob(v) => String::from_utf8(v).ok(),
            _ => None,
        }
    }
}

impl FieldValue for Vec<u8> {
    const KIND: FieldKind = FieldKind::Blob;

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Blob(v) => Some(v),
            Value::Text(v) => Some(v.into_bytes()),
            _ => None,
        }
    }
}

impl FieldValue for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(v) => Some(v),
            Value::Text(v) => parse_timestamp(&v),
            Value::Int(secs) => Utc.timestamp_opt(secs, 0).single(),
            _ => None,
        }
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(Utc.from_utc_datetime(self))
    }

    fn from_value(value: Value) -> Option<Self> {
        DateTime::<Utc>::from_value(value).map(|dt| dt.naive_utc())
    }
}

impl FieldValue for uuid::Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn to_value(&self) -> Value {
        if self.is_nil() {
            // nil ids are zero values and must dispatch to insert
            return Value::Null;
        }
        Value::Text(self.hyphenated().to_string())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => uuid::Uuid::parse_str(&v).ok(),
            Value::Blob(v) => uuid::Uuid::from_slice(&v).ok(),
            Value::Null => Some(uuid::Uuid::nil()),
            _ => None,
        }
    }
}

impl FieldValue for serde_json::Value {
    const KIND: FieldKind = FieldKind::Json;

    fn to_value(&self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            other => Value::Text(other.to_string()),
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => serde_json::from_str(&v).ok(),
            Value::Null => Some(serde_json::Value::Null),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
