//! Dynamically-typed field values and the rows that carry them.
//!
//! A raw row, as produced by a tokenizer, only holds [`Value::String`],
//! [`Value::Null`] and [`Value::Array`] of strings. The conversion pipeline
//! replaces those entries with the typed variants declared by the schema.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    String(String),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(#[serde(serialize_with = "serialize_exact")] BigInt),
    BigDecimal(#[serde(serialize_with = "serialize_exact")] BigDecimal),
    Boolean(bool),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::BigInteger(_) => "big integer",
            Self::BigDecimal(_) => "big decimal",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::BigInteger(v) => write!(f, "{v}"),
            Self::BigDecimal(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    String => String,
    i32 => Integer,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigInt => BigInteger,
    BigDecimal => BigDecimal,
    bool => Boolean,
}

// Arbitrary-precision numbers are written as strings so that no digit is lost.
fn serialize_exact<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

/// One record, either a positional list of fields or an ordered name → value mapping.
///
/// Used for both raw rows (straight from a tokenizer) and typed rows (after conversion).
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Positional(Vec<Value>),
    Named(Vec<(String, Value)>),
}

impl Row {
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field at `position`, counting named fields in their insertion order.
    pub fn get(&self, position: usize) -> Option<&Value> {
        match self {
            Self::Positional(values) => values.get(position),
            Self::Named(fields) => fields.get(position).map(|(_, v)| v),
        }
    }

    /// Field called `name`. Positional rows have no names.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Positional(_) => None,
            Self::Named(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
        }
    }

    pub fn values(&self) -> Vec<&Value> {
        match self {
            Self::Positional(values) => values.iter().collect(),
            Self::Named(fields) => fields.iter().map(|(_, v)| v).collect(),
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Positional(values) => values,
            Self::Named(fields) => fields.into_iter().map(|(_, v)| v).collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Positional(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for v in values {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Self::Named(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, v) in fields {
                    map.serialize_entry(name, v)?;
                }
                map.end()
            }
        }
    }
}
