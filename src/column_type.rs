//! Catalog of the scalar column types and their string coercions.
//!
//! Every [`ScalarKind`] owns one pure coercion function `&str -> Value`. A
//! [`ColumnType`] pairs a kind with nullability, which decides what happens to
//! absent or empty input:
//!
//! | input            | nullable        | non-nullable                 |
//! |------------------|-----------------|------------------------------|
//! | absent / `""`    | `Value::Null`   | [`CastError`]                |
//! | unparseable text | [`CastError`]   | [`CastError`]                |
//!
//! Booleans treat any blank input (whitespace only) as empty, and parse every
//! other input with a case-sensitive comparison against `"true"`.

use crate::error::CastError;
use crate::value::Value;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

type Coercion = fn(&str) -> Result<Value, CastError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Boolean,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 8] = [
        ScalarKind::String,
        ScalarKind::Integer,
        ScalarKind::Long,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::BigInteger,
        ScalarKind::BigDecimal,
        ScalarKind::Boolean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::BigInteger => "big integer",
            Self::BigDecimal => "big decimal",
            Self::Boolean => "boolean",
        }
    }

    fn coercion(self) -> Coercion {
        match self {
            Self::String => coerce_string,
            Self::Integer => coerce_integer,
            Self::Long => coerce_long,
            Self::Float => coerce_float,
            Self::Double => coerce_double,
            Self::BigInteger => coerce_big_integer,
            Self::BigDecimal => coerce_big_decimal,
            Self::Boolean => coerce_boolean,
        }
    }

    /// Whether `raw` counts as empty input for this kind.
    fn is_empty_input(self, raw: &str) -> bool {
        match self {
            Self::Boolean => raw.trim().is_empty(),
            _ => raw.is_empty(),
        }
    }
}

fn parse<T: FromStr>(kind: ScalarKind, raw: &str, wrap: fn(T) -> Value) -> Result<Value, CastError> {
    raw.parse::<T>()
        .map(wrap)
        .map_err(|_| CastError::unparseable(kind, raw))
}

fn coerce_string(raw: &str) -> Result<Value, CastError> {
    Ok(Value::String(raw.to_owned()))
}

fn coerce_integer(raw: &str) -> Result<Value, CastError> {
    parse(ScalarKind::Integer, raw, Value::Integer)
}

fn coerce_long(raw: &str) -> Result<Value, CastError> {
    parse(ScalarKind::Long, raw, Value::Long)
}

fn coerce_float(raw: &str) -> Result<Value, CastError> {
    parse(ScalarKind::Float, raw, Value::Float)
}

fn coerce_double(raw: &str) -> Result<Value, CastError> {
    parse(ScalarKind::Double, raw, Value::Double)
}

// Both big parsers tolerate `_` digit separators, which plain numbers reject.
fn coerce_big_integer(raw: &str) -> Result<Value, CastError> {
    if raw.contains('_') {
        return Err(CastError::unparseable(ScalarKind::BigInteger, raw));
    }
    parse::<BigInt>(ScalarKind::BigInteger, raw, Value::BigInteger)
}

fn coerce_big_decimal(raw: &str) -> Result<Value, CastError> {
    if raw.contains('_') {
        return Err(CastError::unparseable(ScalarKind::BigDecimal, raw));
    }
    parse::<BigDecimal>(ScalarKind::BigDecimal, raw, Value::BigDecimal)
}

// Only the exact token "true" is true.
fn coerce_boolean(raw: &str) -> Result<Value, CastError> {
    Ok(Value::Boolean(raw == "true"))
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar kind together with its nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnType {
    pub kind: ScalarKind,
    pub nullable: bool,
}

impl ColumnType {
    pub const fn new(kind: ScalarKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    pub const fn nullable(kind: ScalarKind) -> Self {
        Self::new(kind, true)
    }

    pub const fn required(kind: ScalarKind) -> Self {
        Self::new(kind, false)
    }

    /// Coerce an optional raw string into a value of this type.
    pub fn cast(&self, raw: Option<&str>) -> Result<Value, CastError> {
        match raw {
            Some(raw) if !self.kind.is_empty_input(raw) => (self.kind.coercion())(raw),
            _ if self.nullable => Ok(Value::Null),
            _ => Err(CastError::empty(self.kind)),
        }
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        Self::nullable(ScalarKind::String)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "nullable {}", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
