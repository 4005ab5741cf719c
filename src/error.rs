//! Error types shared by the schema, conversion and iteration layers.
//!
//! - [`Error`] is the crate-level error returned by every fallible public operation.
//! - [`CastError`] is the failure of a single field coercion.
//! - [`RowError`] aggregates every [`FieldError`] raised while converting one row.

use crate::column_type::ScalarKind;
use crate::value::Value;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result alias defaulting to the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The schema was declared incorrectly. Raised before any row is read.
    #[error("invalid specification: {0}")]
    Specification(String),

    /// The declared source is missing or cannot be opened.
    #[error("cannot open source {location}: {message}")]
    Resource { location: String, message: String },

    /// A single value could not be coerced to its declared type.
    #[error(transparent)]
    Cast(#[from] CastError),

    /// One or more fields of a row failed to convert.
    #[error(transparent)]
    Row(#[from] RowError),

    /// The tokenizer could not produce the row with this ordinal.
    #[error("row {ordinal}: {message}")]
    Source { ordinal: u64, message: String },

    /// The record sequencer was driven outside of its lifecycle.
    #[error("sequencer fault: {0}")]
    Fault(String),
}

impl Error {
    pub fn specification(message: impl Into<String>) -> Self {
        Self::Specification(message.into())
    }

    pub fn resource(location: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Resource {
            location: location.to_string(),
            message: message.to_string(),
        }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }

    /// Ordinal of the failed row, for row-scoped errors.
    pub fn ordinal(&self) -> Option<u64> {
        match self {
            Self::Row(e) => Some(e.ordinal),
            Self::Source { ordinal, .. } => Some(*ordinal),
            _ => None,
        }
    }

    /// Whether the error is scoped to a single row, leaving the sequence usable.
    pub fn is_row_scoped(&self) -> bool {
        matches!(self, Self::Row(_) | Self::Source { .. })
    }
}

/// Failure to coerce a raw value into a column type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CastError {
    message: String,
}

impl CastError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Absent or empty input on a non-nullable column.
    pub fn empty(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => Self::new("The value cannot be empty"),
            kind => Self::new(format!(
                "The value cannot be converted to a non-null {}",
                kind.name()
            )),
        }
    }

    /// Input that does not parse as the target kind.
    pub fn unparseable(kind: ScalarKind, raw: &str) -> Self {
        Self::new(format!("'{raw}' cannot be converted to a {}", kind.name()))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Identifies a field inside a row, by position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FieldRef {
    Position(usize),
    Name(String),
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(f, "column {position}"),
            Self::Name(name) => write!(f, "column {name}"),
        }
    }
}

/// A cast failure recorded with its field context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: FieldRef,
    /// The raw value as it was received from the tokenizer.
    pub value: Value,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, value {}: {}", self.field, self.value, self.message)
    }
}

/// All the field failures of a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub struct RowError {
    pub ordinal: u64,
    pub errors: Vec<FieldError>,
}

impl RowError {
    pub fn new(ordinal: u64, errors: Vec<FieldError>) -> Self {
        Self { ordinal, errors }
    }

    /// Whether a failure was recorded for `field`.
    pub fn mentions(&self, field: &FieldRef) -> bool {
        self.errors.iter().any(|e| &e.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.ordinal, self.messages().join(", "))
    }
}
