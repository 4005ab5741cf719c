//! Per-column field converters.
//!
//! A [`FieldConverter`] is built once per [`ColumnSpec`] by composing, in order:
//!
//! 1. trim (when the column trims),
//! 2. cast through the column type,
//! 3. array decomposition (when the column is an array): stages 1 and 2 run on
//!    every element. A string that reaches the stage unsplit is split on the
//!    list separator first; a null goes through the nullability of the column,
//! 4. error substitution (when the column ignores errors): wraps everything
//!    above and replaces any failure with the column default.

use crate::column_type::ColumnType;
use crate::error::CastError;
use crate::schema::ColumnSpec;
use crate::value::Value;
use std::fmt;

type Convert = Box<dyn Fn(&Value) -> Result<Value, CastError> + Send + Sync>;

pub struct FieldConverter {
    column: String,
    convert: Convert,
}

impl FieldConverter {
    pub fn build(column: &ColumnSpec) -> Self {
        let column_type = column.column_type();
        let trim = column.trim();
        let mut convert: Convert = Box::new(move |value| cast_scalar(column_type, trim, value));

        if column.is_array() {
            let element = convert;
            let separator = column.list_separator().to_owned();
            convert = Box::new(move |value| match value {
                Value::Array(items) => cast_elements(&element, items.iter()),
                Value::Null => column_type.cast(None),
                Value::String(raw) if raw.is_empty() => Ok(Value::Array(Vec::new())),
                Value::String(raw) => {
                    let items: Vec<Value> =
                        raw.split(separator.as_str()).map(Value::from).collect();
                    cast_elements(&element, items.iter())
                }
                other => cast_elements(&element, std::iter::once(other)),
            });
        }

        if column.ignore_error() {
            let guarded = convert;
            let default = column.default_value().cloned().unwrap_or(Value::Null);
            convert = Box::new(move |value| Ok(guarded(value).unwrap_or_else(|_| default.clone())));
        }

        Self {
            column: column.name().to_owned(),
            convert,
        }
    }

    pub fn convert(&self, value: &Value) -> Result<Value, CastError> {
        (self.convert)(value)
    }

    /// Name of the column the converter was built for.
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Debug for FieldConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConverter")
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

fn cast_elements<'v>(
    element: &Convert,
    items: impl Iterator<Item = &'v Value>,
) -> Result<Value, CastError> {
    items
        .map(|item| element(item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn cast_scalar(column_type: ColumnType, trim: bool, value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Null => column_type.cast(None),
        Value::String(raw) => {
            let raw = if trim { raw.trim() } else { raw.as_str() };
            column_type.cast(Some(raw))
        }
        Value::Array(_) => Err(CastError::new(format!(
            "expected a single {} value, found an array",
            column_type.kind
        ))),
        // Already typed upstream.
        other => Ok(other.clone()),
    }
}
