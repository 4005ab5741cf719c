//! Row processing: applies the field converters of a header to whole rows.
//!
//! The strategy is chosen once, from the declared [`OutputShape`]:
//! - [`RowConverter::Positional`] looks converters up by field position,
//! - [`RowConverter::Named`] looks them up by field name,
//! - [`RowConverter::PassThrough`] forwards rows untouched.
//!
//! Every field of a row is converted even after a failure, so that the
//! resulting [`RowError`] reports all the failing fields at once.

use crate::convert::FieldConverter;
use crate::error::{FieldError, FieldRef, RowError};
use crate::schema::{HeaderSpec, default_column_name};
use crate::value::{Row, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::debug;

/// Turns one raw input into one output, or fails the whole input.
pub trait RowProcessor {
    type Input;
    type Output;

    fn process(&self, ordinal: u64, row: Self::Input) -> Result<Self::Output, RowError>;
}

/// Shape of the records a reader produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// Positional lists of values.
    #[default]
    List,
    /// Ordered name → value mappings.
    Map,
    /// Caller-defined structured type; no column conversion applies.
    Object,
}

#[derive(Debug)]
pub enum RowConverter {
    Positional(Vec<Option<FieldConverter>>),
    Named(HashMap<String, FieldConverter>),
    PassThrough,
}

impl RowConverter {
    /// Rows pass through untouched when no column is declared.
    pub fn for_shape(shape: OutputShape, header: &HeaderSpec) -> Self {
        match shape {
            _ if header.is_empty() => Self::PassThrough,
            OutputShape::List => Self::positional(header),
            OutputShape::Map => Self::named(header),
            OutputShape::Object => Self::PassThrough,
        }
    }

    pub fn positional(header: &HeaderSpec) -> Self {
        let mut converters: Vec<Option<FieldConverter>> = Vec::new();
        converters.resize_with(header.next_position(), || None);
        for column in header.columns() {
            converters[column.position()] = Some(FieldConverter::build(column));
        }
        Self::Positional(converters)
    }

    pub fn named(header: &HeaderSpec) -> Self {
        Self::Named(
            header
                .columns()
                .map(|c| (c.name().to_owned(), FieldConverter::build(c)))
                .collect(),
        )
    }

    /// Number of columns with a registered converter.
    pub fn converter_count(&self) -> usize {
        match self {
            Self::Positional(converters) => converters.iter().flatten().count(),
            Self::Named(converters) => converters.len(),
            Self::PassThrough => 0,
        }
    }

    fn by_position(&self, position: usize) -> Option<&FieldConverter> {
        match self {
            Self::Positional(converters) => converters.get(position).and_then(Option::as_ref),
            _ => None,
        }
    }

    fn by_name(&self, name: &str) -> Option<&FieldConverter> {
        match self {
            Self::Named(converters) => converters.get(name),
            _ => None,
        }
    }
}

impl RowProcessor for RowConverter {
    type Input = Row;
    type Output = Row;

    fn process(&self, ordinal: u64, row: Row) -> Result<Row, RowError> {
        let mut errors = Vec::new();
        let converted = match (self, row) {
            (Self::PassThrough, row) => return Ok(row),
            (Self::Positional(_), row) => Row::Positional(
                row.into_values()
                    .into_iter()
                    .enumerate()
                    .map(|(position, value)| {
                        let converter = self.by_position(position);
                        apply(converter, FieldRef::Position(position), value, ordinal, &mut errors)
                    })
                    .collect(),
            ),
            (Self::Named(_), Row::Named(fields)) => Row::Named(
                fields
                    .into_iter()
                    .map(|(name, value)| {
                        let converter = self.by_name(&name);
                        let field = FieldRef::Name(name.clone());
                        (name, apply(converter, field, value, ordinal, &mut errors))
                    })
                    .collect(),
            ),
            (Self::Named(_), Row::Positional(values)) => Row::Named(
                values
                    .into_iter()
                    .enumerate()
                    .map(|(position, value)| {
                        let name = default_column_name(position);
                        let converter = self.by_name(&name);
                        let field = FieldRef::Name(name.clone());
                        (name, apply(converter, field, value, ordinal, &mut errors))
                    })
                    .collect(),
            ),
        };

        if errors.is_empty() {
            Ok(converted)
        } else {
            Err(RowError::new(ordinal, errors))
        }
    }
}

fn apply(
    converter: Option<&FieldConverter>,
    field: FieldRef,
    value: Value,
    ordinal: u64,
    errors: &mut Vec<FieldError>,
) -> Value {
    let Some(converter) = converter else {
        return value;
    };
    match converter.convert(&value) {
        Ok(converted) => converted,
        Err(e) => {
            debug!(ordinal, %field, %value, error = %e, "field conversion failed");
            errors.push(FieldError {
                field,
                value,
                message: e.to_string(),
            });
            Value::Null
        }
    }
}

/// Forwards already-structured records unchanged.
pub struct PassThrough<T>(PhantomData<fn() -> T>);

impl<T> PassThrough<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for PassThrough<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RowProcessor for PassThrough<T> {
    type Input = T;
    type Output = T;

    fn process(&self, _ordinal: u64, row: T) -> Result<T, RowError> {
        Ok(row)
    }
}
