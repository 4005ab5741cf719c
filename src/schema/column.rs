//! Declaration of a single column and its typed builder.

use crate::column_type::{ColumnType, ScalarKind};
use crate::value::Value;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::marker::PhantomData;

/// Separator used to split array columns when none is given.
pub const DEFAULT_LIST_SEPARATOR: &str = ";";

/// Type, format and error policy of one declared column.
///
/// Specs are created through [`HeaderSpec`](crate::schema::HeaderSpec), which
/// guarantees that positions and names are unique within a header.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    position: usize,
    name: String,
    column_type: ColumnType,
    trim: bool,
    is_array: bool,
    list_separator: String,
    ignore_error: bool,
    default_value: Option<Value>,
}

impl ColumnSpec {
    pub(crate) fn new(position: usize, name: String) -> Self {
        Self {
            position,
            name,
            column_type: ColumnType::default(),
            trim: false,
            is_array: false,
            list_separator: DEFAULT_LIST_SEPARATOR.to_owned(),
            ignore_error: false,
            default_value: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn trim(&self) -> bool {
        self.trim
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn list_separator(&self) -> &str {
        &self.list_separator
    }

    pub fn ignore_error(&self) -> bool {
        self.ignore_error
    }

    /// Replacement value for failed casts when [`ignore_error`](Self::ignore_error) is set.
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub(crate) fn set_type(&mut self, column_type: ColumnType, trim: bool) {
        self.column_type = column_type;
        self.trim = trim;
    }

    pub(crate) fn set_trim(&mut self, trim: bool) {
        self.trim = trim;
    }

    pub(crate) fn set_array(&mut self, separator: &str) {
        self.is_array = true;
        self.list_separator = separator.to_owned();
    }

    pub(crate) fn set_error_default(&mut self, default_value: Option<Value>) {
        self.ignore_error = true;
        self.default_value = default_value;
    }
}

/// Typed handle on a column stored in a header.
///
/// Each narrowing method consumes the builder and returns a new one whose type
/// parameter is the Rust type the column converts to, so that
/// [`ignore_error`](ColumnBuilder::ignore_error) only accepts a matching default.
///
/// ```
/// use rowcast::schema::HeaderSpec;
///
/// let mut header = HeaderSpec::new();
/// header.column("amount")?.double().ignore_error(0.0);
/// header.column("tags")?.string(true).array(",");
/// # Ok::<(), rowcast::Error>(())
/// ```
pub struct ColumnBuilder<'a, T> {
    spec: &'a mut ColumnSpec,
    _t: PhantomData<fn() -> T>,
}

impl<'a, T> ColumnBuilder<'a, T> {
    pub(crate) fn new(spec: &'a mut ColumnSpec) -> Self {
        Self {
            spec,
            _t: PhantomData,
        }
    }

    fn narrow<U>(self, column_type: ColumnType, trim: bool) -> ColumnBuilder<'a, U> {
        self.spec.set_type(column_type, trim);
        ColumnBuilder::new(self.spec)
    }

    /// Narrowing chosen at runtime. Strings are not trimmed, other kinds are.
    pub fn of_type(self, column_type: ColumnType) -> ColumnBuilder<'a, Value> {
        let trim = column_type.kind != ScalarKind::String;
        self.narrow(column_type, trim)
    }

    /// Nullable strings; empty values become null.
    pub fn nullable_string(self, trim: bool) -> ColumnBuilder<'a, Option<String>> {
        self.narrow(ColumnType::nullable(ScalarKind::String), trim)
    }

    /// Non-nullable strings; empty values are an error.
    pub fn string(self, trim: bool) -> ColumnBuilder<'a, String> {
        self.narrow(ColumnType::required(ScalarKind::String), trim)
    }

    pub fn nullable_integer(self) -> ColumnBuilder<'a, Option<i32>> {
        self.narrow(ColumnType::nullable(ScalarKind::Integer), true)
    }

    pub fn integer(self) -> ColumnBuilder<'a, i32> {
        self.narrow(ColumnType::required(ScalarKind::Integer), true)
    }

    pub fn nullable_long(self) -> ColumnBuilder<'a, Option<i64>> {
        self.narrow(ColumnType::nullable(ScalarKind::Long), true)
    }

    pub fn long(self) -> ColumnBuilder<'a, i64> {
        self.narrow(ColumnType::required(ScalarKind::Long), true)
    }

    pub fn nullable_float(self) -> ColumnBuilder<'a, Option<f32>> {
        self.narrow(ColumnType::nullable(ScalarKind::Float), true)
    }

    pub fn float(self) -> ColumnBuilder<'a, f32> {
        self.narrow(ColumnType::required(ScalarKind::Float), true)
    }

    pub fn nullable_double(self) -> ColumnBuilder<'a, Option<f64>> {
        self.narrow(ColumnType::nullable(ScalarKind::Double), true)
    }

    pub fn double(self) -> ColumnBuilder<'a, f64> {
        self.narrow(ColumnType::required(ScalarKind::Double), true)
    }

    pub fn nullable_big_integer(self) -> ColumnBuilder<'a, Option<BigInt>> {
        self.narrow(ColumnType::nullable(ScalarKind::BigInteger), true)
    }

    pub fn big_integer(self) -> ColumnBuilder<'a, BigInt> {
        self.narrow(ColumnType::required(ScalarKind::BigInteger), true)
    }

    pub fn nullable_big_decimal(self) -> ColumnBuilder<'a, Option<BigDecimal>> {
        self.narrow(ColumnType::nullable(ScalarKind::BigDecimal), true)
    }

    pub fn big_decimal(self) -> ColumnBuilder<'a, BigDecimal> {
        self.narrow(ColumnType::required(ScalarKind::BigDecimal), true)
    }

    /// Nullable booleans; blank values become null.
    pub fn nullable_boolean(self) -> ColumnBuilder<'a, Option<bool>> {
        self.narrow(ColumnType::nullable(ScalarKind::Boolean), true)
    }

    pub fn boolean(self) -> ColumnBuilder<'a, bool> {
        self.narrow(ColumnType::required(ScalarKind::Boolean), true)
    }

    /// Overrides the trim flag set by the type narrowing.
    pub fn trim(self, trim: bool) -> Self {
        self.spec.set_trim(trim);
        self
    }

    /// Treats the field as a list of values split on `separator`; every
    /// element is trimmed and cast on its own.
    pub fn array(self, separator: &str) -> ColumnBuilder<'a, Vec<T>> {
        self.spec.set_array(separator);
        ColumnBuilder::new(self.spec)
    }

    pub fn spec(&self) -> &ColumnSpec {
        self.spec
    }
}

impl<T: Into<Value>> ColumnBuilder<'_, T> {
    /// Swallows every conversion error of the column and yields `default` instead.
    pub fn ignore_error(self, default: T) -> Self {
        self.spec.set_error_default(Some(default.into()));
        self
    }
}
