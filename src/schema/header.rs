//! Declaration of the columns of a document and of its header handling.

use crate::error::{Error, Result};
use crate::schema::column::{ColumnBuilder, ColumnSpec};
use std::collections::BTreeMap;

/// Columns indexed by position, plus the flags driving header detection.
///
/// Positions may leave gaps; undeclared positions pass through conversion
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderSpec {
    columns: BTreeMap<usize, ColumnSpec>,
    skip_first_data_row: bool,
    with_header: bool,
}

impl HeaderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips the first row of data, for files whose first line is not real data.
    pub fn skip_first_data_row(&mut self) -> &mut Self {
        self.skip_first_data_row = true;
        self
    }

    /// The first non-skipped row holds the field names.
    pub fn with_header(&mut self) -> &mut Self {
        self.with_header = true;
        self
    }

    pub fn skips_first_data_row(&self) -> bool {
        self.skip_first_data_row
    }

    pub fn uses_header(&self) -> bool {
        self.with_header
    }

    /// Adds a column after the last declared position.
    pub fn column(&mut self, name: &str) -> Result<ColumnBuilder<'_, Option<String>>> {
        let position = self.next_position();
        self.column_at(position, name)
    }

    /// Adds a column at `position` (0-based).
    pub fn column_at(
        &mut self,
        position: usize,
        name: &str,
    ) -> Result<ColumnBuilder<'_, Option<String>>> {
        if name.trim().is_empty() {
            return Err(Error::specification("A column name cannot be blank"));
        }
        if self.by_name(name).is_some() {
            return Err(Error::specification(format!(
                "A column with name {name} already exists"
            )));
        }
        if self.columns.contains_key(&position) {
            return Err(Error::specification(format!(
                "A column with index {position} already exists"
            )));
        }
        let spec = self
            .columns
            .entry(position)
            .or_insert_with(|| ColumnSpec::new(position, name.to_owned()));
        Ok(ColumnBuilder::new(spec))
    }

    /// Adds a column at `position`, named `field-<position>`.
    pub fn column_at_position(
        &mut self,
        position: usize,
    ) -> Result<ColumnBuilder<'_, Option<String>>> {
        self.column_at(position, &default_column_name(position))
    }

    /// Position a column added by name would receive.
    pub fn next_position(&self) -> usize {
        self.columns.last_key_value().map_or(0, |(p, _)| p + 1)
    }

    pub fn get(&self, position: usize) -> Option<&ColumnSpec> {
        self.columns.get(&position)
    }

    pub fn by_name(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.values().find(|c| c.name() == name)
    }

    /// Declared columns in position order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Name given to columns declared by position only.
pub fn default_column_name(position: usize) -> String {
    format!("field-{position}")
}
