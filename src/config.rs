//! Reader declarations loaded from JSON.
//!
//! ```json
//! {
//!   "source": { "file": "orders.csv", "encoding": "utf-8" },
//!   "parsing": { "column_separator": ";" },
//!   "header": {
//!     "with_header": true,
//!     "columns": [
//!       { "name": "id", "type": "long" },
//!       { "name": "tags", "type": "string", "nullable": true, "array": "|" },
//!       { "position": 5, "type": "integer", "ignore_error": true, "default": 0 }
//!     ]
//!   },
//!   "shape": "map"
//! }
//! ```
//!
//! Loading goes through the same builder as code declarations, so the same
//! checks apply.

use crate::column_type::{ColumnType, ScalarKind};
use crate::error::{Error, Result};
use crate::processor::OutputShape;
use crate::schema::{HeaderSpec, ParsingSpec};
use crate::source::SourceConfig;
use crate::value::Value;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[cfg(feature = "io-csv")]
use crate::reader::{CsvReader, CsvSequencer};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub source: SourceSection,
    pub parsing: ParsingSpec,
    pub header: HeaderSection,
    pub shape: OutputShape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSection {
    pub file: Option<PathBuf>,
    pub resource: Option<String>,
    pub url: Option<String>,
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderSection {
    pub skip_first_data_row: bool,
    pub with_header: bool,
    pub columns: Vec<ColumnConfig>,
}

/// One declared column. Without `type`, the column is a nullable, untrimmed
/// string whatever `nullable` says; every other key still applies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    pub position: Option<usize>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ScalarKind>,
    pub nullable: bool,
    /// Overrides the trim default of the type.
    pub trim: Option<bool>,
    /// List separator; makes the column an array.
    pub array: Option<String>,
    pub ignore_error: bool,
    pub default: Option<serde_json::Value>,
}

impl ReaderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::specification(format!("invalid reader configuration: {e}")))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::resource(format!("file {}", path.display()), e))?;
        Self::from_json_str(&json)
    }

    pub fn source_config(&self) -> Result<SourceConfig> {
        let section = &self.source;
        let mut source = SourceConfig::new();
        if let Some(file) = &section.file {
            source.file(file);
        }
        if let Some(resource) = &section.resource {
            source.resource(resource.as_str());
        }
        if let Some(url) = &section.url {
            source.url(url.as_str());
        }
        if let Some(encoding) = &section.encoding {
            source.encoding(encoding)?;
        }
        Ok(source)
    }

    pub fn header_spec(&self) -> Result<HeaderSpec> {
        let mut header = HeaderSpec::new();
        if self.header.skip_first_data_row {
            header.skip_first_data_row();
        }
        if self.header.with_header {
            header.with_header();
        }
        for column in &self.header.columns {
            column.declare(&mut header)?;
        }
        Ok(header)
    }

    #[cfg(feature = "io-csv")]
    pub fn into_csv_reader(self) -> Result<CsvReader> {
        self.parsing.validate()?;
        let source = self.source_config()?;
        let header = self.header_spec()?;
        Ok(CsvReader::from_parts(source, self.parsing, header))
    }

    /// Reader with the declared output shape.
    #[cfg(feature = "io-csv")]
    pub fn into_csv_sequencer(self) -> Result<CsvSequencer> {
        let shape = self.shape;
        self.into_csv_reader()?.into_shape(shape)
    }
}

impl ColumnConfig {
    fn declare(&self, header: &mut HeaderSpec) -> Result<()> {
        let builder = match (self.position, self.name.as_deref()) {
            (Some(position), Some(name)) => header.column_at(position, name)?,
            (Some(position), None) => header.column_at_position(position)?,
            (None, Some(name)) => header.column(name)?,
            (None, None) => {
                return Err(Error::specification("A column needs a position or a name"));
            }
        };
        if self.default.is_some() && !self.ignore_error {
            return Err(Error::specification(format!(
                "The column {} has a default value but does not ignore errors",
                builder.spec().name()
            )));
        }
        let column_type = match self.kind {
            Some(kind) => ColumnType::new(kind, self.nullable),
            None => ColumnType::default(),
        };
        let kind = column_type.kind;
        let mut builder = builder.of_type(column_type);
        if let Some(trim) = self.trim {
            builder = builder.trim(trim);
        }
        if self.ignore_error {
            let default = match &self.default {
                Some(json) => default_value(kind, json)?,
                None => Value::Null,
            };
            builder = builder.ignore_error(default);
        }
        if let Some(separator) = &self.array {
            builder.array(separator);
        }
        Ok(())
    }
}

/// Converts a JSON default to the column kind, element by element for arrays.
fn default_value(kind: ScalarKind, json: &serde_json::Value) -> Result<Value> {
    let text = match json {
        serde_json::Value::Null => return Ok(Value::Null),
        serde_json::Value::Array(items) => {
            return items
                .iter()
                .map(|item| default_value(kind, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array);
        }
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Object(_) => {
            return Err(Error::specification(format!(
                "The default value {json} cannot be used for a {kind} column"
            )));
        }
    };
    ColumnType::nullable(kind)
        .cast(Some(&text))
        .map_err(|e| Error::specification(format!("Invalid default value {json}: {e}")))
}
