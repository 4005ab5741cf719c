//! Reader specifications: where to read from, how to tokenize and which
//! columns to convert.
//!
//! A reader is declared with a fluent builder and turned into an unstarted
//! [`RecordSequencer`] by one of its terminal operations. Every configuration
//! check happens before the sequencer exists, so that a sequencer never sees an
//! invalid schema.
//!
//! ```no_run
//! use rowcast::CsvReader;
//!
//! # fn main() -> rowcast::Result<()> {
//! let mut rows = CsvReader::new()
//!     .file("prices.csv")
//!     .column_separator(';')
//!     .header(|h| {
//!         h.skip_first_data_row().with_header();
//!         h.column("sku")?.string(true);
//!         h.column("price")?.nullable_big_decimal();
//!         Ok(())
//!     })?
//!     .into_map()?;
//!
//! rows.start()?;
//! while rows.has_next()? {
//!     let record = rows.next_record()?;
//!     println!("{}: {:?}", record.ordinal, record.value.get_named("price"));
//! }
//! rows.stop();
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::processor::{OutputShape, PassThrough, RowConverter};
use crate::schema::{HeaderSpec, ParsingSpec};
use crate::sequencer::RecordSequencer;
use crate::source::SourceConfig;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

#[cfg(feature = "io-csv")]
use crate::io::csv::{CsvObjectSource, CsvRowSource, reader_builder};
#[cfg(feature = "io-json")]
use crate::io::json::JsonObjectSource;
#[cfg(feature = "io-xml")]
use crate::io::xml::XmlObjectSource;

/// Sequencer over CSV rows converted column by column.
#[cfg(feature = "io-csv")]
pub type CsvSequencer = RecordSequencer<CsvRowSource, RowConverter>;

macro_rules! source_setters {
    () => {
        pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
            self.source.file(path);
            self
        }

        /// Name looked up in the resource roots; a leading `/` is ignored.
        pub fn resource(mut self, name: impl Into<String>) -> Self {
            self.source.resource(name);
            self
        }

        /// A `file://` URL.
        pub fn url(mut self, url: impl Into<String>) -> Self {
            self.source.url(url);
            self
        }

        pub fn resource_root(mut self, root: impl Into<PathBuf>) -> Self {
            self.source.resource_root(root);
            self
        }

        /// Character encoding of the source, as a WHATWG label. Defaults to UTF-8.
        pub fn encoding(mut self, label: &str) -> Result<Self> {
            self.source.encoding(label)?;
            Ok(self)
        }

        pub fn source_config(&self) -> &SourceConfig {
            &self.source
        }
    };
}

/// Declaration of a CSV reader.
#[cfg(feature = "io-csv")]
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    source: SourceConfig,
    parsing: ParsingSpec,
    header: HeaderSpec,
}

#[cfg(feature = "io-csv")]
impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already assembled declaration.
    pub fn from_parts(source: SourceConfig, parsing: ParsingSpec, header: HeaderSpec) -> Self {
        Self {
            source,
            parsing,
            header,
        }
    }

    source_setters!();

    /// # Errors
    /// [`Error::Specification`] when `separator` is empty.
    pub fn line_separator(mut self, separator: &str) -> Result<Self> {
        if separator.is_empty() {
            return Err(Error::specification("The line separator should not be empty"));
        }
        self.parsing.line_separator = separator.to_owned();
        Ok(self)
    }

    pub fn column_separator(mut self, separator: char) -> Self {
        self.parsing.column_separator = separator;
        self
    }

    pub fn quote_char(mut self, quote: char) -> Self {
        self.parsing.quote_char = quote;
        self
    }

    pub fn escape_char(mut self, escape: char) -> Self {
        self.parsing.escape_char = escape;
        self
    }

    pub fn allow_comments(mut self, allow: bool) -> Self {
        self.parsing.allow_comments = allow;
        self
    }

    /// Declares the header handling and the columns.
    pub fn header(mut self, declare: impl FnOnce(&mut HeaderSpec) -> Result<()>) -> Result<Self> {
        declare(&mut self.header)?;
        Ok(self)
    }

    pub fn parsing_spec(&self) -> &ParsingSpec {
        &self.parsing
    }

    pub fn header_spec(&self) -> &HeaderSpec {
        &self.header
    }

    fn check(&self) -> Result<()> {
        reader_builder(&self.parsing)?;
        self.source.require_location()?;
        Ok(())
    }

    /// Rows as positional lists of converted values.
    pub fn into_list(self) -> Result<CsvSequencer> {
        self.into_shape(OutputShape::List)
    }

    /// Rows as ordered `(name, value)` mappings.
    pub fn into_map(self) -> Result<CsvSequencer> {
        self.into_shape(OutputShape::Map)
    }

    /// Rows as lists or mappings.
    ///
    /// # Errors
    /// [`Error::Specification`] for [`OutputShape::Object`], which needs a
    /// target type: use [`into_object`](Self::into_object).
    pub fn into_shape(self, shape: OutputShape) -> Result<CsvSequencer> {
        self.check()?;
        let converter = RowConverter::for_shape(shape, &self.header);
        let source = match shape {
            OutputShape::List => CsvRowSource::positional(self.source, self.parsing, self.header),
            OutputShape::Map => CsvRowSource::named(self.source, self.parsing, self.header),
            OutputShape::Object => {
                return Err(Error::specification(
                    "Object rows need a target type, use into_object",
                ));
            }
        };
        Ok(RecordSequencer::new(source, converter))
    }

    /// Records deserialized into `T` by header name; columns are not converted.
    pub fn into_object<T: DeserializeOwned>(
        self,
    ) -> Result<RecordSequencer<CsvObjectSource<T>, PassThrough<T>>> {
        self.check()?;
        let source = CsvObjectSource::new(self.source, self.parsing, self.header);
        Ok(RecordSequencer::new(source, PassThrough::new()))
    }
}

/// Declaration of a JSON reader.
#[cfg(feature = "io-json")]
#[derive(Debug, Clone, Default)]
pub struct JsonReader {
    source: SourceConfig,
}

#[cfg(feature = "io-json")]
impl JsonReader {
    pub fn new() -> Self {
        Self::default()
    }

    source_setters!();

    pub fn into_object<T: DeserializeOwned>(
        self,
    ) -> Result<RecordSequencer<JsonObjectSource<T>, PassThrough<T>>> {
        self.source.require_location()?;
        Ok(RecordSequencer::new(
            JsonObjectSource::new(self.source),
            PassThrough::new(),
        ))
    }
}

/// Declaration of an XML reader.
#[cfg(feature = "io-xml")]
#[derive(Debug, Clone, Default)]
pub struct XmlReader {
    source: SourceConfig,
}

#[cfg(feature = "io-xml")]
impl XmlReader {
    pub fn new() -> Self {
        Self::default()
    }

    source_setters!();

    pub fn into_object<T: DeserializeOwned>(
        self,
    ) -> Result<RecordSequencer<XmlObjectSource<T>, PassThrough<T>>> {
        self.source.require_location()?;
        Ok(RecordSequencer::new(
            XmlObjectSource::new(self.source),
            PassThrough::new(),
        ))
    }
}
