//! CSV tokenizer bound to a [`ParsingSpec`] and a [`HeaderSpec`].
//!
//! This module provides:
//! - [`CsvRowSource`]: raw rows, positional or named, for the column converters
//! - [`CsvObjectSource`]: Serde-backed records for caller-defined types
//! - [`read_csv_records`]: eager helper reading a whole file as typed lists
//!
//! # Design notes
//! - Headers are consumed in `open()`: the skipped data row first, then the
//!   header line.
//! - Array columns are split here, before conversion; an empty field yields an
//!   empty array.
//! - Rows may have any number of fields.

use crate::error::{Error, Result};
use crate::processor::{PassThrough, RowConverter};
use crate::schema::{HeaderSpec, ParsingSpec, default_column_name};
use crate::sequencer::{RecordEnvelope, RecordSequencer, RowSource};
use crate::source::SourceConfig;
use crate::value::{Row, Value};
use anyhow::Context;
use csv::{StringRecord, StringRecordsIntoIter, Terminator};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

/// Build a `csv` reader honoring the document syntax rules.
///
/// # Errors
/// [`Error::Specification`] when a separator, quote or escape character cannot
/// be used by the tokenizer.
pub fn reader_builder(parsing: &ParsingSpec) -> Result<csv::ReaderBuilder> {
    parsing.validate()?;
    let delimiter = ascii(parsing.column_separator, "column separator")?;
    let quote = ascii(parsing.quote_char, "quote character")?;
    let escape = ascii(parsing.escape_char, "escape character")?;

    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote(quote)
        .terminator(terminator(&parsing.line_separator)?);
    if escape == quote {
        builder.double_quote(true).escape(None);
    } else {
        builder.double_quote(false).escape(Some(escape));
    }
    if parsing.allow_comments {
        builder.comment(Some(b'#'));
    }
    Ok(builder)
}

fn ascii(c: char, what: &str) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| Error::specification(format!("The {what} '{c}' is not an ASCII character")))
}

fn terminator(line_separator: &str) -> Result<Terminator> {
    match line_separator.as_bytes() {
        b"\n" | b"\r\n" => Ok(Terminator::CRLF),
        [b] if b.is_ascii() => Ok(Terminator::Any(*b)),
        _ => Err(Error::specification(format!(
            "The line separator {line_separator:?} is not supported"
        ))),
    }
}

type Records = StringRecordsIntoIter<Box<dyn Read>>;

/// Opens the source and consumes the leading rows the header declares.
///
/// Returns the remaining records and the header line, when one is expected.
fn open_records(
    source: &SourceConfig,
    parsing: &ParsingSpec,
    header: &HeaderSpec,
) -> Result<(Records, Option<StringRecord>)> {
    let builder = reader_builder(parsing)?;
    let stream = source.open()?;
    let mut reader = builder.from_reader(stream);
    let mut record = StringRecord::new();
    let mut read_leading = |what: &str| {
        reader
            .read_record(&mut record)
            .map_err(|e| Error::resource(source.describe(), format!("read {what}: {e}")))
    };

    if header.skips_first_data_row() {
        read_leading("first data row")?;
    }
    let names = if header.uses_header() && read_leading("header line")? {
        Some(record.clone())
    } else {
        None
    };
    Ok((reader.into_records(), names))
}

/// Raw CSV rows, split into arrays for array columns.
#[derive(Debug, Clone)]
pub struct CsvRowSource {
    source: SourceConfig,
    parsing: ParsingSpec,
    header: HeaderSpec,
    named: bool,
}

impl CsvRowSource {
    /// Rows of values indexed by position.
    pub fn positional(source: SourceConfig, parsing: ParsingSpec, header: HeaderSpec) -> Self {
        Self {
            source,
            parsing,
            header,
            named: false,
        }
    }

    /// Rows of `(name, value)` pairs.
    pub fn named(source: SourceConfig, parsing: ParsingSpec, header: HeaderSpec) -> Self {
        Self {
            source,
            parsing,
            header,
            named: true,
        }
    }

    pub fn header(&self) -> &HeaderSpec {
        &self.header
    }
}

impl RowSource for CsvRowSource {
    type Row = Row;
    type Rows = CsvRows;

    fn open(&mut self) -> Result<CsvRows> {
        let (records, header_line) = open_records(&self.source, &self.parsing, &self.header)?;
        let mut names: Vec<String> = header_line
            .map(|line| line.iter().map(str::to_owned).collect())
            .unwrap_or_default();
        // Columns past the header line, or every column without one.
        for column in self.header.columns() {
            if column.position() >= names.len() {
                names.resize_with(column.position() + 1, String::new);
                names[column.position()] = column.name().to_owned();
            }
        }
        for (position, name) in names.iter_mut().enumerate() {
            if name.is_empty() {
                *name = default_column_name(position);
            }
        }

        let mut by_position = HashMap::new();
        let mut by_name = HashMap::new();
        for column in self.header.columns().filter(|c| c.is_array()) {
            let separator = column.list_separator().to_owned();
            by_position.insert(column.position(), separator.clone());
            by_name.insert(column.name().to_owned(), separator);
        }

        let splitters = if self.named {
            Splitters::ByName(by_name)
        } else {
            Splitters::ByPosition(by_position)
        };
        Ok(CsvRows {
            records,
            names,
            splitters,
        })
    }

    fn describe(&self) -> String {
        format!("csv {}", self.source.describe())
    }
}

/// List separators of the array columns.
enum Splitters {
    ByPosition(HashMap<usize, String>),
    ByName(HashMap<String, String>),
}

/// Iterator over the rows of an opened CSV source.
pub struct CsvRows {
    records: Records,
    names: Vec<String>,
    splitters: Splitters,
}

impl CsvRows {
    fn name(&self, position: usize) -> String {
        self.names
            .get(position)
            .cloned()
            .unwrap_or_else(|| default_column_name(position))
    }

    fn separator(&self, position: usize, name: &str) -> Option<&str> {
        let separator = match &self.splitters {
            Splitters::ByPosition(separators) => separators.get(&position),
            Splitters::ByName(separators) => separators.get(name),
        };
        separator.map(String::as_str)
    }

    fn row(&self, record: &StringRecord) -> Row {
        let values = record.iter().enumerate().map(|(position, field)| {
            let name = self.name(position);
            let value = match self.separator(position, &name) {
                Some(_) if field.is_empty() => Value::Array(Vec::new()),
                Some(separator) => Value::Array(
                    field
                        .split(separator)
                        .map(|item| Value::String(item.to_owned()))
                        .collect(),
                ),
                None => Value::String(field.to_owned()),
            };
            (name, value)
        });
        if matches!(self.splitters, Splitters::ByName(_)) {
            Row::Named(values.collect())
        } else {
            Row::Positional(values.map(|(_, value)| value).collect())
        }
    }
}

impl Iterator for CsvRows {
    type Item = anyhow::Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .context("parse CSV record")
                .map(|record| self.row(&record)),
        )
    }
}

/// CSV records deserialized into `T` by header name.
///
/// Names come from the header line, else from the declared columns. Array
/// columns are not split for object targets.
pub struct CsvObjectSource<T> {
    source: SourceConfig,
    parsing: ParsingSpec,
    header: HeaderSpec,
    _t: PhantomData<fn() -> T>,
}

impl<T> CsvObjectSource<T> {
    pub fn new(source: SourceConfig, parsing: ParsingSpec, header: HeaderSpec) -> Self {
        Self {
            source,
            parsing,
            header,
            _t: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> RowSource for CsvObjectSource<T> {
    type Row = T;
    type Rows = CsvObjects<T>;

    fn open(&mut self) -> Result<CsvObjects<T>> {
        let (records, header_line) = open_records(&self.source, &self.parsing, &self.header)?;
        let names = header_line.or_else(|| {
            (!self.header.is_empty()).then(|| {
                (0..self.header.next_position())
                    .map(|position| {
                        self.header
                            .get(position)
                            .map_or_else(|| default_column_name(position), |c| c.name().to_owned())
                    })
                    .collect()
            })
        });
        Ok(CsvObjects {
            records,
            names,
            _t: PhantomData,
        })
    }

    fn describe(&self) -> String {
        format!("csv {}", self.source.describe())
    }
}

pub struct CsvObjects<T> {
    records: Records,
    names: Option<StringRecord>,
    _t: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iterator for CsvObjects<T> {
    type Item = anyhow::Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e).context("parse CSV record")),
        };
        Some(
            record
                .deserialize::<T>(self.names.as_ref())
                .context("deserialize CSV record"),
        )
    }
}

/// Read a whole CSV file as positional rows converted with `header`.
///
/// **Compression**: gzip, zstd, bzip2 and xz files are decompressed
/// transparently (when the respective feature flags are enabled).
///
/// # Errors
/// Returns an error if the file cannot be opened or if any row fails to convert.
pub fn read_csv_records(
    path: impl AsRef<Path>,
    header: HeaderSpec,
) -> anyhow::Result<Vec<RecordEnvelope<Row>>> {
    let path = path.as_ref();
    let mut source = SourceConfig::new();
    source.file(path);
    let converter = RowConverter::positional(&header);
    let rows = CsvRowSource::positional(source, ParsingSpec::default(), header);
    let mut sequencer = RecordSequencer::new(rows, converter);
    sequencer
        .start()
        .with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for record in sequencer.records() {
        out.push(record.with_context(|| format!("read {}", path.display()))?);
    }
    sequencer.stop();
    Ok(out)
}

/// Read a whole CSV file into typed records, using its first line as header.
///
/// # Errors
/// Returns an error if the file cannot be opened or any record fails to
/// deserialize into `T`.
pub fn read_csv_objects<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> anyhow::Result<Vec<RecordEnvelope<T>>> {
    let path = path.as_ref();
    let mut source = SourceConfig::new();
    source.file(path);
    let mut header = HeaderSpec::new();
    header.with_header();
    let objects = CsvObjectSource::<T>::new(source, ParsingSpec::default(), header);
    let mut sequencer = RecordSequencer::new(objects, PassThrough::new());
    sequencer
        .start()
        .with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for record in sequencer.records() {
        out.push(record.with_context(|| format!("read {}", path.display()))?);
    }
    sequencer.stop();
    Ok(out)
}
