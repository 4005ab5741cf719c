//! # Rowcast
//!
//! **Schema-driven record reading** for Rust. Rowcast turns CSV, JSON and XML
//! documents into typed rows, one at a time, each tagged with its position in
//! the input.
//!
//! ## Key Features
//!
//! - **Declared columns** - name or position, scalar type, nullability, trimming,
//!   arrays and error tolerance, checked before any row is read
//! - **Per-row error aggregation** - every failing field of a row is reported at once
//! - **Ordinals** - zero-based, gap-free sequence numbers, failed rows included
//! - **Lazy iteration** - nothing is read before the first pull
//! - **I/O integrations** - CSV, JSON and XML (optional via feature flags), with
//!   transparent decompression and character decoding
//!
//! ## Quick Start
//!
//! ```no_run
//! use rowcast::*;
//!
//! # fn main() -> Result<()> {
//! let mut rows = CsvReader::new()
//!     .file("orders.csv")
//!     .header(|h| {
//!         h.with_header();
//!         h.column("id")?.long();
//!         h.column("amount")?.double();
//!         h.column("tags")?.nullable_string(true).array("|");
//!         Ok(())
//!     })?
//!     .into_map()?;
//!
//! rows.start()?;
//! while rows.has_next()? {
//!     match rows.next_record() {
//!         Ok(record) => println!("#{} {:?}", record.ordinal, record.value),
//!         Err(Error::Row(e)) => eprintln!("skipping {e}"),
//!         Err(e) => return Err(e),
//!     }
//! }
//! rows.stop();
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Schema
//!
//! A [`HeaderSpec`] holds the declared [`ColumnSpec`]s and the header flags;
//! a [`ParsingSpec`] holds the document syntax. Columns are narrowed through
//! the typed [`ColumnBuilder`].
//!
//! ### Conversion
//!
//! Every column gets a [`FieldConverter`](convert::FieldConverter) composed of
//! trim, cast, array and error-substitution stages. A [`RowConverter`] applies
//! them to whole rows, positionally or by name.
//!
//! ### Sequencing
//!
//! A [`RecordSequencer`] binds a [`RowSource`] and a [`RowProcessor`] and
//! hands out [`RecordEnvelope`]s. It goes from unstarted to active to closed,
//! and never skips rows on its own: [`RecordSequencer::drain`] applies a
//! [`RowErrorPolicy`] on top of it.
//!
//! ## Feature Flags
//!
//! - `io-csv` - CSV reading
//! - `io-json` - JSON and JSON Lines reading
//! - `io-xml` - XML reading
//! - `compression-gzip`, `compression-zstd`, `compression-bzip2`, `compression-xz` -
//!   transparent decompression of sources
//!
//! ## Module Overview
//!
//! - [`schema`] - Column, header and parsing declarations
//! - [`column_type`] - Scalar kinds and their coercions
//! - [`convert`] - Per-column field converters
//! - [`processor`] - Row conversion strategies
//! - [`sequencer`] - Ordinal-tagging iteration over a source
//! - [`policy`] - Row error policies and error collection
//! - [`reader`] - Reader builders
//! - [`config`] - Reader declarations loaded from JSON
//! - [`source`] and [`io`] - Resource opening and format tokenizers
//! - [`testing`] - Helpers for tests

pub mod column_type;
pub mod config;
pub mod convert;
pub mod error;
pub mod io;
pub mod policy;
pub mod processor;
pub mod reader;
pub mod schema;
pub mod sequencer;
pub mod source;
pub mod testing;
pub mod value;

// General re-exports
pub use column_type::{ColumnType, ScalarKind};
pub use config::ReaderConfig;
pub use error::{CastError, Error, FieldError, FieldRef, Result, RowError};
pub use policy::{ErrorCollector, RecordError, RowErrorPolicy};
pub use processor::{OutputShape, RowConverter, RowProcessor};
pub use schema::{ColumnBuilder, ColumnSpec, HeaderSpec, ParsingSpec};
pub use sequencer::{RecordEnvelope, RecordSequencer, RowSource, SequencerState};
pub use source::{Location, SourceConfig};
pub use value::{Row, Value};

// Gated re-exports
#[cfg(feature = "io-csv")]
pub use reader::{CsvReader, CsvSequencer};

#[cfg(feature = "io-csv")]
pub use io::csv::{read_csv_objects, read_csv_records};

#[cfg(feature = "io-json")]
pub use reader::JsonReader;

#[cfg(feature = "io-json")]
pub use io::json::read_json_records;

#[cfg(feature = "io-xml")]
pub use reader::XmlReader;

#[cfg(feature = "io-xml")]
pub use io::xml::read_xml_records;
