//! Schema model: parsing rules, header declaration and per-column types.

pub mod column;
pub mod header;
pub mod parsing;

pub use column::{ColumnBuilder, ColumnSpec, DEFAULT_LIST_SEPARATOR};
pub use header::{HeaderSpec, default_column_name};
pub use parsing::ParsingSpec;
