//! Document-level syntax rules handed to the tokenizer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingSpec {
    /// Record terminator. Must not be empty.
    pub line_separator: String,
    pub column_separator: char,
    /// Escapes a quote inside a quoted field.
    pub escape_char: char,
    /// Wraps fields that contain separators.
    pub quote_char: char,
    /// Skip lines starting with `#`.
    pub allow_comments: bool,
}

impl Default for ParsingSpec {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_owned(),
            column_separator: ',',
            escape_char: '\\',
            quote_char: '"',
            allow_comments: false,
        }
    }
}

impl ParsingSpec {
    pub fn validate(&self) -> Result<()> {
        if self.line_separator.is_empty() {
            return Err(Error::specification("The line separator should not be empty"));
        }
        Ok(())
    }
}
