//! Continuation policies for rows that fail to convert.
//!
//! The [`RecordSequencer`] never skips rows on its own; [`RecordSequencer::drain`]
//! applies one of the [`RowErrorPolicy`] modes on top of it:
//!
//! - [`RowErrorPolicy::FailFast`] stops at the first failed row,
//! - [`RowErrorPolicy::SkipInvalid`] silently drops failed rows,
//! - [`RowErrorPolicy::LogAndContinue`] logs failed rows and records them in an
//!   [`ErrorCollector`].
//!
//! ```no_run
//! use rowcast::{CsvReader, ErrorCollector, RowErrorPolicy};
//!
//! # fn main() -> rowcast::Result<()> {
//! let mut reader = CsvReader::new()
//!     .file("orders.csv")
//!     .header(|h| {
//!         h.with_header();
//!         h.column("amount")?.double();
//!         Ok(())
//!     })?
//!     .into_map()?;
//!
//! let mut collector = ErrorCollector::new();
//! let records = reader.drain(RowErrorPolicy::LogAndContinue, Some(&mut collector))?;
//! println!("{} records, {} failed rows", records.len(), collector.error_count());
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::processor::RowProcessor;
use crate::sequencer::{RecordEnvelope, RecordSequencer, RowSource, SequencerState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{fmt, io};
use tracing::warn;

/// What to do with a row whose conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Stop at the first failed row and return its error.
    #[default]
    FailFast,
    /// Drop failed rows silently.
    SkipInvalid,
    /// Log failed rows, record them in the collector and continue.
    LogAndContinue,
}

/// A failed row, kept for batch reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    pub ordinal: u64,
    pub messages: Vec<String>,
}

/// Accumulates failed rows when draining with [`RowErrorPolicy::LogAndContinue`].
#[derive(Debug, Clone, Default)]
pub struct ErrorCollector {
    errors: Vec<RecordError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a row-scoped error. Other errors are ignored.
    pub fn add(&mut self, error: &Error) {
        let Some(ordinal) = error.ordinal() else {
            return;
        };
        let messages = match error {
            Error::Row(row) => row.messages(),
            other => vec![other.to_string()],
        };
        self.errors.push(RecordError { ordinal, messages });
    }

    /// Number of failed rows.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[RecordError] {
        &self.errors
    }

    pub fn ordinals(&self) -> Vec<u64> {
        self.errors.iter().map(|e| e.ordinal).collect()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.errors)
    }

    /// Write the collected errors to a file in JSON format.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl fmt::Display for ErrorCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCollector({} errors)", self.error_count())
    }
}

impl<S, P> RecordSequencer<S, P>
where
    S: RowSource,
    P: RowProcessor<Input = S::Row>,
{
    /// Reads every remaining record under `policy`, then stops the sequencer.
    ///
    /// An unstarted sequencer is started first. The sequencer is stopped on
    /// every exit path, including failures.
    ///
    /// # Errors
    /// The first row error under [`RowErrorPolicy::FailFast`]; resource and
    /// fault errors under every policy.
    pub fn drain(
        &mut self,
        policy: RowErrorPolicy,
        mut collector: Option<&mut ErrorCollector>,
    ) -> Result<Vec<RecordEnvelope<P::Output>>> {
        if self.state() == SequencerState::Unstarted {
            self.start()?;
        }
        let mut out = Vec::new();
        let mut outcome = Ok(());
        for record in self.records() {
            match record {
                Ok(record) => out.push(record),
                Err(e) if e.is_row_scoped() && policy != RowErrorPolicy::FailFast => {
                    if policy == RowErrorPolicy::LogAndContinue {
                        warn!(error = %e, "dropping row that failed to convert");
                        if let Some(collector) = collector.as_deref_mut() {
                            collector.add(&e);
                        }
                    }
                }
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        self.stop();
        outcome.map(|()| out)
    }
}
