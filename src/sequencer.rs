//! Lazy, ordinal-tagging iteration over a row source.
//!
//! A [`RecordSequencer`] goes through three states:
//!
//! ```text
//! Unstarted --start()--> Active --stop()--> Closed
//! ```
//!
//! The source is opened by `start()`; nothing is read before the first
//! [`has_next`](RecordSequencer::has_next). Each pulled row receives the next
//! ordinal (0, 1, 2, ...) whether its conversion succeeds or not. Rows are never
//! skipped by the sequencer: a failed row is returned as an error and the
//! caller decides whether to keep pulling.

use crate::error::{Error, Result};
use crate::processor::RowProcessor;
use serde::Serialize;
use std::iter::Peekable;
use tracing::{debug, trace};

/// A produced record and its zero-based position in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordEnvelope<T> {
    pub ordinal: u64,
    pub value: T,
}

impl<T> RecordEnvelope<T> {
    pub fn new(ordinal: u64, value: T) -> Self {
        Self { ordinal, value }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RecordEnvelope<U> {
        RecordEnvelope {
            ordinal: self.ordinal,
            value: f(self.value),
        }
    }
}

/// Opens the underlying resource and binds a tokenizer to it.
///
/// The returned iterator owns the resource; dropping it releases the resource.
pub trait RowSource {
    type Row;
    type Rows: Iterator<Item = anyhow::Result<Self::Row>>;

    fn open(&mut self) -> Result<Self::Rows>;

    /// Short description used in logs.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Unstarted,
    Active,
    Closed,
}

enum State<I: Iterator> {
    Unstarted,
    Active(Peekable<I>),
    Closed,
}

pub struct RecordSequencer<S: RowSource, P> {
    source: S,
    processor: P,
    state: State<S::Rows>,
    next_ordinal: u64,
}

impl<S, P> RecordSequencer<S, P>
where
    S: RowSource,
    P: RowProcessor<Input = S::Row>,
{
    pub fn new(source: S, processor: P) -> Self {
        Self {
            source,
            processor,
            state: State::Unstarted,
            next_ordinal: 0,
        }
    }

    pub fn state(&self) -> SequencerState {
        match self.state {
            State::Unstarted => SequencerState::Unstarted,
            State::Active(_) => SequencerState::Active,
            State::Closed => SequencerState::Closed,
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Opens the source. A sequencer can be started only once.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            State::Unstarted => {
                let rows = self.source.open()?;
                debug!(source = %self.source.describe(), "record sequencer started");
                self.state = State::Active(rows.peekable());
                Ok(())
            }
            State::Active(_) => Err(Error::fault("the sequencer is already started")),
            State::Closed => Err(Error::fault("a closed sequencer cannot be restarted")),
        }
    }

    /// Whether another row is available.
    pub fn has_next(&mut self) -> Result<bool> {
        Ok(self.rows("has_next")?.peek().is_some())
    }

    /// Pulls the next row, assigns its ordinal and converts it.
    ///
    /// # Errors
    /// - [`Error::Row`] when fields of the row failed to convert,
    /// - [`Error::Source`] when the tokenizer could not read the row,
    /// - [`Error::Fault`] when the sequencer is not active or is exhausted.
    pub fn next_record(&mut self) -> Result<RecordEnvelope<P::Output>> {
        let raw = self
            .rows("next")?
            .next()
            .ok_or_else(|| Error::fault("no more records"))?;
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let raw = raw.map_err(|e| Error::Source {
            ordinal,
            message: format!("{e:#}"),
        })?;
        let value = self.processor.process(ordinal, raw)?;
        trace!(ordinal, "record produced");
        Ok(RecordEnvelope::new(ordinal, value))
    }

    /// Releases the source. Stopping twice is harmless.
    pub fn stop(&mut self) {
        if matches!(self.state, State::Active(_)) {
            debug!(
                source = %self.source.describe(),
                records = self.next_ordinal,
                "record sequencer stopped"
            );
        }
        self.state = State::Closed;
    }

    /// Iterates over the remaining records; the sequencer must be active.
    pub fn records(&mut self) -> Records<'_, S, P> {
        Records {
            sequencer: self,
            done: false,
        }
    }

    fn rows(&mut self, operation: &str) -> Result<&mut Peekable<S::Rows>> {
        match &mut self.state {
            State::Active(rows) => Ok(rows),
            State::Unstarted => Err(Error::fault(format!(
                "{operation} called before the sequencer was started"
            ))),
            State::Closed => Err(Error::fault(format!(
                "{operation} called after the sequencer was stopped"
            ))),
        }
    }
}

/// Iterator over the remaining records of a [`RecordSequencer`].
///
/// Yields one `Err` per failed row and keeps going; a fault ends the iteration.
pub struct Records<'a, S: RowSource, P> {
    sequencer: &'a mut RecordSequencer<S, P>,
    done: bool,
}

impl<S, P> Iterator for Records<'_, S, P>
where
    S: RowSource,
    P: RowProcessor<Input = S::Row>,
{
    type Item = Result<RecordEnvelope<P::Output>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.sequencer.has_next() {
            Ok(true) => Some(self.sequencer.next_record()),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
