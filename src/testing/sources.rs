//! In-memory row sources.

use crate::error::{Error, Result};
use crate::sequencer::RowSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A [`RowSource`] over prepared rows.
///
/// Rows can be failures, to exercise tokenizer errors. The source tracks
/// whether its rows were released, which happens when the sequencer stops or
/// is dropped.
#[derive(Debug)]
pub struct VecSource<R> {
    rows: Option<Vec<anyhow::Result<R>>>,
    unavailable: Option<String>,
    released: Arc<AtomicBool>,
}

impl<R> VecSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self::with_results(rows.into_iter().map(Ok).collect())
    }

    pub fn with_results(rows: Vec<anyhow::Result<R>>) -> Self {
        Self {
            rows: Some(rows),
            unavailable: None,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A source that fails to open with a resource error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            rows: None,
            unavailable: Some(message.into()),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag set once the opened rows are dropped.
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl<R> RowSource for VecSource<R> {
    type Row = R;
    type Rows = VecRows<R>;

    fn open(&mut self) -> Result<VecRows<R>> {
        if let Some(message) = &self.unavailable {
            return Err(Error::resource("memory", message));
        }
        let rows = self
            .rows
            .take()
            .ok_or_else(|| Error::resource("memory", "rows already consumed"))?;
        Ok(VecRows {
            rows: rows.into_iter(),
            released: Arc::clone(&self.released),
        })
    }

    fn describe(&self) -> String {
        "memory".to_owned()
    }
}

pub struct VecRows<R> {
    rows: std::vec::IntoIter<anyhow::Result<R>>,
    released: Arc<AtomicBool>,
}

impl<R> Iterator for VecRows<R> {
    type Item = anyhow::Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl<R> Drop for VecRows<R> {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}
