//! XML record source: every direct child element of the document root is one
//! record, deserialized with `quick_xml::de`.
//!
//! The document is read into memory when the source is opened; records are
//! deserialized lazily.

use crate::error::{Error, Result};
use crate::processor::PassThrough;
use crate::sequencer::{RecordEnvelope, RecordSequencer, RowSource};
use crate::source::SourceConfig;
use anyhow::Context;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::marker::PhantomData;
use std::ops::Range;
use std::path::Path;

pub struct XmlObjectSource<T> {
    source: SourceConfig,
    _t: PhantomData<fn() -> T>,
}

impl<T> XmlObjectSource<T> {
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            _t: PhantomData,
        }
    }
}

fn offset(position: u64) -> anyhow::Result<usize> {
    usize::try_from(position).map_err(|_| anyhow::anyhow!("offset {position} out of range"))
}

/// Byte ranges of the direct children of the root element.
pub fn child_elements(xml: &str) -> anyhow::Result<Vec<Range<usize>>> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut children = Vec::new();
    loop {
        let start = offset(reader.buffer_position())?;
        match reader.read_event().context("parse XML")? {
            Event::Start(element) if depth == 1 => {
                reader
                    .read_to_end(element.name())
                    .context("parse XML element")?;
                children.push(start..offset(reader.buffer_position())?);
            }
            Event::Empty(_) if depth == 1 => {
                children.push(start..offset(reader.buffer_position())?);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(children)
}

impl<T: DeserializeOwned> RowSource for XmlObjectSource<T> {
    type Row = T;
    type Rows = XmlObjects<T>;

    fn open(&mut self) -> Result<XmlObjects<T>> {
        let mut document = String::new();
        self.source
            .open()?
            .read_to_string(&mut document)
            .map_err(|e| Error::resource(self.source.describe(), e))?;
        let children = child_elements(&document)
            .map_err(|e| Error::resource(self.source.describe(), format!("{e:#}")))?;
        Ok(XmlObjects {
            document,
            children: children.into_iter(),
            _t: PhantomData,
        })
    }

    fn describe(&self) -> String {
        format!("xml {}", self.source.describe())
    }
}

pub struct XmlObjects<T> {
    document: String,
    children: std::vec::IntoIter<Range<usize>>,
    _t: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iterator for XmlObjects<T> {
    type Item = anyhow::Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.children.next()?;
        Some(quick_xml::de::from_str(&self.document[range]).context("deserialize XML element"))
    }
}

/// Read a whole XML document into typed records, one per child of the root.
///
/// # Errors
/// Returns an error if the file cannot be opened or any element fails to
/// deserialize into `T`.
pub fn read_xml_records<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> anyhow::Result<Vec<RecordEnvelope<T>>> {
    let path = path.as_ref();
    let mut source = SourceConfig::new();
    source.file(path);
    let mut sequencer = RecordSequencer::new(XmlObjectSource::<T>::new(source), PassThrough::new());
    sequencer
        .start()
        .with_context(|| format!("open {}", path.display()))?;
    let records = sequencer
        .records()
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("read {}", path.display()))?;
    sequencer.stop();
    Ok(records)
}
