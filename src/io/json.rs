//! JSON record source for caller-defined types.
//!
//! - A document whose top-level value is an array yields one record per element.
//!   Elements are cut out of the stream one at a time, so that a malformed or
//!   mistyped element only fails its own record.
//! - Any other document is read as a stream of whitespace-separated JSON values,
//!   which covers JSON Lines.

use crate::error::{Error, Result};
use crate::processor::PassThrough;
use crate::sequencer::{RecordEnvelope, RecordSequencer, RowSource};
use crate::source::SourceConfig;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};
use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

pub struct JsonObjectSource<T> {
    source: SourceConfig,
    _t: PhantomData<fn() -> T>,
}

impl<T> JsonObjectSource<T> {
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            _t: PhantomData,
        }
    }
}

/// Skips leading whitespace and reports whether the document starts with `[`.
fn starts_with_array<R: BufRead>(reader: &mut R) -> std::io::Result<bool> {
    loop {
        let buf = reader.fill_buf()?;
        let Some(first) = buf.iter().position(|b| !b.is_ascii_whitespace()) else {
            if buf.is_empty() {
                return Ok(false);
            }
            let len = buf.len();
            reader.consume(len);
            continue;
        };
        let is_array = buf[first] == b'[';
        reader.consume(first);
        return Ok(is_array);
    }
}

impl<T: DeserializeOwned> RowSource for JsonObjectSource<T> {
    type Row = T;
    type Rows = JsonObjects<T>;

    fn open(&mut self) -> Result<JsonObjects<T>> {
        let mut reader = BufReader::new(self.source.open()?);
        let is_array = starts_with_array(&mut reader)
            .map_err(|e| Error::resource(self.source.describe(), e))?;
        if is_array {
            Ok(JsonObjects::Array(ArrayElements::new(reader), PhantomData))
        } else {
            Ok(JsonObjects::Stream(
                Deserializer::from_reader(reader).into_iter(),
            ))
        }
    }

    fn describe(&self) -> String {
        format!("json {}", self.source.describe())
    }
}

/// Splits a top-level JSON array into the raw bytes of its elements, lazily.
///
/// Only the nesting of brackets and strings is tracked; the bytes of each
/// element are validated when they are deserialized. A broken separator or an
/// unterminated element ends the array.
pub struct ArrayElements<R> {
    reader: R,
    opened: bool,
    done: bool,
}

impl<R: BufRead> ArrayElements<R> {
    /// `reader` must be positioned on the opening `[`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            opened: false,
            done: false,
        }
    }

    fn peek(&mut self) -> std::io::Result<Option<u8>> {
        Ok(self.reader.fill_buf()?.first().copied())
    }

    fn skip_whitespace(&mut self) -> std::io::Result<Option<u8>> {
        while let Some(b) = self.peek()? {
            if !b.is_ascii_whitespace() {
                return Ok(Some(b));
            }
            self.reader.consume(1);
        }
        Ok(None)
    }

    /// Consumes the byte before the next element. `None` at the closing `]`.
    fn separator(&mut self) -> anyhow::Result<Option<()>> {
        let expected = if self.opened { b',' } else { b'[' };
        let first = !self.opened;
        self.opened = true;
        match self.skip_whitespace()? {
            Some(b']') if !first => {
                self.reader.consume(1);
                return Ok(None);
            }
            Some(b) if b == expected => self.reader.consume(1),
            Some(b) => anyhow::bail!(
                "expected '{}' in JSON array, found '{}'",
                expected as char,
                b as char
            ),
            None => anyhow::bail!("unterminated JSON array"),
        }
        if first && self.skip_whitespace()? == Some(b']') {
            self.reader.consume(1);
            return Ok(None);
        }
        Ok(Some(()))
    }

    fn element(&mut self) -> anyhow::Result<Vec<u8>> {
        self.skip_whitespace()?;
        let mut bytes = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        loop {
            let Some(b) = self.peek()? else {
                if depth == 0 && !in_string && !bytes.is_empty() {
                    return Ok(bytes);
                }
                anyhow::bail!("unterminated JSON array element");
            };
            if in_string {
                bytes.push(b);
                self.reader.consume(1);
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                    if depth == 0 {
                        return Ok(bytes);
                    }
                }
                continue;
            }
            match b {
                b',' | b']' if depth == 0 => {
                    if bytes.is_empty() {
                        anyhow::bail!("expected a value in JSON array, found '{}'", b as char);
                    }
                    return Ok(bytes);
                }
                b if depth == 0 && b.is_ascii_whitespace() => return Ok(bytes),
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => depth = depth.saturating_sub(1),
                _ => {}
            }
            bytes.push(b);
            self.reader.consume(1);
            if depth == 0 && matches!(b, b'}' | b']') {
                return Ok(bytes);
            }
        }
    }
}

impl<R: BufRead> Iterator for ArrayElements<R> {
    type Item = anyhow::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let element = self.separator().and_then(|more| match more {
            Some(()) => self.element().map(Some),
            None => Ok(None),
        });
        match element {
            Ok(Some(bytes)) => Some(Ok(bytes)),
            Ok(None) => {
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

pub enum JsonObjects<T> {
    Array(ArrayElements<BufReader<Box<dyn Read>>>, PhantomData<fn() -> T>),
    Stream(StreamDeserializer<'static, IoRead<BufReader<Box<dyn Read>>>, T>),
}

impl<T: DeserializeOwned> Iterator for JsonObjects<T> {
    type Item = anyhow::Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Array(elements, _) => elements.next().map(|element| {
                serde_json::from_slice(&element?).context("deserialize JSON array element")
            }),
            Self::Stream(values) => values
                .next()
                .map(|value| value.context("parse JSON value")),
        }
    }
}

/// Read a whole JSON document into typed records.
///
/// **Compression**: gzip, zstd, bzip2 and xz files are decompressed
/// transparently (when the respective feature flags are enabled).
///
/// # Errors
/// Returns an error if the file cannot be opened or any element fails to
/// deserialize into `T`.
pub fn read_json_records<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> anyhow::Result<Vec<RecordEnvelope<T>>> {
    let path = path.as_ref();
    let mut source = SourceConfig::new();
    source.file(path);
    let mut sequencer = RecordSequencer::new(JsonObjectSource::<T>::new(source), PassThrough::new());
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
