use rowcast::io::compression::{CompressionCodec, auto_detect_reader, register_codec};
use rowcast::testing::*;
use rowcast::{CsvReader, RowErrorPolicy, Value};
use std::io::{Cursor, Read};
use std::sync::Arc;

const CSV: &str = "id,amount\n1,2.5\n2,4\n";

fn amounts(path: &std::path::Path) -> anyhow::Result<Vec<Value>> {
    let mut sequencer = CsvReader::new()
        .file(path)
        .header(|h| {
            h.with_header();
            h.column("amount")?.double();
            Ok(())
        })?
        .into_map()?;
    Ok(sequencer
        .drain(RowErrorPolicy::FailFast, None)?
        .into_iter()
        .filter_map(|r| r.value.get_named("amount").cloned())
        .collect())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn gzip_by_extension() -> anyhow::Result<()> {
    let fixture = write_gzip_fixture("csv.gz", CSV)?;
    assert_eq!(amounts(fixture.path())?, vec![Value::Double(2.5), Value::Double(4.0)]);
    Ok(())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn gzip_by_magic_bytes() -> anyhow::Result<()> {
    let fixture = write_gzip_fixture("dat", CSV)?;
    assert_eq!(amounts(fixture.path())?.len(), 2);
    Ok(())
}

#[cfg(feature = "compression-zstd")]
#[test]
fn zstd_by_extension() -> anyhow::Result<()> {
    let compressed = zstd::encode_all(Cursor::new(CSV), 0)?;
    let fixture = write_fixture("csv.zst", compressed)?;
    assert_eq!(amounts(fixture.path())?.len(), 2);
    Ok(())
}

#[cfg(feature = "compression-bzip2")]
#[test]
fn bzip2_by_extension() -> anyhow::Result<()> {
    use std::io::Write;

    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(CSV.as_bytes())?;
    let fixture = write_fixture("csv.bz2", encoder.finish()?)?;
    assert_eq!(amounts(fixture.path())?.len(), 2);
    Ok(())
}

#[cfg(feature = "compression-xz")]
#[test]
fn xz_by_magic_bytes() -> anyhow::Result<()> {
    use std::io::Write;

    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(CSV.as_bytes())?;
    let fixture = write_fixture("bin", encoder.finish()?)?;
    assert_eq!(amounts(fixture.path())?.len(), 2);
    Ok(())
}

#[test]
fn uncompressed_files_are_read_as_is() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", CSV)?;
    assert_eq!(amounts(fixture.path())?.len(), 2);
    Ok(())
}

/// Reverses every byte; recognized by the `.rev` extension.
struct ReverseCodec;

impl CompressionCodec for ReverseCodec {
    fn name(&self) -> &str {
        "reverse"
    }

    fn extensions(&self) -> &[&str] {
        &[".rev"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        None
    }

    fn wrap_reader(&self, mut reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        bytes.reverse();
        Ok(Box::new(Cursor::new(bytes)))
    }
}

#[test]
fn registered_codecs_are_used() -> anyhow::Result<()> {
    register_codec(Arc::new(ReverseCodec));
    let mut out = String::new();
    auto_detect_reader(Cursor::new(b"cba".to_vec()), "data.rev")?.read_to_string(&mut out)?;
    assert_eq!(out, "abc");
    Ok(())
}
