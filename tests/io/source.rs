use rowcast::testing::*;
use rowcast::{CsvReader, Error, Location, RowErrorPolicy, SourceConfig, Value};

fn first_field(reader: CsvReader) -> anyhow::Result<Value> {
    let mut sequencer = reader.into_list()?;
    let records = sequencer.drain(RowErrorPolicy::FailFast, None)?;
    Ok(records[0].value.get(0).cloned().unwrap_or(Value::Null))
}

#[test]
fn latin1_sources_are_decoded() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", b"caf\xe9,1\n".to_vec())?;
    let reader = CsvReader::new().file(fixture.path()).encoding("ISO-8859-1")?;
    assert_eq!(first_field(reader)?, Value::from("café"));
    Ok(())
}

#[test]
fn utf8_bom_is_stripped() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", b"\xef\xbb\xbfid,name\n".to_vec())?;
    assert_eq!(first_field(CsvReader::new().file(fixture.path()))?, Value::from("id"));
    Ok(())
}

#[test]
fn utf16_sources_are_decoded() -> anyhow::Result<()> {
    let bytes: Vec<u8> = "\u{feff}ü,2\n"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let fixture = write_fixture("csv", bytes)?;
    let reader = CsvReader::new().file(fixture.path()).encoding("utf-16le")?;
    assert_eq!(first_field(reader)?, Value::from("ü"));
    Ok(())
}

#[test]
fn unknown_encoding_is_rejected() {
    assert!(matches!(
        CsvReader::new().encoding("not-an-encoding"),
        Err(Error::Specification(_))
    ));
}

#[test]
fn resources_resolve_against_roots() -> anyhow::Result<()> {
    let root = TempDirPath::new()?;
    root.write("fixtures/people.csv", "ann,1\n")?;

    let reader = CsvReader::new()
        .resource("/fixtures/people.csv")
        .resource_root(root.path());
    assert_eq!(first_field(reader)?, Value::from("ann"));

    let mut missing = CsvReader::new()
        .resource("fixtures/nobody.csv")
        .resource_root(root.path())
        .into_list()?;
    assert!(matches!(missing.start(), Err(Error::Resource { .. })));
    Ok(())
}

#[test]
fn file_urls_are_supported() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "u,1\n")?;
    let url = format!("file://{}", fixture.path().display());
    assert_eq!(first_field(CsvReader::new().url(url))?, Value::from("u"));
    Ok(())
}

#[test]
fn remote_urls_fail_when_started() -> anyhow::Result<()> {
    let mut sequencer = CsvReader::new().url("https://example.com/a.csv").into_list()?;
    assert!(matches!(sequencer.start(), Err(Error::Resource { .. })));
    Ok(())
}

#[test]
fn missing_file_fails_when_started() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let mut sequencer = CsvReader::new().file(dir.path().join("nope.csv")).into_list()?;
    match sequencer.start() {
        Err(Error::Resource { location, .. }) => assert!(location.contains("nope.csv")),
        other => panic!("expected a resource error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn source_config_describes_its_location() {
    let mut source = SourceConfig::new();
    assert!(!source.has_location());
    assert_eq!(source.describe(), "<no source>");
    source.resource("a.csv");
    assert_eq!(source.location(), Some(&Location::Resource("a.csv".into())));
    assert_eq!(source.describe(), "resource a.csv");
}
