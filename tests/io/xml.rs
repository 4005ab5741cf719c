use rowcast::testing::*;
use rowcast::{Error, RowErrorPolicy, XmlReader, read_xml_records};
use serde::Deserialize;

#[derive(Deserialize, Debug, PartialEq)]
struct Order {
    id: u32,
    sku: String,
}

const ORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- nightly export -->
<orders>
  <order><id>1</id><sku>A-1</sku></order>
  <order>
    <id>2</id>
    <sku>B-2</sku>
  </order>
</orders>
"#;

#[test]
fn children_of_the_root_are_records() -> anyhow::Result<()> {
    let fixture = write_fixture("xml", ORDERS)?;
    let mut sequencer = XmlReader::new().file(fixture.path()).into_object::<Order>()?;
    let records = sequencer.drain(RowErrorPolicy::FailFast, None)?;
    assert_ordinals(&records, &[0, 1]);
    assert_eq!(records[1].value, Order { id: 2, sku: "B-2".into() });
    Ok(())
}

#[test]
fn bad_element_fails_only_its_record() -> anyhow::Result<()> {
    let fixture = write_fixture(
        "xml",
        "<orders><order><id>x</id><sku>A</sku></order><order><id>2</id><sku>B</sku></order></orders>",
    )?;
    let mut sequencer = XmlReader::new().file(fixture.path()).into_object::<Order>()?;
    let records = sequencer.drain(RowErrorPolicy::SkipInvalid, None)?;
    assert_ordinals(&records, &[1]);
    Ok(())
}

#[test]
fn eager_helper() -> anyhow::Result<()> {
    let fixture = write_fixture("xml", ORDERS)?;
    let records = read_xml_records::<Order>(fixture.path())?;
    assert_eq!(records[0].value, Order { id: 1, sku: "A-1".into() });
    Ok(())
}

#[test]
fn unbalanced_document_is_a_resource_error() -> anyhow::Result<()> {
    let fixture = write_fixture("xml", "<orders><order><id>1</id></orders>")?;
    let mut sequencer = XmlReader::new().file(fixture.path()).into_object::<Order>()?;
    assert!(matches!(sequencer.start(), Err(Error::Resource { .. })));
    Ok(())
}
