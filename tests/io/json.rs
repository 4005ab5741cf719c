use rowcast::testing::*;
use rowcast::{Error, JsonReader, RowErrorPolicy, read_json_records};
use serde::Deserialize;

#[derive(Deserialize, Debug, PartialEq)]
struct Event {
    id: u32,
    kind: String,
}

#[test]
fn top_level_array_yields_one_record_per_element() -> anyhow::Result<()> {
    let fixture = write_fixture(
        "json",
        r#"  [ {"id": 1, "kind": "open"}, {"id": 2, "kind": "close"} ]"#,
    )?;
    let mut sequencer = JsonReader::new().file(fixture.path()).into_object::<Event>()?;
    let records = sequencer.drain(RowErrorPolicy::FailFast, None)?;
    assert_ordinals(&records, &[0, 1]);
    assert_eq!(records[1].value, Event { id: 2, kind: "close".into() });
    Ok(())
}

#[test]
fn json_lines_are_read_as_a_stream() -> anyhow::Result<()> {
    let fixture = write_fixture(
        "jsonl",
        "{\"id\": 1, \"kind\": \"a\"}\n{\"id\": 2, \"kind\": \"b\"}\n\n{\"id\": 3, \"kind\": \"c\"}\n",
    )?;
    let records = read_json_records::<Event>(fixture.path())?;
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].value.kind, "c");
    Ok(())
}

#[test]
fn bad_array_element_fails_only_its_record() -> anyhow::Result<()> {
    let fixture = write_fixture(
        "json",
        r#"[{"id": 1, "kind": "a"}, {"id": "x"}, {"id": 3, "kind": "c"}]"#,
    )?;
    let mut sequencer = JsonReader::new().file(fixture.path()).into_object::<Event>()?;
    sequencer.start()?;
    assert_eq!(sequencer.next_record()?.ordinal, 0);
    assert!(matches!(
        sequencer.next_record(),
        Err(Error::Source { ordinal: 1, .. })
    ));
    assert_eq!(sequencer.next_record()?.value.id, 3);
    sequencer.stop();
    Ok(())
}

#[test]
fn malformed_array_element_fails_only_its_record() -> anyhow::Result<()> {
    let fixture = write_fixture(
        "json",
        r#"[{"id": 1, "kind": "a"}, {"id": 2 "kind": "b"}, {"id": 3, "kind": "c"}]"#,
    )?;
    let mut sequencer = JsonReader::new().file(fixture.path()).into_object::<Event>()?;
    sequencer.start()?;
    assert_eq!(sequencer.next_record()?.value.id, 1);
    assert!(matches!(
        sequencer.next_record(),
        Err(Error::Source { ordinal: 1, .. })
    ));
    let last = sequencer.next_record()?;
    assert_eq!((last.ordinal, last.value.id), (2, 3));
    assert!(!sequencer.has_next()?);
    sequencer.stop();
    Ok(())
}

#[test]
fn truncated_array_keeps_the_records_before_the_break() -> anyhow::Result<()> {
    let fixture = write_fixture("json", r#"[{"id": 1, "kind": "a"}, {"id": 2,"#)?;
    let mut sequencer = JsonReader::new().file(fixture.path()).into_object::<Event>()?;
    sequencer.start()?;
    assert_eq!(sequencer.next_record()?.ordinal, 0);
    assert!(matches!(
        sequencer.next_record(),
        Err(Error::Source { ordinal: 1, .. })
    ));
    assert!(!sequencer.has_next()?);
    sequencer.stop();
    Ok(())
}

#[test]
fn missing_source_is_reported_before_reading() {
    assert!(matches!(
        JsonReader::new().into_object::<Event>(),
        Err(Error::Resource { .. })
    ));
}

#[test]
fn empty_document_has_no_records() -> anyhow::Result<()> {
    let fixture = write_fixture("json", "  \n")?;
    assert!(read_json_records::<Event>(fixture.path())?.is_empty());
    Ok(())
}
