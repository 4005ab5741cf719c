use rowcast::testing::*;
use rowcast::{
    CsvReader, Error, HeaderSpec, Row, RowErrorPolicy, Value, read_csv_objects, read_csv_records,
};
use serde::Deserialize;

#[derive(Deserialize, Debug, PartialEq)]
struct Order {
    id: u32,
    amount: f64,
}

fn drain(reader: CsvReader, named: bool) -> anyhow::Result<Vec<Row>> {
    let mut sequencer = if named {
        reader.into_map()?
    } else {
        reader.into_list()?
    };
    Ok(sequencer
        .drain(RowErrorPolicy::FailFast, None)?
        .into_iter()
        .map(|r| r.value)
        .collect())
}

fn strings(fields: &[&str]) -> Row {
    Row::Positional(fields.iter().map(|f| Value::from(*f)).collect())
}

#[test]
fn quoted_fields_and_escapes() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "1,\"a, b\",\"say \\\"hi\\\"\"\n")?;
    let rows = drain(CsvReader::new().file(fixture.path()), false)?;
    assert_eq!(rows, vec![strings(&["1", "a, b", "say \"hi\""])]);
    Ok(())
}

#[test]
fn escape_equal_to_quote_means_doubled_quotes() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "\"a \"\"quoted\"\" word\"\n")?;
    let reader = CsvReader::new().file(fixture.path()).escape_char('"');
    assert_eq!(drain(reader, false)?, vec![strings(&["a \"quoted\" word"])]);
    Ok(())
}

#[test]
fn custom_quote_character() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "'x,y',z\n")?;
    let reader = CsvReader::new().file(fixture.path()).quote_char('\'');
    assert_eq!(drain(reader, false)?, vec![strings(&["x,y", "z"])]);
    Ok(())
}

#[test]
fn single_character_line_separator() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "1,2|3,4|")?;
    let reader = CsvReader::new().file(fixture.path()).line_separator("|")?;
    assert_eq!(
        drain(reader, false)?,
        vec![strings(&["1", "2"]), strings(&["3", "4"])]
    );
    Ok(())
}

#[test]
fn crlf_line_endings() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "1,2\r\n3,4\r\n")?;
    let reader = CsvReader::new().file(fixture.path()).line_separator("\r\n")?;
    assert_eq!(drain(reader, false)?.len(), 2);
    Ok(())
}

#[test]
fn multi_character_separator_is_unsupported() -> anyhow::Result<()> {
    let reader = CsvReader::new().file("x.csv").line_separator("||")?;
    assert!(matches!(reader.into_list(), Err(Error::Specification(_))));
    Ok(())
}

#[test]
fn comments_are_skipped_when_allowed() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "# generated\n1,2\n# trailing\n")?;
    let allowed = CsvReader::new().file(fixture.path()).allow_comments(true);
    assert_eq!(drain(allowed, false)?, vec![strings(&["1", "2"])]);

    let strict = CsvReader::new().file(fixture.path());
    assert_eq!(drain(strict, false)?.len(), 3);
    Ok(())
}

#[test]
fn rows_may_have_different_lengths() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "1\n1,2,3\n\n1,2\n")?;
    let rows = drain(CsvReader::new().file(fixture.path()), false)?;
    let lengths: Vec<usize> = rows.iter().map(Row::len).collect();
    assert_eq!(lengths, vec![1, 3, 2]);
    Ok(())
}

#[test]
fn named_rows_without_header_line_use_declared_names() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "1,2,3\n")?;
    let reader = CsvReader::new().file(fixture.path()).header(|h| {
        h.column("a")?.integer();
        h.column("b")?;
        Ok(())
    })?;
    assert_eq!(
        drain(reader, true)?,
        vec![Row::Named(vec![
            ("a".to_owned(), Value::Integer(1)),
            ("b".to_owned(), Value::from("2")),
            ("field-2".to_owned(), Value::from("3")),
        ])]
    );
    Ok(())
}

#[test]
fn array_columns_split_by_name() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "id,tags\n1, x ; y \n2,\n")?;
    let reader = CsvReader::new().file(fixture.path()).header(|h| {
        h.with_header();
        h.column("tags")?.nullable_string(true).array(";");
        Ok(())
    })?;
    let rows = drain(reader, true)?;
    assert_eq!(
        rows[0].get_named("tags"),
        Some(&Value::Array(vec![Value::from("x"), Value::from("y")]))
    );
    assert_eq!(rows[1].get_named("tags"), Some(&Value::Array(vec![])));
    Ok(())
}

#[test]
fn header_only_file_has_no_rows() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "id,amount\n")?;
    let reader = CsvReader::new().file(fixture.path()).header(|h| {
        h.with_header();
        Ok(())
    })?;
    assert!(drain(reader, true)?.is_empty());

    let empty = write_fixture("csv", "")?;
    let reader = CsvReader::new().file(empty.path()).header(|h| {
        h.skip_first_data_row().with_header();
        Ok(())
    })?;
    assert!(drain(reader, false)?.is_empty());
    Ok(())
}

#[test]
fn object_records_use_header_names() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "amount,id\n2.5,1\n4,2\n")?;
    let mut sequencer = CsvReader::new()
        .file(fixture.path())
        .header(|h| {
            h.with_header();
            Ok(())
        })?
        .into_object::<Order>()?;
    let records = sequencer.drain(RowErrorPolicy::FailFast, None)?;
    assert_eq!(records[1].value, Order { id: 2, amount: 4.0 });
    Ok(())
}

#[test]
fn object_records_fall_back_to_declared_names() -> anyhow::Result<()> {
    let fixture = write_fixture("csv", "7,1.5\nbad,1\n8,2\n")?;
    let mut sequencer = CsvReader::new()
        .file(fixture.path())
        .header(|h| {
            h.column("id")?;
            h.column("amount")?;
            Ok(())
        })?
        .into_object::<Order>()?;

    let mut collector = rowcast::ErrorCollector::new();
    let records = sequencer.drain(RowErrorPolicy::LogAndContinue, Some(&mut collector))?;
    assert_ordinals(&records, &[0, 2]);
    assert_eq!(records[0].value, Order { id: 7, amount: 1.5 });
    assert_eq!(collector.ordinals(), vec![1]);
    Ok(())
}

#[test]
fn eager_helpers() -> anyhow::Result<()> {
    let plain = write_fixture("csv", "1,2.5\n2,\n")?;
    let mut header = HeaderSpec::new();
    header.column_at(1, "amount")?.nullable_double();
    let records = read_csv_records(plain.path(), header)?;
    assert_ordinals(&records, &[0, 1]);
    assert_eq!(records[0].value.get(1), Some(&Value::Double(2.5)));
    assert_eq!(records[1].value.get(1), Some(&Value::Null));

    let with_header = write_fixture("csv", "id,amount\n1,2.5\n")?;
    let orders = read_csv_objects::<Order>(with_header.path())?;
    assert_eq!(orders[0].value, Order { id: 1, amount: 2.5 });
    Ok(())
}

#[test]
fn eager_helper_reports_the_failing_file() {
    let err = read_csv_objects::<Order>("/definitely/missing.csv").unwrap_err();
    assert!(format!("{err:#}").contains("missing.csv"));
}
