use rowcast::{ColumnType, ScalarKind, Value};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::str::FromStr;

#[test]
fn nullable_kinds_map_empty_and_absent_input_to_null() {
    for kind in ScalarKind::ALL {
        let column_type = ColumnType::nullable(kind);
        assert_eq!(column_type.cast(Some("")).unwrap(), Value::Null, "{kind}");
        assert_eq!(column_type.cast(None).unwrap(), Value::Null, "{kind}");
    }
}

#[test]
fn required_kinds_reject_empty_input() {
    for kind in ScalarKind::ALL {
        let column_type = ColumnType::required(kind);
        assert!(column_type.cast(Some("")).is_err(), "{kind}");
        assert!(column_type.cast(None).is_err(), "{kind}");
    }
}

#[test]
fn empty_messages_name_the_kind() {
    let err = ColumnType::required(ScalarKind::String)
        .cast(Some(""))
        .unwrap_err();
    assert_eq!(err.message(), "The value cannot be empty");

    let err = ColumnType::required(ScalarKind::Long).cast(None).unwrap_err();
    assert_eq!(
        err.message(),
        "The value cannot be converted to a non-null long"
    );
}

#[test]
fn parses_every_kind() {
    let cases = [
        (ScalarKind::String, " x ", Value::String(" x ".into())),
        (ScalarKind::Integer, "-42", Value::Integer(-42)),
        (ScalarKind::Long, "9000000000", Value::Long(9_000_000_000)),
        (ScalarKind::Float, "1.5", Value::Float(1.5)),
        (ScalarKind::Double, "345.43", Value::Double(345.43)),
        (
            ScalarKind::BigInteger,
            "170141183460469231731687303715884105727",
            Value::BigInteger(BigInt::from(i128::MAX)),
        ),
        (
            ScalarKind::BigDecimal,
            "12.340",
            Value::BigDecimal(BigDecimal::from_str("12.340").unwrap()),
        ),
        (ScalarKind::Boolean, "true", Value::Boolean(true)),
    ];
    for (kind, raw, expected) in cases {
        assert_eq!(ColumnType::required(kind).cast(Some(raw)).unwrap(), expected);
    }
}

#[test]
fn big_decimal_accepts_scientific_notation() {
    let value = ColumnType::required(ScalarKind::BigDecimal)
        .cast(Some("1e3"))
        .unwrap();
    assert_eq!(value, Value::BigDecimal(BigDecimal::from_str("1000").unwrap()));
}

#[test]
fn big_integers_are_not_bounded() {
    let raw = "-1234567890123456789012345678901234567890";
    let value = ColumnType::required(ScalarKind::BigInteger)
        .cast(Some(raw))
        .unwrap();
    assert_eq!(value, Value::BigInteger(BigInt::from_str(raw).unwrap()));
    assert_eq!(value.to_string(), raw);

    assert!(ColumnType::required(ScalarKind::BigInteger)
        .cast(Some("1.5"))
        .is_err());
    assert!(ColumnType::required(ScalarKind::BigInteger)
        .cast(Some("1_000"))
        .is_err());
}

#[test]
fn big_decimals_keep_every_digit() {
    let raw = "0.12345678901234567890123456789012345";
    let Value::BigDecimal(decimal) = ColumnType::required(ScalarKind::BigDecimal)
        .cast(Some(raw))
        .unwrap()
    else {
        panic!("expected a big decimal");
    };
    let (digits, scale) = decimal.as_bigint_and_exponent();
    assert_eq!(digits, BigInt::from_str("12345678901234567890123456789012345").unwrap());
    assert_eq!(scale, 35);

    let integral = "98765432109876543210987654321098765.5";
    let value = ColumnType::required(ScalarKind::BigDecimal)
        .cast(Some(integral))
        .unwrap();
    assert_eq!(value, Value::BigDecimal(BigDecimal::from_str(integral).unwrap()));
    assert_ne!(
        value,
        Value::BigDecimal(BigDecimal::from_str("98765432109876543210987654321098765").unwrap())
    );
}

#[test]
fn unparseable_text_is_an_error_even_when_nullable() {
    let err = ColumnType::nullable(ScalarKind::Integer)
        .cast(Some("12a"))
        .unwrap_err();
    assert!(err.message().contains("'12a'"));
    assert!(err.message().contains("integer"));

    assert!(ColumnType::required(ScalarKind::Integer)
        .cast(Some("3000000000"))
        .is_err());
    assert!(ColumnType::required(ScalarKind::Double)
        .cast(Some("1,5"))
        .is_err());
}

#[test]
fn numbers_are_not_trimmed_by_the_cast_itself() {
    assert!(ColumnType::required(ScalarKind::Integer)
        .cast(Some(" 1 "))
        .is_err());
}

#[test]
fn boolean_parsing_is_literal_and_case_sensitive() {
    let required = ColumnType::required(ScalarKind::Boolean);
    assert_eq!(required.cast(Some("true")).unwrap(), Value::Boolean(true));
    assert_eq!(required.cast(Some("TRUE")).unwrap(), Value::Boolean(false));
    assert_eq!(required.cast(Some("yes")).unwrap(), Value::Boolean(false));
    assert_eq!(required.cast(Some("false")).unwrap(), Value::Boolean(false));
    assert!(required.cast(Some("   ")).is_err());

    let nullable = ColumnType::nullable(ScalarKind::Boolean);
    assert_eq!(nullable.cast(Some("   ")).unwrap(), Value::Null);
    assert_eq!(nullable.cast(Some("1")).unwrap(), Value::Boolean(false));
}

#[test]
fn default_type_is_a_nullable_string() {
    let column_type = ColumnType::default();
    assert_eq!(column_type, ColumnType::nullable(ScalarKind::String));
    assert_eq!(column_type.to_string(), "nullable string");
    assert_eq!(ColumnType::required(ScalarKind::BigInteger).to_string(), "big integer");
}
