//! Assertion functions for sequencer outputs.

use crate::error::{Error, FieldRef};
use crate::sequencer::RecordEnvelope;
use std::fmt::Debug;

/// Assert that records carry exactly the `expected` ordinals, in order.
///
/// # Panics
///
/// Panics if the ordinals differ.
///
/// # Example
///
/// ```
/// use rowcast::sequencer::RecordEnvelope;
/// use rowcast::testing::assert_ordinals;
///
/// let records = vec![RecordEnvelope::new(0, "a"), RecordEnvelope::new(2, "c")];
/// assert_ordinals(&records, &[0, 2]);
/// ```
pub fn assert_ordinals<T: Debug>(records: &[RecordEnvelope<T>], expected: &[u64]) {
    let actual: Vec<u64> = records.iter().map(|r| r.ordinal).collect();
    assert_eq!(
        actual, expected,
        "Ordinal mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}\n  Records: {records:?}"
    );
}

/// Assert that `result` failed with a row error at `ordinal` mentioning every
/// field in `fields`.
///
/// # Panics
///
/// Panics if the result is not a row error, has another ordinal, or misses
/// one of the fields.
pub fn assert_row_error<T: Debug>(result: &Result<T, Error>, ordinal: u64, fields: &[FieldRef]) {
    let Err(Error::Row(row)) = result else {
        panic!("Expected a row error at ordinal {ordinal}, got {result:?}");
    };
    assert_eq!(row.ordinal, ordinal, "Row error ordinal mismatch: {row}");
    for field in fields {
        assert!(row.mentions(field), "Row error does not mention {field}: {row}");
    }
}
