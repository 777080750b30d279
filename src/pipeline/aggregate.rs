//! Group-by-sum over a single categorical dimension.

use std::collections::BTreeMap;

use crate::domain::{AggregateRow, Amount, Dimension, Measure, Record};

/// Sum `measure` per distinct `dimension` value.
///
/// Keys compare by exact string equality and come back in ascending ordinal
/// (byte) order. Empty input yields an empty vector.
pub fn aggregate(records: &[Record], dimension: Dimension, measure: Measure) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<&str, Amount> = BTreeMap::new();
    for r in records {
        *groups.entry(dimension.value(r)).or_default() += measure.value(r);
    }

    groups
        .into_iter()
        .map(|(key, value)| AggregateRow {
            key: key.to_string(),
            value,
        })
        .collect()
}

pub fn grand_total(records: &[Record], measure: Measure) -> Amount {
    records.iter().map(|r| measure.value(r)).sum()
}
