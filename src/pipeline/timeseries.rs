//! Monthly time series.
//!
//! Buckets are keyed by `(year, month)` and ordered on that key. The display
//! label (`"2023 : May"`) is never used for ordering: month abbreviations do not
//! sort chronologically.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Amount, Record, TimeBucket};

pub fn bucket_by_month(records: &[Record]) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<(i32, u32), Amount> = BTreeMap::new();
    for r in records {
        *buckets
            .entry((r.order_date.year(), r.order_date.month()))
            .or_default() += r.sales;
    }

    buckets
        .into_iter()
        .map(|((year, month), sales)| TimeBucket {
            year,
            month,
            label: month_label(year, month),
            sales,
        })
        .collect()
}

/// `"%Y : %b"`, e.g. `2024 : Jan`.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%Y : %b").to_string())
        .unwrap_or_else(|| format!("{year} : {month:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{record, scenario_records};

    #[test]
    fn scenario_buckets_in_order() {
        let south: Vec<_> = scenario_records()
            .into_iter()
            .filter(|r| r.region == "South")
            .collect();
        let buckets = bucket_by_month(&south);
        let pairs: Vec<_> = buckets.iter().map(|b| (b.label.as_str(), b.sales)).collect();
        assert_eq!(
            pairs,
            vec![("2023 : May", Amount::from_units(100)), ("2023 : Jun", Amount::from_units(200))]
        );
    }

    #[test]
    fn chronological_not_lexicographic() {
        let records = vec![
            record((2024, 1, 5), "r", "s", "c", "x", "x", "x", 5, 0, 1),
            record((2023, 12, 30), "r", "s", "c", "x", "x", "x", 7, 0, 1),
            record((2023, 2, 1), "r", "s", "c", "x", "x", "x", 1, 0, 1),
            record((2023, 1, 9), "r", "s", "c", "x", "x", "x", 1, 0, 1),
        ];
        let labels: Vec<_> = bucket_by_month(&records).into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["2023 : Jan", "2023 : Feb", "2023 : Dec", "2024 : Jan"]);

        let mut lexicographic = labels.clone();
        lexicographic.sort();
        assert_ne!(labels, lexicographic);
    }

    #[test]
    fn same_month_different_years_stay_separate() {
        let records = vec![
            record((2022, 3, 1), "r", "s", "c", "x", "x", "x", 1, 0, 1),
            record((2023, 3, 31), "r", "s", "c", "x", "x", "x", 2, 0, 1),
            record((2023, 3, 2), "r", "s", "c", "x", "x", "x", 3, 0, 1),
        ];
        let buckets = bucket_by_month(&records);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].sales, Amount::from_units(5));
        assert_eq!((buckets[1].year, buckets[1].month), (2023, 3));
    }

    #[test]
    fn empty_input() {
        assert!(bucket_by_month(&[]).is_empty());
    }
}
