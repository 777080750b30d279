//! Inclusive date-range restriction.

use crate::domain::{DateRange, Record};

/// Keep exactly the records with `start <= order_date <= end`.
///
/// `DateRange` cannot be built with `start > end`, so callers surface
/// `InvalidRange` before reaching this point.
pub fn filter_by_range(records: &[Record], range: &DateRange) -> Vec<Record> {
    records
        .iter()
        .filter(|r| range.contains(r.order_date))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{random_records, scenario_records};
    use chrono::{Duration, NaiveDate};
    use rand::prelude::*;
    use rand::rngs::StdRng;

    #[test]
    fn keeps_both_endpoints() {
        let records = scenario_records();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 5, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
        )
        .unwrap();
        let out = filter_by_range(&records, &range);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].city, "Austin");
        assert_eq!(out[1].city, "Dallas");
    }

    #[test]
    fn included_rows_in_range_and_excluded_rows_outside() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = random_records(&mut rng, 400);
        let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();

        for _ in 0..50 {
            let a = base + Duration::days(rng.gen_range(0..800));
            let b = a + Duration::days(rng.gen_range(0..200));
            let range = DateRange::new(a, b).unwrap();

            let kept = filter_by_range(&records, &range);
            assert!(kept.iter().all(|r| a <= r.order_date && r.order_date <= b));

            let excluded: Vec<_> = records.iter().filter(|r| !kept.contains(r)).collect();
            assert!(excluded.iter().all(|r| r.order_date < a || r.order_date > b));
            assert_eq!(kept.len() + excluded.len(), records.len());
        }
    }
}
