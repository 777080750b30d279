//! Shared record fixtures for pipeline tests.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::domain::{Amount, Record};

#[allow(clippy::too_many_arguments)]
pub fn record(
    date: (i32, u32, u32),
    region: &str,
    state: &str,
    city: &str,
    category: &str,
    sub_category: &str,
    segment: &str,
    sales: i64,
    profit: i64,
    quantity: u32,
) -> Record {
    Record {
        order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        region: region.to_string(),
        state: state.to_string(),
        city: city.to_string(),
        category: category.to_string(),
        sub_category: sub_category.to_string(),
        segment: segment.to_string(),
        sales: Amount::from_units(sales),
        profit: Amount::from_units(profit),
        quantity,
        source_row: 0,
    }
}

/// The three-record South/West scenario.
pub fn scenario_records() -> Vec<Record> {
    let mut records = vec![
        record((2023, 5, 10), "South", "Texas", "Austin", "Furniture", "Chairs", "Consumer", 100, 10, 1),
        record((2023, 6, 15), "South", "Texas", "Dallas", "Furniture", "Tables", "Consumer", 200, 20, 2),
        record((2023, 6, 20), "West", "California", "LA", "Technology", "Phones", "Corporate", 300, 30, 1),
    ];
    for (idx, r) in records.iter_mut().enumerate() {
        r.source_row = idx;
    }
    records
}

const GEO: [(&str, &str, &str); 8] = [
    ("South", "Texas", "Austin"),
    ("South", "Texas", "Dallas"),
    ("South", "Florida", "Miami"),
    ("West", "California", "LA"),
    ("West", "California", "San Diego"),
    ("West", "Washington", "Seattle"),
    ("East", "New York", "New York City"),
    // Same city name in a different state.
    ("Central", "Texas", "Austin"),
];

const PRODUCTS: [(&str, &str); 5] = [
    ("Furniture", "Chairs"),
    ("Furniture", "Tables"),
    ("Technology", "Phones"),
    ("Office Supplies", "Paper"),
    ("Office Supplies", "Binders"),
];

const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];

/// Random records spread over 2022-01-01 .. ~2024-03 with fractional amounts.
pub fn random_records<R: Rng>(rng: &mut R, n: usize) -> Vec<Record> {
    let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    (0..n)
        .map(|idx| {
            let (region, state, city) = GEO[rng.gen_range(0..GEO.len())];
            let (category, sub_category) = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
            Record {
                order_date: base + Duration::days(rng.gen_range(0..820)),
                region: region.to_string(),
                state: state.to_string(),
                city: city.to_string(),
                category: category.to_string(),
                sub_category: sub_category.to_string(),
                segment: SEGMENTS[rng.gen_range(0..SEGMENTS.len())].to_string(),
                sales: Amount::from_raw(rng.gen_range(1..50_000_000)),
                profit: Amount::from_raw(rng.gen_range(-5_000_000..5_000_000)),
                quantity: rng.gen_range(1..15),
                source_row: idx,
            }
        })
        .collect()
}
