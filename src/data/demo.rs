//! Synthetic superstore-style sample generation.
//!
//! `sales demo` writes a CSV in the input schema so the dashboard can be tried
//! without a real export. Output is fully determined by the seed.

use std::fs::File;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};
use serde::Serialize;

use crate::domain::Amount;
use crate::error::SalesError;

/// Settings for one generated file.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub rows: usize,
    pub seed: u64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One generated line, serialized with the superstore column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoRow {
    #[serde(rename = "Row ID")]
    pub row_id: usize,
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Order Date")]
    pub order_date: String,
    #[serde(rename = "Segment")]
    pub segment: &'static str,
    #[serde(rename = "Country")]
    pub country: &'static str,
    #[serde(rename = "City")]
    pub city: &'static str,
    #[serde(rename = "State")]
    pub state: &'static str,
    #[serde(rename = "Region")]
    pub region: &'static str,
    #[serde(rename = "Category")]
    pub category: &'static str,
    #[serde(rename = "Sub-Category")]
    pub sub_category: &'static str,
    #[serde(rename = "Sales")]
    pub sales: Amount,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Profit")]
    pub profit: Amount,
}

const GEOGRAPHY: [(&str, &str, &[&str]); 10] = [
    ("East", "New York", &["New York City", "Buffalo", "Rochester"]),
    ("East", "Pennsylvania", &["Philadelphia", "Pittsburgh"]),
    ("East", "Ohio", &["Columbus", "Cleveland"]),
    ("West", "California", &["Los Angeles", "San Francisco", "San Diego"]),
    ("West", "Washington", &["Seattle", "Spokane"]),
    ("Central", "Texas", &["Houston", "Dallas", "Austin"]),
    ("Central", "Illinois", &["Chicago", "Springfield"]),
    ("South", "Florida", &["Miami", "Jacksonville", "Tampa"]),
    ("South", "Georgia", &["Atlanta", "Columbus"]),
    ("South", "Virginia", &["Richmond", "Springfield"]),
];

/// `(category, sub-category, typical unit price)`.
const PRODUCTS: [(&str, &str, f64); 12] = [
    ("Furniture", "Chairs", 180.0),
    ("Furniture", "Tables", 320.0),
    ("Furniture", "Bookcases", 210.0),
    ("Furniture", "Furnishings", 35.0),
    ("Office Supplies", "Paper", 12.0),
    ("Office Supplies", "Binders", 18.0),
    ("Office Supplies", "Storage", 70.0),
    ("Office Supplies", "Art", 9.0),
    ("Technology", "Phones", 190.0),
    ("Technology", "Accessories", 60.0),
    ("Technology", "Machines", 450.0),
    ("Technology", "Copiers", 900.0),
];

const SEGMENTS: [(&str, f64); 3] = [("Consumer", 0.52), ("Corporate", 0.30), ("Home Office", 0.18)];

const DISCOUNTS: [f64; 5] = [0.0, 0.0, 0.1, 0.2, 0.4];

pub fn generate_demo_rows(config: &DemoConfig) -> Result<Vec<DemoRow>, SalesError> {
    if config.rows == 0 {
        return Err(SalesError::InvalidArgument("Row count must be > 0.".to_string()));
    }
    if config.start > config.end {
        return Err(SalesError::InvalidRange {
            start: config.start,
            end: config.end,
        });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let price_noise = LogNormal::new(0.0, 0.45)
        .map_err(|e| SalesError::InvalidArgument(format!("Price distribution error: {e}")))?;
    let margin = Normal::new(0.12, 0.18)
        .map_err(|e| SalesError::InvalidArgument(format!("Margin distribution error: {e}")))?;

    let span_days = (config.end - config.start).num_days();
    let mut rows = Vec::with_capacity(config.rows);

    for i in 0..config.rows {
        let date = config.start + Duration::days(rng.gen_range(0..=span_days));
        let (region, state, cities) = GEOGRAPHY[rng.gen_range(0..GEOGRAPHY.len())];
        let city = cities[rng.gen_range(0..cities.len())];
        let (category, sub_category, base_price) = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
        let segment = pick_segment(rng.gen_range(0.0..1.0));

        let quantity: u32 = rng.gen_range(1..=9);
        let discount = DISCOUNTS[rng.gen_range(0..DISCOUNTS.len())];
        let unit_price = base_price * price_noise.sample(&mut rng);
        let sales = unit_price * f64::from(quantity) * (1.0 - discount);
        // Deep discounts push margins negative.
        let profit = sales * (margin.sample(&mut rng) - discount * 0.6);

        rows.push(DemoRow {
            row_id: i + 1,
            order_id: format!("DM-{}-{:06}", date.format("%Y"), rng.gen_range(100_000..1_000_000)),
            order_date: date.format("%d/%m/%Y").to_string(),
            segment,
            country: "United States",
            city,
            state,
            region,
            category,
            sub_category,
            sales: round_cents(sales),
            quantity,
            discount,
            profit: round_cents(profit),
        });
    }

    Ok(rows)
}

/// Generate and write a demo CSV; returns the number of rows written.
pub fn write_demo_csv(path: &Path, config: &DemoConfig) -> Result<usize, SalesError> {
    let rows = generate_demo_rows(config)?;
    let file = File::create(path).map_err(|e| SalesError::io(path, e))?;
    let mut out = csv::Writer::from_writer(file);
    for row in &rows {
        out.serialize(row)?;
    }
    out.flush().map_err(|e| SalesError::io(path, e))?;

    tracing::info!(path = %path.display(), rows = rows.len(), seed = config.seed, "wrote demo data");
    Ok(rows.len())
}

fn pick_segment(u: f64) -> &'static str {
    let mut acc = 0.0;
    for (name, weight) in SEGMENTS {
        acc += weight;
        if u < acc {
            return name;
        }
    }
    SEGMENTS[SEGMENTS.len() - 1].0
}

fn round_cents(v: f64) -> Amount {
    // Whole cents, like a POS export.
    Amount::from_f64((v * 100.0).round() / 100.0).unwrap_or_default()
}
