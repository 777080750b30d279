//! Reporting utilities: shares, previews, and formatted terminal output.

use crate::domain::{AggregateRow, Amount, Record};

pub mod format;

pub use format::*;

/// Display date format for previews (`DD/MM/YYYY`).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Share of `part` in `total` as a percentage (0 when the total is zero).
pub fn share_percent(part: Amount, total: Amount) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    part.to_f64() / total.to_f64() * 100.0
}

/// Rows sorted by descending value (ties keep key order), for "top N" listings.
pub fn ranked(rows: &[AggregateRow]) -> Vec<AggregateRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.value.cmp(&a.value));
    sorted
}

/// One line of the data preview table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub order_date: String,
    pub region: String,
    pub state: String,
    pub city: String,
    pub category: String,
    pub sales: Amount,
    pub profit: Amount,
    pub quantity: u32,
}

/// The first `limit` records, in working-set order.
pub fn preview(records: &[Record], limit: usize) -> Vec<PreviewRow> {
    records
        .iter()
        .take(limit)
        .map(|r| PreviewRow {
            order_date: r.order_date.format(DISPLAY_DATE_FORMAT).to_string(),
            region: r.region.clone(),
            state: r.state.clone(),
            city: r.city.clone(),
            category: r.category.clone(),
            sales: r.sales,
            profit: r.profit,
            quantity: r.quantity,
        })
        .collect()
}
