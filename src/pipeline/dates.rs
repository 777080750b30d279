//! Order-date normalization.
//!
//! Dates are read day-first (`DD/MM/YYYY`), locale independent. Rows whose
//! date cannot be parsed are excluded from the working set and reported back
//! as `DroppedRow`s; they are never repaired.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{RawRecord, Record};

/// A row excluded because its order date did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    pub line: usize,
    pub value: String,
    pub reason: String,
}

/// Cleaned records plus the rows that were dropped on the way.
#[derive(Debug, Clone)]
pub struct DateNormalization {
    pub records: Vec<Record>,
    pub dropped: Vec<DroppedRow>,
}

impl DateNormalization {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

pub fn normalize_dates(raw: Vec<RawRecord>) -> DateNormalization {
    let mut records = Vec::with_capacity(raw.len());
    let mut dropped = Vec::new();

    for row in raw {
        match parse_order_date(&row.order_date) {
            Ok(date) => records.push(Record::from_raw(row, date)),
            Err(reason) => dropped.push(DroppedRow {
                line: row.line,
                value: row.order_date,
                reason,
            }),
        }
    }

    DateNormalization { records, dropped }
}

/// Earliest and latest order date, used as the default range.
pub fn date_bounds(records: &[Record]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|r| r.order_date).min()?;
    let max = records.iter().map(|r| r.order_date).max()?;
    Some((min, max))
}

/// Day-first formats with a four-digit year, tried in order.
const DAY_FIRST_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Day-first formats with a two-digit year.
const SHORT_YEAR_FORMATS: [&str; 3] = ["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// Parse a day-first date.
///
/// Accepted shapes (separator `/`, `-` or `.`):
/// - `DD/MM/YYYY` and `D/M/YYYY`
/// - `DD/MM/YY` (00-68 → 2000s, 69-99 → 1900s)
/// - `YYYY-MM-DD`
///
/// Anything after the date (`" 00:00:00"`, `"T12:00"`) is ignored.
pub fn parse_order_date(s: &str) -> Result<NaiveDate, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("empty date".to_string());
    }
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    let four_digit = DAY_FIRST_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .find(|d| (1000..=9999).contains(&d.year()));
    if let Some(date) = four_digit {
        return Ok(date);
    }

    SHORT_YEAR_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .and_then(|d| d.with_year(expand_short_year(d.year().rem_euclid(100))))
        .ok_or_else(|| format!("unrecognized date '{trimmed}' (expected DD/MM/YYYY)"))
}

fn expand_short_year(yy: i32) -> i32 {
    if yy < 69 { 2000 + yy } else { 1900 + yy }
}
