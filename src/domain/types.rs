//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - filtered and aggregated in-memory
//! - exported to CSV/JSON
//! - rendered by the report and TUI front-ends

use std::collections::BTreeSet;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::Amount;
use crate::error::SalesError;

/// Categorical column a record can be grouped or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Region,
    State,
    City,
    Category,
    SubCategory,
    Segment,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Region,
        Dimension::State,
        Dimension::City,
        Dimension::Category,
        Dimension::SubCategory,
        Dimension::Segment,
    ];

    /// Column header used in the input schema and in exports.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Region => "Region",
            Dimension::State => "State",
            Dimension::City => "City",
            Dimension::Category => "Category",
            Dimension::SubCategory => "Sub-Category",
            Dimension::Segment => "Segment",
        }
    }

    pub fn value(self, record: &Record) -> &str {
        match self {
            Dimension::Region => &record.region,
            Dimension::State => &record.state,
            Dimension::City => &record.city,
            Dimension::Category => &record.category,
            Dimension::SubCategory => &record.sub_category,
            Dimension::Segment => &record.segment,
        }
    }
}

/// Numeric column that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Sales,
    Profit,
    Quantity,
}

impl Measure {
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::Sales => "Sales",
            Measure::Profit => "Profit",
            Measure::Quantity => "Quantity",
        }
    }

    pub fn value(self, record: &Record) -> Amount {
        match self {
            Measure::Sales => record.sales,
            Measure::Profit => record.profit,
            Measure::Quantity => Amount::from_units(i64::from(record.quantity)),
        }
    }
}

/// A row as read from the source, before date normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line in the source file (header is line 1).
    pub line: usize,
    /// Index into `RecordTable::rows`.
    pub source_row: usize,
    pub order_date: String,
    pub region: String,
    pub state: String,
    pub city: String,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    pub sales: Amount,
    pub profit: Amount,
    pub quantity: u32,
}

/// One normalized sales transaction line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub order_date: NaiveDate,
    pub region: String,
    pub state: String,
    pub city: String,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    pub sales: Amount,
    pub profit: Amount,
    pub quantity: u32,
    /// Index of the original row, used by the full-dataset export.
    #[serde(skip)]
    pub source_row: usize,
}

impl Record {
    pub fn from_raw(raw: RawRecord, order_date: NaiveDate) -> Self {
        Record {
            order_date,
            region: raw.region,
            state: raw.state,
            city: raw.city,
            category: raw.category,
            sub_category: raw.sub_category,
            segment: raw.segment,
            sales: raw.sales,
            profit: raw.profit,
            quantity: raw.quantity,
            source_row: raw.source_row,
        }
    }
}

/// Inclusive date interval. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SalesError> {
        if start > end {
            return Err(SalesError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Active date range and categorical selections for one interaction.
///
/// An empty selection set means "all values".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub range: DateRange,
    pub regions: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
}

impl FilterState {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            regions: BTreeSet::new(),
            states: BTreeSet::new(),
            cities: BTreeSet::new(),
        }
    }

    pub fn with_regions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_states<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cities<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities = values.into_iter().map(Into::into).collect();
        self
    }

    /// Selection set for one of the cascade levels (`None` for other dimensions).
    pub fn selection(&self, dimension: Dimension) -> Option<&BTreeSet<String>> {
        match dimension {
            Dimension::Region => Some(&self.regions),
            Dimension::State => Some(&self.states),
            Dimension::City => Some(&self.cities),
            _ => None,
        }
    }

    pub fn selection_mut(&mut self, dimension: Dimension) -> Option<&mut BTreeSet<String>> {
        match dimension {
            Dimension::Region => Some(&mut self.regions),
            Dimension::State => Some(&mut self.states),
            Dimension::City => Some(&mut self.cities),
            _ => None,
        }
    }

    pub fn has_selections(&self) -> bool {
        !(self.regions.is_empty() && self.states.is_empty() && self.cities.is_empty())
    }
}

/// A `(dimension value, summed measure)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: String,
    pub value: Amount,
}

/// Summed sales for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub year: i32,
    pub month: u32,
    /// `"YYYY : Mon"`, e.g. `2023 : May`.
    pub label: String,
    pub sales: Amount,
}
