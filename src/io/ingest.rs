//! CSV ingest and normalization.
//!
//! This module is responsible for turning an uploaded or default sales export
//! into a validated `RecordTable`.
//!
//! Design goals:
//! - **Strict schema** for required columns (fail fast with `UnknownColumn`,
//!   or `DuplicateColumn` when two headers name the same one)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows keep their source order)
//! - **Separation of concerns**: no filtering or aggregation here

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Amount, RawRecord, Record};
use crate::error::SalesError;
use crate::pipeline::dates::{DroppedRow, normalize_dates};

/// Required input columns, as displayed in errors and exports.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Order Date",
    "Region",
    "State",
    "City",
    "Category",
    "Sub-Category",
    "Segment",
    "Sales",
    "Profit",
    "Quantity",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Output of reading a source, before date normalization.
#[derive(Debug, Clone)]
pub struct IngestedRows {
    /// Original header names, in source order.
    pub headers: StringRecord,
    /// Original rows (all columns) that passed row validation.
    pub rows: Vec<StringRecord>,
    pub raw: Vec<RawRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// The validated working table: normalized records plus ingest diagnostics.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
    pub records: Vec<Record>,
    /// Rows excluded because their order date could not be parsed.
    pub dropped_dates: Vec<DroppedRow>,
    /// Rows excluded for any other reason (bad numbers, missing values).
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl RecordTable {
    pub fn from_ingested(ingested: IngestedRows) -> Self {
        let normalized = normalize_dates(ingested.raw);
        Self {
            headers: ingested.headers,
            rows: ingested.rows,
            records: normalized.records,
            dropped_dates: normalized.dropped,
            row_errors: ingested.row_errors,
            rows_read: ingested.rows_read,
        }
    }

    pub fn dropped_date_count(&self) -> usize {
        self.dropped_dates.len()
    }

    pub fn rows_used(&self) -> usize {
        self.records.len()
    }
}

/// Read and normalize a sales file from disk.
pub fn load_records(path: &Path) -> Result<RecordTable, SalesError> {
    let file = File::open(path).map_err(|e| SalesError::io(path, e))?;
    let ingested = read_rows(file)?;
    let table = RecordTable::from_ingested(ingested);

    tracing::info!(
        path = %path.display(),
        rows_read = table.rows_read,
        rows_used = table.rows_used(),
        dropped_dates = table.dropped_date_count(),
        row_errors = table.row_errors.len(),
        "loaded sales records"
    );
    if table.dropped_date_count() > 0 {
        tracing::warn!(
            count = table.dropped_date_count(),
            "excluded rows with unparsable order dates"
        );
    }

    Ok(table)
}

/// Read raw rows from any UTF-8 delimited source.
pub fn read_rows<R: Read>(source: R) -> Result<IngestedRows, SalesError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut raw = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &columns, line, rows.len()) {
            Ok(row) => {
                raw.push(row);
                rows.push(record);
            }
            Err(e) => {
                tracing::debug!(line, error = %e, "skipping row");
                row_errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(IngestedRows {
        headers,
        rows,
        raw,
        row_errors,
        rows_read,
    })
}

/// Column positions for the required schema.
struct ColumnMap {
    order_date: usize,
    region: usize,
    state: usize,
    city: usize,
    category: usize,
    sub_category: usize,
    segment: usize,
    sales: usize,
    profit: usize,
    quantity: usize,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, SalesError> {
        let mut header_map: HashMap<String, usize> = HashMap::new();
        let mut duplicates: HashSet<String> = HashSet::new();
        for (idx, name) in headers.iter().enumerate() {
            let key = normalize_header_name(name);
            if header_map.contains_key(&key) {
                tracing::warn!(header = name, column = idx + 1, "duplicate column header");
                duplicates.insert(key);
            } else {
                header_map.insert(key, idx);
            }
        }

        let find = |column: &str| {
            let key = normalize_header_name(column);
            if duplicates.contains(&key) {
                return Err(SalesError::DuplicateColumn {
                    column: column.to_string(),
                });
            }
            header_map
                .get(&key)
                .copied()
                .ok_or_else(|| SalesError::UnknownColumn {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            order_date: find("Order Date")?,
            region: find("Region")?,
            state: find("State")?,
            city: find("City")?,
            category: find("Category")?,
            sub_category: find("Sub-Category")?,
            segment: find("Segment")?,
            sales: find("Sales")?,
            profit: find("Profit")?,
            quantity: find("Quantity")?,
        })
    }
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. Spaces, dashes and underscores are also ignored so that
    // `Order Date`, `order_date` and `OrderDate` all resolve to the same column.
    name.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_row(
    record: &StringRecord,
    columns: &ColumnMap,
    line: usize,
    source_row: usize,
) -> Result<RawRecord, SalesError> {
    let sales = parse_amount(record, columns.sales, "Sales", line)?;
    let profit = parse_amount(record, columns.profit, "Profit", line)?;

    let quantity_text = get_required(record, columns.quantity, "Quantity", line)?;
    let quantity = parse_quantity(quantity_text).ok_or_else(|| SalesError::InvalidValue {
        line,
        column: "Quantity".to_string(),
        value: quantity_text.to_string(),
    })?;

    Ok(RawRecord {
        line,
        source_row,
        // Left unparsed; unusable dates are counted by the date normalizer.
        order_date: record.get(columns.order_date).unwrap_or_default().to_string(),
        region: get_required(record, columns.region, "Region", line)?.to_string(),
        state: get_required(record, columns.state, "State", line)?.to_string(),
        city: get_required(record, columns.city, "City", line)?.to_string(),
        category: get_required(record, columns.category, "Category", line)?.to_string(),
        sub_category: get_required(record, columns.sub_category, "Sub-Category", line)?.to_string(),
        segment: get_required(record, columns.segment, "Segment", line)?.to_string(),
        sales,
        profit,
        quantity,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<&'a str, SalesError> {
    record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SalesError::InvalidValue {
            line,
            column: column.to_string(),
            value: String::new(),
        })
}

fn parse_amount(record: &StringRecord, idx: usize, column: &str, line: usize) -> Result<Amount, SalesError> {
    let text = get_required(record, idx, column, line)?;
    Amount::parse(text).ok_or_else(|| SalesError::InvalidValue {
        line,
        column: column.to_string(),
        value: text.to_string(),
    })
}

fn parse_quantity(s: &str) -> Option<u32> {
    // Spreadsheet round-trips sometimes turn `3` into `3.0`.
    let s = s.strip_suffix(".0").unwrap_or(s);
    s.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Row ID,Order Date,Region,State,City,Category,Sub-Category,Segment,Sales,Profit,Quantity";

    #[test]
    fn resolves_headers_loosely() {
        let csv = "\u{feff}order_date,REGION,state,city,category,SubCategory,segment,sales,profit,quantity\n\
                   10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,100,10,1\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.raw.len(), 1);
        assert_eq!(rows.raw[0].sub_category, "Chairs");
        assert_eq!(rows.raw[0].sales, Amount::from_units(100));
    }

    #[test]
    fn missing_column_fails_fast() {
        let csv = "Order Date,Region,State,City,Category,Segment,Sales,Profit,Quantity\n";
        let err = read_rows(csv.as_bytes()).unwrap_err();
        match err {
            SalesError::UnknownColumn { column } => assert_eq!(column, "Sub-Category"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ambiguous_required_header_is_rejected() {
        let csv = "Order Date,OrderDate,Region,State,City,Category,Sub-Category,Segment,Sales,Profit,Quantity\n";
        match read_rows(csv.as_bytes()).unwrap_err() {
            SalesError::DuplicateColumn { column } => assert_eq!(column, "Order Date"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_extra_header_is_tolerated() {
        let csv = format!(
            "{HEADER},Note,note\n\
             1,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,100,10,1,a,b\n"
        );
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.raw.len(), 1);
    }

    #[test]
    fn amounts_beyond_input_bound_become_row_errors() {
        let csv = format!(
            "{HEADER}\n\
             1,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,500000000000000,10,1\n\
             2,11/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,500000000000000,10,1\n\
             3,12/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,9223372036854775807,10,1\n"
        );
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.raw.len(), 2);
        assert_eq!(rows.row_errors.len(), 1);
        assert_eq!(rows.row_errors[0].line, 4);
    }

    #[test]
    fn bad_numbers_become_row_errors() {
        let csv = format!(
            "{HEADER}\n\
             1,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,abc,10,1\n\
             2,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,5,10,-1\n\
             3,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,5,10,2.0\n"
        );
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.rows_read, 3);
        assert_eq!(rows.raw.len(), 1);
        assert_eq!(rows.raw[0].quantity, 2);
        assert_eq!(rows.raw[0].line, 4);
        assert_eq!(rows.raw[0].source_row, 0);
        assert_eq!(rows.row_errors.iter().map(|e| e.line).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn unparsable_dates_are_counted_not_errors() {
        let csv = format!(
            "{HEADER}\n\
             1,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,100,10,1\n\
             2,not a date,South,Texas,Dallas,Furniture,Tables,Consumer,200,20,2\n\
             3,,West,California,LA,Technology,Phones,Corporate,300,30,1\n"
        );
        let table = RecordTable::from_ingested(read_rows(csv.as_bytes()).unwrap());
        assert!(table.row_errors.is_empty());
        assert_eq!(table.rows_used(), 1);
        assert_eq!(table.dropped_date_count(), 2);
        assert_eq!(table.dropped_dates[0].line, 3);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn keeps_original_rows_for_export() {
        let csv = format!(
            "{HEADER}\n\
             7,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,100,10,1\n"
        );
        let table = RecordTable::from_ingested(read_rows(csv.as_bytes()).unwrap());
        let record = &table.records[0];
        assert_eq!(table.rows[record.source_row].get(0), Some("7"));
        assert_eq!(table.headers.len(), 11);
    }
}
