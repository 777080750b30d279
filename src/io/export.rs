//! Export aggregate views and the filtered dataset.
//!
//! The CSV artifacts are meant to be easy to consume in spreadsheets or
//! downstream scripts, and aggregate files can be read back with
//! `read_aggregate_csv` to reproduce the same sums.

use std::fs::{File, create_dir_all};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::domain::{AggregateRow, Amount, Record, TimeBucket};
use crate::error::SalesError;
use crate::io::ingest::RecordTable;
use crate::pipeline::Views;
use crate::pipeline::pivot::PivotTable;

pub const CATEGORY_FILE: &str = "Category.csv";
pub const REGION_FILE: &str = "Region.csv";
pub const SEGMENT_FILE: &str = "Segment.csv";
pub const TIME_SERIES_FILE: &str = "TimeSeries.csv";
pub const PIVOT_FILE: &str = "SubCategoryByMonth.csv";
pub const DATA_FILE: &str = "Data.csv";
pub const VIEWS_FILE: &str = "views.json";

/// Write `key_header,Sales` rows.
pub fn write_aggregate_csv<W: Write>(
    writer: W,
    key_header: &str,
    rows: &[AggregateRow],
) -> Result<(), SalesError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([key_header, "Sales"])?;
    for row in rows {
        out.write_record([row.key.as_str(), row.value.to_string().as_str()])?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Read an aggregate file back into `(header, rows)`.
pub fn read_aggregate_csv<R: Read>(reader: R) -> Result<(String, Vec<AggregateRow>), SalesError> {
    let mut input = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let key_header = input
        .headers()?
        .get(0)
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for (idx, result) in input.records().enumerate() {
        let record = result?;
        let line = idx + 2;
        let key = record.get(0).unwrap_or_default().to_string();
        let text = record.get(1).unwrap_or_default();
        let value = Amount::parse(text).ok_or_else(|| SalesError::InvalidValue {
            line,
            column: "Sales".to_string(),
            value: text.to_string(),
        })?;
        rows.push(AggregateRow { key, value });
    }
    Ok((key_header, rows))
}

/// Write `month_year,Sales` rows in chronological order.
pub fn write_time_series_csv<W: Write>(writer: W, buckets: &[TimeBucket]) -> Result<(), SalesError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["month_year", "Sales"])?;
    for b in buckets {
        out.write_record([b.label.as_str(), b.sales.to_string().as_str()])?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the Sub-Category × month matrix; missing cells are left empty.
pub fn write_pivot_csv<W: Write>(writer: W, pivot: &PivotTable) -> Result<(), SalesError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["Sub-Category".to_string()];
    header.extend(pivot.columns.iter().cloned());
    out.write_record(&header)?;

    for (name, cells) in pivot.rows.iter().zip(&pivot.cells) {
        let mut row = vec![name.clone()];
        row.extend(cells.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()));
        out.write_record(&row)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the original rows (all source columns) behind `records`, in their order.
pub fn write_records_csv<W: Write>(
    writer: W,
    table: &RecordTable,
    records: &[Record],
) -> Result<(), SalesError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.headers)?;
    for r in records {
        if let Some(row) = table.rows.get(r.source_row) {
            out.write_record(row)?;
        }
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_views_json<W: Write>(writer: W, views: &Views) -> Result<(), SalesError> {
    serde_json::to_writer_pretty(writer, views)?;
    Ok(())
}

/// Write every artifact into `dir` and return the paths written.
pub fn export_all(dir: &Path, table: &RecordTable, views: &Views) -> Result<Vec<PathBuf>, SalesError> {
    create_dir_all(dir).map_err(|e| SalesError::io(dir, e))?;

    let mut written = Vec::new();
    let mut emit = |name: &str, write: &dyn Fn(File) -> Result<(), SalesError>| {
        let path = dir.join(name);
        let file = File::create(&path).map_err(|e| SalesError::io(&path, e))?;
        write(file)?;
        tracing::info!(path = %path.display(), "wrote export");
        written.push(path);
        Ok::<(), SalesError>(())
    };

    emit(CATEGORY_FILE, &|f| write_aggregate_csv(f, "Category", &views.by_category))?;
    emit(REGION_FILE, &|f| write_aggregate_csv(f, "Region", &views.by_region))?;
    emit(SEGMENT_FILE, &|f| write_aggregate_csv(f, "Segment", &views.by_segment))?;
    emit(TIME_SERIES_FILE, &|f| write_time_series_csv(f, &views.time_series))?;
    emit(PIVOT_FILE, &|f| write_pivot_csv(f, &views.pivot))?;
    emit(DATA_FILE, &|f| write_records_csv(f, table, &views.records))?;
    emit(VIEWS_FILE, &|f| write_views_json(f, views))?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dimension, Measure};
    use crate::io::ingest::read_rows;
    use crate::pipeline::aggregate::aggregate;
    use crate::pipeline::fixtures::{random_records, scenario_records};
    use crate::pipeline::{compute_views, default_filter};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> Result<(), SalesError>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn category_export_round_trips() {
        let mut rng = StdRng::seed_from_u64(51);
        let records = random_records(&mut rng, 300);
        let rows = aggregate(&records, Dimension::Category, Measure::Sales);

        let text = to_string(|buf| write_aggregate_csv(buf, "Category", &rows));
        let (header, back) = read_aggregate_csv(text.as_bytes()).unwrap();
        assert_eq!(header, "Category");
        assert_eq!(back, rows);
    }

    #[test]
    fn aggregate_format() {
        let rows = aggregate(&scenario_records(), Dimension::Category, Measure::Sales);
        let text = to_string(|buf| write_aggregate_csv(buf, "Category", &rows));
        assert_eq!(text, "Category,Sales\nFurniture,300.00\nTechnology,300.00\n");
    }

    #[test]
    fn keys_with_commas_are_quoted() {
        let rows = vec![AggregateRow { key: "Bookcases, Tall".into(), value: Amount::from_units(1) }];
        let text = to_string(|buf| write_aggregate_csv(buf, "Sub-Category", &rows));
        assert!(text.contains("\"Bookcases, Tall\""));
        let (_, back) = read_aggregate_csv(text.as_bytes()).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn time_series_and_pivot_format() {
        let views = compute_views(&scenario_records(), &default_filter(&scenario_records()).unwrap());
        let ts = to_string(|buf| write_time_series_csv(buf, &views.time_series));
        assert_eq!(ts, "month_year,Sales\n2023 : May,100.00\n2023 : Jun,500.00\n");

        let pivot = to_string(|buf| write_pivot_csv(buf, &views.pivot));
        assert_eq!(
            pivot,
            "Sub-Category,May,June\nChairs,100.00,\nPhones,,300.00\nTables,,200.00\n"
        );
    }

    #[test]
    fn data_export_keeps_all_original_columns() {
        let csv = "Row ID,Order Date,Region,State,City,Category,Sub-Category,Segment,Sales,Profit,Quantity,Discount\n\
                   1,10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,100,10,1,0.2\n\
                   2,15/06/2023,West,California,LA,Technology,Phones,Corporate,300,30,1,0\n";
        let table = RecordTable::from_ingested(read_rows(csv.as_bytes()).unwrap());
        let filter = default_filter(&table.records).unwrap().with_regions(["West"]);
        let views = compute_views(&table.records, &filter);

        let text = to_string(|buf| write_records_csv(buf, &table, &views.records));
        assert_eq!(
            text,
            "Row ID,Order Date,Region,State,City,Category,Sub-Category,Segment,Sales,Profit,Quantity,Discount\n\
             2,15/06/2023,West,California,LA,Technology,Phones,Corporate,300,30,1,0\n"
        );
    }

    #[test]
    fn export_all_writes_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "Order Date,Region,State,City,Category,Sub-Category,Segment,Sales,Profit,Quantity\n\
                   10/05/2023,South,Texas,Austin,Furniture,Chairs,Consumer,100,10,1\n";
        let table = RecordTable::from_ingested(read_rows(csv.as_bytes()).unwrap());
        let views = compute_views(&table.records, &default_filter(&table.records).unwrap());

        let written = export_all(dir.path(), &table, &views).unwrap();
        assert_eq!(written.len(), 7);
        for path in &written {
            assert!(path.exists(), "{}", path.display());
        }

        let json = std::fs::read_to_string(dir.path().join(VIEWS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totals"]["sales"], "100.00");
        assert!(value.get("records").is_none());
    }
}
