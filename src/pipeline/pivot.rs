//! Sub-Category × month pivot of summed sales.
//!
//! Columns are calendar month names regardless of year: March 2022 and March
//! 2023 land in the same `March` column. Only months that occur in the data
//! become columns, in calendar order. A cell with no matching records is
//! `None`, which is distinct from a zero sum.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::domain::{Amount, Record};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PivotTable {
    /// Sub-categories, ascending.
    pub rows: Vec<String>,
    /// Month names, calendar order.
    pub columns: Vec<String>,
    /// `cells[row][column]`.
    pub cells: Vec<Vec<Option<Amount>>>,
}

impl PivotTable {
    pub fn get(&self, row: &str, column: &str) -> Option<Amount> {
        let r = self.rows.iter().position(|k| k == row)?;
        let c = self.columns.iter().position(|k| k == column)?;
        self.cells.get(r)?.get(c).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn pivot_by_month(records: &[Record]) -> PivotTable {
    let mut by_row: BTreeMap<&str, [Option<Amount>; 12]> = BTreeMap::new();
    let mut seen = [false; 12];

    for r in records {
        let m = r.order_date.month0() as usize;
        seen[m] = true;
        let cell = &mut by_row.entry(r.sub_category.as_str()).or_insert([None; 12])[m];
        *cell = Some(cell.unwrap_or_default() + r.sales);
    }

    let months: Vec<usize> = (0..12).filter(|&m| seen[m]).collect();

    let mut table = PivotTable {
        columns: months.iter().map(|&m| MONTH_NAMES[m].to_string()).collect(),
        ..PivotTable::default()
    };
    for (key, values) in by_row {
        table.rows.push(key.to_string());
        table.cells.push(months.iter().map(|&m| values[m]).collect());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{record, scenario_records};

    #[test]
    fn scenario_pivot() {
        let table = pivot_by_month(&scenario_records());
        assert_eq!(table.rows, vec!["Chairs", "Phones", "Tables"]);
        assert_eq!(table.columns, vec!["May", "June"]);
        assert_eq!(table.get("Chairs", "May"), Some(Amount::from_units(100)));
        assert_eq!(table.get("Chairs", "June"), None);
        assert_eq!(table.get("Phones", "June"), Some(Amount::from_units(300)));
        assert_eq!(table.get("Nope", "June"), None);
    }

    #[test]
    fn ragged_hand_built_table_is_safe() {
        let table = PivotTable {
            rows: vec!["Chairs".into(), "Paper".into()],
            columns: vec!["May".into(), "June".into()],
            cells: vec![vec![Some(Amount::from_units(1))]],
        };
        assert_eq!(table.get("Chairs", "May"), Some(Amount::from_units(1)));
        assert_eq!(table.get("Chairs", "June"), None);
        assert_eq!(table.get("Paper", "May"), None);
    }

    #[test]
    fn merges_same_month_across_years() {
        let records = vec![
            record((2022, 3, 1), "r", "s", "c", "x", "Paper", "x", 10, 0, 1),
            record((2023, 3, 15), "r", "s", "c", "x", "Paper", "x", 5, 0, 1),
            record((2023, 1, 15), "r", "s", "c", "x", "Paper", "x", 1, 0, 1),
        ];
        let table = pivot_by_month(&records);
        assert_eq!(table.columns, vec!["January", "March"]);
        assert_eq!(table.get("Paper", "March"), Some(Amount::from_units(15)));
    }

    #[test]
    fn zero_sales_is_not_missing() {
        let records = vec![
            record((2023, 2, 1), "r", "s", "c", "x", "Paper", "x", 4, 0, 1),
            record((2023, 2, 2), "r", "s", "c", "x", "Paper", "x", -4, 0, 1),
            record((2023, 5, 2), "r", "s", "c", "x", "Binders", "x", 1, 0, 1),
        ];
        let table = pivot_by_month(&records);
        assert_eq!(table.get("Paper", "February"), Some(Amount::ZERO));
        assert_eq!(table.get("Paper", "May"), None);
        assert_eq!(table.get("Binders", "February"), None);
    }

    #[test]
    fn empty_input() {
        let table = pivot_by_month(&[]);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }
}
