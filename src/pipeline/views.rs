//! The full filter → aggregate pipeline for one interaction.
//!
//! Front-ends call `compute_views` on every change of the date range or a
//! selection. Nothing is cached between calls: the same inputs always produce
//! the same `Views`.

use serde::Serialize;

use crate::domain::{AggregateRow, Amount, DateRange, Dimension, FilterState, Measure, Record, TimeBucket};
use crate::pipeline::aggregate::{aggregate, grand_total};
use crate::pipeline::cascade::{CascadeOptions, apply_selection, cascade_options};
use crate::pipeline::dates::date_bounds;
use crate::pipeline::hierarchy::{HierarchyNode, hierarchy};
use crate::pipeline::pivot::{PivotTable, pivot_by_month};
use crate::pipeline::range::filter_by_range;
use crate::pipeline::timeseries::bucket_by_month;

/// One point of the sales-vs-profit scatter (sized by quantity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub sales: Amount,
    pub profit: Amount,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub records: usize,
    pub sales: Amount,
    pub profit: Amount,
    pub quantity: u64,
}

/// Every derived summary for one `FilterState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Views {
    pub filter: FilterState,
    pub options: CascadeOptions,
    /// Records inside the date range, before categorical selections.
    pub in_range: usize,
    /// The filtered working set (exported separately, not serialized).
    #[serde(skip)]
    pub records: Vec<Record>,
    pub by_category: Vec<AggregateRow>,
    pub by_region: Vec<AggregateRow>,
    pub by_segment: Vec<AggregateRow>,
    pub time_series: Vec<TimeBucket>,
    pub pivot: PivotTable,
    pub hierarchy: Vec<HierarchyNode>,
    pub scatter: Vec<ScatterPoint>,
    pub totals: Totals,
}

pub fn compute_views(records: &[Record], filter: &FilterState) -> Views {
    let in_range = filter_by_range(records, &filter.range);
    let options = cascade_options(&in_range, filter);
    let filtered = apply_selection(&in_range, filter);

    tracing::debug!(
        start = %filter.range.start(),
        end = %filter.range.end(),
        in_range = in_range.len(),
        filtered = filtered.len(),
        "computed views"
    );

    Views {
        filter: filter.clone(),
        options,
        in_range: in_range.len(),
        by_category: aggregate(&filtered, Dimension::Category, Measure::Sales),
        by_region: aggregate(&filtered, Dimension::Region, Measure::Sales),
        by_segment: aggregate(&filtered, Dimension::Segment, Measure::Sales),
        time_series: bucket_by_month(&filtered),
        pivot: pivot_by_month(&filtered),
        hierarchy: hierarchy(&filtered),
        scatter: filtered
            .iter()
            .map(|r| ScatterPoint {
                sales: r.sales,
                profit: r.profit,
                quantity: r.quantity,
            })
            .collect(),
        totals: Totals {
            records: filtered.len(),
            sales: grand_total(&filtered, Measure::Sales),
            profit: grand_total(&filtered, Measure::Profit),
            quantity: filtered.iter().map(|r| u64::from(r.quantity)).sum(),
        },
        records: filtered,
    }
}

/// Default filter: the full date span of `records` with no selections.
pub fn default_filter(records: &[Record]) -> Option<FilterState> {
    let (start, end) = date_bounds(records)?;
    DateRange::new(start, end).ok().map(FilterState::new)
}
