//! Region → State → City filtering.
//!
//! Two separate concerns live here:
//!
//! - **option narrowing** (`cascade_options`): which values a front-end should
//!   offer at each level given the upstream selections
//! - **final filtering** (`apply_selection`): the actual data restriction, an
//!   AND over every non-empty selection set
//!
//! `apply_selection` does not depend on which options were offered; any
//! combination of selections is accepted.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{Dimension, FilterState, Record};

/// Values offered at each cascade level, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeOptions {
    pub regions: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
}

impl CascadeOptions {
    pub fn for_dimension(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Region => &self.regions,
            Dimension::State => &self.states,
            Dimension::City => &self.cities,
            _ => &[],
        }
    }
}

pub fn cascade_options(records: &[Record], filter: &FilterState) -> CascadeOptions {
    let in_regions = || {
        records
            .iter()
            .filter(|r| selected(&filter.regions, &r.region))
    };

    CascadeOptions {
        regions: distinct(records.iter(), Dimension::Region),
        states: distinct(in_regions(), Dimension::State),
        cities: distinct(
            in_regions().filter(|r| selected(&filter.states, &r.state)),
            Dimension::City,
        ),
    }
}

/// `true` when the record passes every non-empty selection.
pub fn record_matches(record: &Record, filter: &FilterState) -> bool {
    selected(&filter.regions, &record.region)
        && selected(&filter.states, &record.state)
        && selected(&filter.cities, &record.city)
}

pub fn apply_selection(records: &[Record], filter: &FilterState) -> Vec<Record> {
    records
        .iter()
        .filter(|r| record_matches(r, filter))
        .cloned()
        .collect()
}

fn selected(selection: &BTreeSet<String>, value: &str) -> bool {
    selection.is_empty() || selection.contains(value)
}

fn distinct<'a>(records: impl Iterator<Item = &'a Record>, dimension: Dimension) -> Vec<String> {
    records
        .map(|r| dimension.value(r))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
