//! The filter-and-aggregate core.
//!
//! Every function here is pure: it takes records by reference and returns a
//! new derived table. Order of stages:
//! dates -> range -> cascade -> {aggregate, timeseries, pivot, hierarchy}
//!
//! `views::compute_views` runs the whole chain for one `FilterState`.

pub mod aggregate;
pub mod cascade;
pub mod dates;
pub mod hierarchy;
pub mod pivot;
pub mod range;
pub mod timeseries;
pub mod views;

#[cfg(test)]
pub(crate) mod fixtures;

pub use views::{ScatterPoint, Totals, Views, compute_views, default_filter};
