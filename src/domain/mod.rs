//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - fixed-point money (`Amount`)
//! - raw and normalized sales rows (`RawRecord`, `Record`)
//! - filter inputs (`DateRange`, `FilterState`) and grouping keys (`Dimension`, `Measure`)
//! - simple aggregate outputs (`AggregateRow`, `TimeBucket`)

pub mod amount;
pub mod types;

pub use amount::Amount;
pub use types::*;
