//! `sales-lens` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that:
//!
//! - the filter/aggregate pipeline is testable without spawning processes
//! - the CLI and the TUI share one `compute_views` implementation

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod report;
pub mod tui;
