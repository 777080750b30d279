//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the filtering/aggregation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::pipeline::dates::parse_order_date;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Sales dashboard: filter, aggregate and export order data")]
pub struct Cli {
    /// More log output on stderr (`-v` info, `-vv` debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print totals, grouped sales, time series, hierarchy and pivot for a filter.
    Summary(QueryArgs),
    /// List the Region / State / City values offered under the current filter.
    Options(QueryArgs),
    /// Write every view to a directory as CSV files plus a JSON snapshot.
    Export(ExportArgs),
    /// Generate a synthetic sample dataset.
    Demo(DemoArgs),
    /// Launch the interactive TUI.
    ///
    /// Every change to the date range or a selection recomputes all views.
    Tui(SourceArgs),
}

/// Where the input CSV comes from.
#[derive(Debug, Parser, Clone, Default)]
pub struct SourceArgs {
    /// Input CSV. Falls back to SALES_DEFAULT_SOURCE (environment or `.env`).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,
}

/// Date range and cascade selections.
#[derive(Debug, Parser, Clone, Default)]
pub struct FilterArgs {
    /// Range start (inclusive, day-first: 01/03/2023 or 2023-03-01). Defaults to the earliest order.
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Range end (inclusive). Defaults to the latest order.
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Region to keep (repeatable).
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// State to keep (repeatable).
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<String>,

    /// City to keep (repeatable).
    #[arg(long = "city", value_name = "CITY")]
    pub cities: Vec<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Number of data rows to preview.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output directory (created if missing).
    #[arg(short = 'o', long = "out", value_name = "DIR", default_value = "export")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// Number of order lines to generate.
    #[arg(short = 'n', long, default_value_t = 2000)]
    pub rows: usize,

    /// Random seed (same seed, same file).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First order date.
    #[arg(long, value_parser = parse_date_arg, default_value = "01/01/2021")]
    pub start: NaiveDate,

    /// Last order date.
    #[arg(long, value_parser = parse_date_arg, default_value = "31/12/2023")]
    pub end: NaiveDate,

    /// Output CSV path.
    #[arg(short = 'o', long = "out", value_name = "CSV", default_value = "demo_sales.csv")]
    pub out: PathBuf,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_order_date(s)
}
