//! Shared "load and filter" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve source -> ingest + date normalization -> default range -> filter -> views
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::{Path, PathBuf};

use crate::cli::{FilterArgs, SourceArgs};
use crate::config::SourceConfig;
use crate::domain::{DateRange, FilterState};
use crate::error::{AppError, SalesError};
use crate::io::ingest::{RecordTable, load_records};
use crate::pipeline::dates::date_bounds;
use crate::pipeline::{Views, compute_views};

/// All computed outputs of a single CLI invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub path: PathBuf,
    pub table: RecordTable,
    pub filter: FilterState,
    pub views: Views,
}

/// Resolve the source (explicit or configured default) and load it.
pub fn load_table(source: &SourceArgs) -> Result<(PathBuf, RecordTable), AppError> {
    let path = SourceConfig::from_env().resolve(source.file.as_deref())?;
    let table = load_checked(&path)?;
    Ok((path, table))
}

/// Load a file and refuse one that yields no usable records.
pub fn load_checked(path: &Path) -> Result<RecordTable, AppError> {
    let table = load_records(path)?;
    if table.records.is_empty() {
        return Err(AppError::new(
            3,
            format!(
                "No usable records in '{}' ({} rows read, {} bad dates, {} other errors).",
                path.display(),
                table.rows_read,
                table.dropped_date_count(),
                table.row_errors.len()
            ),
        ));
    }
    Ok(table)
}

/// Build a `FilterState` from CLI flags; missing bounds default to the data's span.
pub fn build_filter(args: &FilterArgs, table: &RecordTable) -> Result<FilterState, SalesError> {
    let (min, max) = date_bounds(&table.records)
        .ok_or_else(|| SalesError::InvalidArgument("No dated records to filter.".to_string()))?;
    let range = DateRange::new(args.start.unwrap_or(min), args.end.unwrap_or(max))?;

    Ok(FilterState::new(range)
        .with_regions(args.regions.iter().cloned())
        .with_states(args.states.iter().cloned())
        .with_cities(args.cities.iter().cloned()))
}

/// Load, filter and compute every view.
pub fn run_query(source: &SourceArgs, filter_args: &FilterArgs) -> Result<RunOutput, AppError> {
    let (path, table) = load_table(source)?;
    let filter = build_filter(filter_args, &table)?;
    let views = compute_views(&table.records, &filter);

    Ok(RunOutput {
        path,
        table,
        filter,
        views,
    })
}
