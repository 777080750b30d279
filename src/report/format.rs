//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized

use std::path::Path;

use crate::domain::{AggregateRow, Amount, FilterState, TimeBucket};
use crate::io::ingest::RecordTable;
use crate::pipeline::Views;
use crate::pipeline::cascade::CascadeOptions;
use crate::pipeline::hierarchy::HierarchyNode;
use crate::pipeline::pivot::PivotTable;
use crate::report::{preview, share_percent};

/// Source + data-quality header.
pub fn format_load_summary(path: &Path, table: &RecordTable) -> String {
    let mut out = String::new();
    out.push_str("=== sales - Sales Dashboard ===\n");
    out.push_str(&format!("Source: {}\n", path.display()));
    out.push_str(&format!(
        "Rows: read={} | used={} | bad dates={} | other errors={}\n",
        table.rows_read,
        table.rows_used(),
        table.dropped_date_count(),
        table.row_errors.len(),
    ));

    for dropped in table.dropped_dates.iter().take(5) {
        out.push_str(&format!(
            "  (line {}) dropped date '{}': {}\n",
            dropped.line, dropped.value, dropped.reason
        ));
    }
    if table.dropped_dates.len() > 5 {
        out.push_str(&format!("  ... {} more\n", table.dropped_dates.len() - 5));
    }
    for err in table.row_errors.iter().take(5) {
        out.push_str(&format!("  (line {}) {}\n", err.line, err.message));
    }
    if table.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more\n", table.row_errors.len() - 5));
    }

    out
}

pub fn format_filter(filter: &FilterState) -> String {
    format!(
        "Range: {} .. {} | regions: {} | states: {} | cities: {}\n",
        filter.range.start(),
        filter.range.end(),
        fmt_selection(filter.regions.iter()),
        fmt_selection(filter.states.iter()),
        fmt_selection(filter.cities.iter()),
    )
}

/// Everything `sales summary` prints.
pub fn format_views(views: &Views, preview_rows: usize) -> String {
    let mut out = String::new();

    out.push_str(&format_filter(&views.filter));
    out.push_str(&format!(
        "Records: {} of {} in range | sales={} | profit={} | quantity={}\n\n",
        views.totals.records, views.in_range, views.totals.sales, views.totals.profit, views.totals.quantity
    ));

    out.push_str("Category wise sales:\n");
    out.push_str(&format_aggregate_table("Category", &views.by_category, views.totals.sales));
    out.push('\n');

    out.push_str("Region wise sales:\n");
    out.push_str(&format_aggregate_table("Region", &views.by_region, views.totals.sales));
    out.push('\n');

    out.push_str("Segment wise sales:\n");
    out.push_str(&format_aggregate_table("Segment", &views.by_segment, views.totals.sales));
    out.push('\n');

    out.push_str("Time series:\n");
    out.push_str(&format_time_series(&views.time_series));
    out.push('\n');

    out.push_str("Hierarchy (Region / Category / Sub-Category):\n");
    out.push_str(&format_hierarchy(&views.hierarchy));
    out.push('\n');

    out.push_str("Month wise Sub-Category sales:\n");
    out.push_str(&format_pivot(&views.pivot));

    if preview_rows > 0 {
        out.push('\n');
        out.push_str(&format!("First {preview_rows} rows:\n"));
        out.push_str(&format_preview(views, preview_rows));
    }

    out
}

pub fn format_aggregate_table(key_header: &str, rows: &[AggregateRow], total: Amount) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:<24} {:>16} {:>8}", key_header, "Sales", "Share"));
    push_line(&mut out, format!("{:-<24} {:-<16} {:-<8}", "", "", ""));
    for row in rows {
        push_line(
            &mut out,
            format!(
                "{:<24} {:>16} {:>7.2}%",
                truncate(&row.key, 24),
                row.value.to_string(),
                share_percent(row.value, total)
            ),
        );
    }
    if rows.is_empty() {
        out.push_str("(no data)\n");
    }
    out
}

pub fn format_time_series(buckets: &[TimeBucket]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:<12} {:>16}", "month_year", "Sales"));
    push_line(&mut out, format!("{:-<12} {:-<16}", "", ""));
    for b in buckets {
        push_line(&mut out, format!("{:<12} {:>16}", b.label, b.sales.to_string()));
    }
    if buckets.is_empty() {
        out.push_str("(no data)\n");
    }
    out
}

pub fn format_hierarchy(roots: &[HierarchyNode]) -> String {
    let mut out = String::new();
    for root in roots {
        write_node(&mut out, root, 0);
    }
    if roots.is_empty() {
        out.push_str("(no data)\n");
    }
    out
}

fn write_node(out: &mut String, node: &HierarchyNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let width = 24usize.saturating_sub(indent.len());
    push_line(
        out,
        format!("{indent}{:<width$} {:>16}", truncate(&node.name, width), node.total.to_string()),
    );
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}

pub fn format_pivot(pivot: &PivotTable) -> String {
    if pivot.is_empty() {
        return "(no data)\n".to_string();
    }

    let mut out = String::new();
    let mut header = format!("{:<16}", "Sub-Category");
    for col in &pivot.columns {
        header.push_str(&format!(" {:>12}", truncate(col, 12)));
    }
    push_line(&mut out, header);

    for (name, cells) in pivot.rows.iter().zip(&pivot.cells) {
        let mut line = format!("{:<16}", truncate(name, 16));
        for cell in cells {
            let text = cell.map(|v| format!("{:.2}", v.to_f64())).unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {text:>12}"));
        }
        push_line(&mut out, line);
    }
    out
}

pub fn format_preview(views: &Views, limit: usize) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<10} {:<8} {:<14} {:<14} {:<16} {:>12} {:>12} {:>4}",
            "date", "region", "state", "city", "category", "sales", "profit", "qty"
        ),
    );
    for row in preview(&views.records, limit) {
        push_line(
            &mut out,
            format!(
                "{:<10} {:<8} {:<14} {:<14} {:<16} {:>12} {:>12} {:>4}",
                row.order_date,
                truncate(&row.region, 8),
                truncate(&row.state, 14),
                truncate(&row.city, 14),
                truncate(&row.category, 16),
                row.sales.to_string(),
                row.profit.to_string(),
                row.quantity
            ),
        );
    }
    out
}

/// Option lists for each cascade level, marking selected values with `*`.
pub fn format_options(options: &CascadeOptions, filter: &FilterState) -> String {
    let mut out = String::new();
    for (label, values, selected) in [
        ("Region", &options.regions, &filter.regions),
        ("State", &options.states, &filter.states),
        ("City", &options.cities, &filter.cities),
    ] {
        out.push_str(&format!("{label} ({}):\n", values.len()));
        for v in values {
            let mark = if selected.contains(v) { "*" } else { " " };
            out.push_str(&format!("{mark} {v}\n"));
        }
    }
    out
}

fn fmt_selection<'a>(values: impl Iterator<Item = &'a String>) -> String {
    let parts: Vec<&str> = values.map(String::as_str).collect();
    if parts.is_empty() {
        "all".to_string()
    } else {
        parts.join(", ")
    }
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
