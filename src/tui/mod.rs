//! Ratatui-based terminal UI.
//!
//! The left column holds the filters (date range, then Region / State / City
//! multi-selects fed by the cascade options). The right side shows the monthly
//! sales trend and one detail view. Every filter change recomputes all views
//! from the loaded records.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Months, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::cli::SourceArgs;
use crate::domain::{AggregateRow, DateRange, Dimension, FilterState};
use crate::error::AppError;
use crate::io::ingest::RecordTable;
use crate::pipeline::dates::{date_bounds, parse_order_date};
use crate::pipeline::{Views, compute_views, default_filter};
use crate::report::DISPLAY_DATE_FORMAT;

mod plotters_chart;

use plotters_chart::{SalesTrendChart, compact_amount};

/// Start the TUI.
pub fn run(source: SourceArgs) -> Result<(), AppError> {
    // Load before taking over the terminal so errors print normally.
    let (path, table) = crate::app::pipeline::load_table(&source)?;
    let mut app = App::new(path, table)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Dates,
    Region,
    State,
    City,
}

impl Panel {
    const ORDER: [Panel; 4] = [Panel::Dates, Panel::Region, Panel::State, Panel::City];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|p| *p == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn dimension(self) -> Option<Dimension> {
        match self {
            Panel::Dates => None,
            Panel::Region => Some(Dimension::Region),
            Panel::State => Some(Dimension::State),
            Panel::City => Some(Dimension::City),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateField {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detail {
    Aggregates,
    Hierarchy,
    Pivot,
    Preview,
}

impl Detail {
    fn next(self) -> Self {
        match self {
            Detail::Aggregates => Detail::Hierarchy,
            Detail::Hierarchy => Detail::Pivot,
            Detail::Pivot => Detail::Preview,
            Detail::Preview => Detail::Aggregates,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Detail::Aggregates => "Sales by Category / Region / Segment",
            Detail::Hierarchy => "Region / Category / Sub-Category",
            Detail::Pivot => "Sub-Category by month",
            Detail::Preview => "Data preview",
        }
    }
}

/// One entry of a cascade list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListEntry {
    value: String,
    selected: bool,
    /// `false` for a selection the current upstream choices no longer offer.
    offered: bool,
}

struct App {
    path: PathBuf,
    table: RecordTable,
    bounds: (NaiveDate, NaiveDate),
    filter: FilterState,
    views: Views,
    focus: Panel,
    date_field: DateField,
    cursors: [usize; 3],
    editing: Option<String>,
    detail: Detail,
    export_dir: PathBuf,
    status: String,
}

impl App {
    fn new(path: PathBuf, table: RecordTable) -> Result<Self, AppError> {
        let (bounds, filter) = date_bounds(&table.records)
            .zip(default_filter(&table.records))
            .ok_or_else(|| AppError::new(3, "No usable records to display."))?;
        let views = compute_views(&table.records, &filter);
        let status = format!("Loaded {} records.", table.rows_used());

        Ok(Self {
            path,
            table,
            bounds,
            filter,
            views,
            focus: Panel::Region,
            date_field: DateField::Start,
            cursors: [0; 3],
            editing: None,
            detail: Detail::Aggregates,
            export_dir: PathBuf::from("export"),
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press; returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Left => self.shift_date(false),
            KeyCode::Right => self.shift_date(true),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.focus == Panel::Dates {
                    self.editing = Some(self.current_date().format(DISPLAY_DATE_FORMAT).to_string());
                    self.status = "Editing date (DD/MM/YYYY). Enter to apply, Esc to cancel.".to_string();
                } else {
                    self.toggle_current();
                }
            }
            KeyCode::Char('c') => self.clear_focused(),
            KeyCode::Char('r') => {
                if let Some(filter) = default_filter(&self.table.records) {
                    self.filter = filter;
                    self.cursors = [0; 3];
                    self.recompute();
                    self.status = "Filters reset.".to_string();
                }
            }
            KeyCode::Char('v') => self.detail = self.detail.next(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        let Some(input) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let text = input.clone();
                self.editing = None;
                match parse_order_date(&text) {
                    Ok(date) => self.set_date(date),
                    Err(e) => self.status = format!("Invalid date '{}': {e}", text.trim()),
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || matches!(c, '/' | '-' | '.') {
                    input.push(c);
                }
            }
            _ => {}
        }
    }

    fn recompute(&mut self) {
        self.views = compute_views(&self.table.records, &self.filter);
        for panel in [Panel::Region, Panel::State, Panel::City] {
            let len = self.entries(panel).len();
            let cursor = &mut self.cursors[panel.index() - 1];
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    /// Offered values, followed by selections that are no longer offered.
    fn entries(&self, panel: Panel) -> Vec<ListEntry> {
        let Some(dimension) = panel.dimension() else {
            return Vec::new();
        };
        let offered = self.views.options.for_dimension(dimension);
        let selection = self.filter.selection(dimension);
        let is_selected = |v: &str| selection.is_some_and(|s| s.contains(v));

        let mut entries: Vec<ListEntry> = offered
            .iter()
            .map(|v| ListEntry {
                value: v.clone(),
                selected: is_selected(v),
                offered: true,
            })
            .collect();
        if let Some(selection) = selection {
            for value in selection.iter().filter(|v| !offered.contains(*v)) {
                entries.push(ListEntry {
                    value: value.clone(),
                    selected: true,
                    offered: false,
                });
            }
        }
        entries
    }

    fn move_cursor(&mut self, delta: i32) {
        if self.focus == Panel::Dates {
            self.date_field = if delta < 0 { DateField::Start } else { DateField::End };
            return;
        }
        let len = self.entries(self.focus).len();
        if len == 0 {
            return;
        }
        let cursor = &mut self.cursors[self.focus.index() - 1];
        *cursor = if delta < 0 {
            cursor.saturating_sub(1)
        } else {
            (*cursor + 1).min(len - 1)
        };
    }

    fn toggle_current(&mut self) {
        let Some(dimension) = self.focus.dimension() else {
            return;
        };
        let entries = self.entries(self.focus);
        let Some(entry) = entries.get(self.cursors[self.focus.index() - 1]) else {
            return;
        };
        let Some(selection) = self.filter.selection_mut(dimension) else {
            return;
        };
        if entry.selected {
            selection.remove(&entry.value);
        } else {
            selection.insert(entry.value.clone());
        }
        self.recompute();
        self.status = format!(
            "{} {}: {} records.",
            if entry.selected { "Removed" } else { "Added" },
            entry.value,
            self.views.totals.records
        );
    }

    fn clear_focused(&mut self) {
        match self.focus.dimension() {
            Some(dimension) => {
                if let Some(selection) = self.filter.selection_mut(dimension) {
                    selection.clear();
                }
            }
            None => match DateRange::new(self.bounds.0, self.bounds.1) {
                Ok(range) => self.filter.range = range,
                Err(e) => {
                    self.status = e.to_string();
                    return;
                }
            },
        }
        self.recompute();
        self.status = "Cleared.".to_string();
    }

    fn current_date(&self) -> NaiveDate {
        match self.date_field {
            DateField::Start => self.filter.range.start(),
            DateField::End => self.filter.range.end(),
        }
    }

    /// Move the focused bound by one month, clamped to the data's span.
    fn shift_date(&mut self, forward: bool) {
        if self.focus != Panel::Dates {
            return;
        }
        let current = self.current_date();
        let shifted = if forward {
            current.checked_add_months(Months::new(1))
        } else {
            current.checked_sub_months(Months::new(1))
        };
        let Some(date) = shifted else {
            return;
        };
        self.set_date(date.clamp(self.bounds.0, self.bounds.1));
    }

    fn set_date(&mut self, date: NaiveDate) {
        let (start, end) = match self.date_field {
            DateField::Start => (date, self.filter.range.end()),
            DateField::End => (self.filter.range.start(), date),
        };
        match DateRange::new(start, end) {
            Ok(range) => {
                self.filter.range = range;
                self.recompute();
                self.status = format!(
                    "Range {} .. {}: {} records.",
                    start.format(DISPLAY_DATE_FORMAT),
                    end.format(DISPLAY_DATE_FORMAT),
                    self.views.totals.records
                );
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn export(&mut self) {
        self.status = match crate::io::export::export_all(&self.export_dir, &self.table, &self.views) {
            Ok(written) => format!("Exported {} files to {}", written.len(), self.export_dir.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_filters(frame, body[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body[1]);
        self.draw_chart(frame, right[0]);
        self.draw_detail(frame, right[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let totals = &self.views.totals;
        let lines = vec![
            Line::from(vec![
                Span::styled("sales", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", self.path.display())),
            ]),
            Line::from(Span::styled(
                format!(
                    "records: {} of {} in range ({} loaded) | sales: {} | profit: {} | qty: {}",
                    totals.records,
                    self.views.in_range,
                    self.table.rows_used(),
                    totals.sales,
                    totals.profit,
                    totals.quantity
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        self.draw_dates(frame, chunks[0]);
        for (panel, rect) in [(Panel::Region, chunks[1]), (Panel::State, chunks[2]), (Panel::City, chunks[3])] {
            self.draw_list(frame, panel, rect);
        }
    }

    fn draw_dates(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Panel::Dates;
        let field = |label: &str, which: DateField, date: NaiveDate| {
            let active = focused && self.date_field == which;
            let text = match (&self.editing, active) {
                (Some(input), true) => format!("{input}_"),
                _ => date.format(DISPLAY_DATE_FORMAT).to_string(),
            };
            let style = if active {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            };
            Line::from(vec![Span::raw(format!("{label} ")), Span::styled(text, style)])
        };

        let lines = vec![
            field("Start:", DateField::Start, self.filter.range.start()),
            field("End:  ", DateField::End, self.filter.range.end()),
        ];
        let p = Paragraph::new(Text::from(lines)).block(panel_block("Dates", focused));
        frame.render_widget(p, area);
    }

    fn draw_list(&self, frame: &mut ratatui::Frame<'_>, panel: Panel, area: Rect) {
        let Some(dimension) = panel.dimension() else {
            return;
        };
        let entries = self.entries(panel);
        let selected = entries.iter().filter(|e| e.selected).count();
        let title = if selected == 0 {
            format!("{} (all)", dimension.column_name())
        } else {
            format!("{} ({selected} selected)", dimension.column_name())
        };

        let items: Vec<ListItem> = entries
            .iter()
            .map(|e| {
                let mark = if e.selected { "[x]" } else { "[ ]" };
                let style = if e.offered {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
                };
                ListItem::new(Line::from(Span::styled(format!("{mark} {}", e.value), style)))
            })
            .collect();

        let focused = self.focus == panel;
        let mut list = List::new(items).block(panel_block(&title, focused));
        if focused {
            list = list
                .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
                .highlight_symbol("» ");
        }

        let mut state = ListState::default();
        if focused && !entries.is_empty() {
            state.select(Some(self.cursors[panel.index() - 1]));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Monthly sales").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = TrendSeries::from_views(&self.views) else {
            let msg = Paragraph::new("No records for this filter.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let widget = SalesTrendChart {
            points: &series.points,
            labels: &series.labels,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            y_label: "sales",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("{} (v: next view)", self.detail.title());
        match self.detail {
            Detail::Aggregates => {
                let block = Block::default().title(title).borders(Borders::ALL);
                let inner = block.inner(area);
                frame.render_widget(block, area);

                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
                    .split(inner);
                for (label, rows, rect) in [
                    ("Category", &self.views.by_category, cols[0]),
                    ("Region", &self.views.by_region, cols[1]),
                    ("Segment", &self.views.by_segment, cols[2]),
                ] {
                    frame.render_widget(aggregate_bars(label, rows), rect);
                }
            }
            Detail::Hierarchy => {
                let text = crate::report::format_hierarchy(&self.views.hierarchy);
                frame.render_widget(text_panel(title, text), area);
            }
            Detail::Pivot => {
                let text = crate::report::format_pivot(&self.views.pivot);
                frame.render_widget(text_panel(title, text), area);
            }
            Detail::Preview => {
                let rows = usize::from(area.height.saturating_sub(3));
                let text = crate::report::format_preview(&self.views, rows);
                frame.render_widget(text_panel(title, text), area);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab panel  ↑/↓ move  Space toggle  ←/→ month  Enter edit date  c clear  r reset  v view  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(style)
}

fn text_panel(title: String, text: String) -> Paragraph<'static> {
    Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL))
}

/// Horizontal bars; negative totals are drawn as empty bars but keep their label value.
fn aggregate_bars<'a>(label: &'a str, rows: &'a [AggregateRow]) -> BarChart<'a> {
    let bars: Vec<Bar> = rows
        .iter()
        .map(|row| {
            Bar::default()
                .label(Line::from(row.key.as_str()))
                .value(row.value.to_f64().max(0.0).round() as u64)
                .text_value(compact_amount(row.value.to_f64()))
        })
        .collect();

    BarChart::default()
        .block(Block::default().title(label))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(Color::Cyan))
        .data(BarGroup::default().bars(&bars))
}

/// Chart-ready series for the monthly trend.
#[derive(Debug, Clone, PartialEq)]
struct TrendSeries {
    points: Vec<(f64, f64)>,
    labels: Vec<String>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl TrendSeries {
    fn from_views(views: &Views) -> Option<Self> {
        if views.time_series.is_empty() {
            return None;
        }
        let points: Vec<(f64, f64)> = views
            .time_series
            .iter()
            .enumerate()
            .map(|(i, b)| (i as f64, b.sales.to_f64()))
            .collect();
        let labels = views.time_series.iter().map(|b| b.label.clone()).collect();

        // A single bucket still needs a non-empty x span.
        let x_bounds = [-0.5, points.len() as f64 - 0.5];

        let (mut y_min, mut y_max) = points
            .iter()
            .fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        if !y_max.is_finite() || y_max <= y_min {
            y_max = y_min + 1.0;
        }
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-9);
        if y_min < 0.0 {
            y_min -= pad;
        }

        Some(Self {
            points,
            labels,
            x_bounds,
            y_bounds: [y_min, y_max + pad],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_rows;

    const CSV: &str = "\
Order Date,Region,State,City,Category,Sub-Category,Segment,Sales,Profit,Quantity
10/01/2023,South,Texas,Austin,Furniture,Chairs,Consumer,100,10,1
11/02/2023,South,Texas,Dallas,Furniture,Tables,Corporate,200,-5,2
12/02/2023,South,Florida,Miami,Technology,Phones,Consumer,50,5,1
20/04/2023,West,California,Los Angeles,Technology,Phones,Consumer,300,30,3
";

    fn app() -> App {
        let table = RecordTable::from_ingested(read_rows(CSV.as_bytes()).unwrap());
        App::new(PathBuf::from("orders.csv"), table).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn values(entries: &[ListEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.value.as_str()).collect()
    }

    #[test]
    fn starts_unfiltered() {
        let app = app();
        assert_eq!(app.views.totals.records, 4);
        assert_eq!(app.filter.range.start(), d(2023, 1, 10));
        assert_eq!(app.filter.range.end(), d(2023, 4, 20));
        assert_eq!(values(&app.entries(Panel::Region)), vec!["South", "West"]);
    }

    #[test]
    fn toggling_region_narrows_states() {
        let mut app = app();
        assert_eq!(app.focus, Panel::Region);
        app.handle_key(KeyCode::Char(' '));

        assert!(app.filter.regions.contains("South"));
        assert_eq!(app.views.totals.records, 3);
        assert_eq!(values(&app.entries(Panel::State)), vec!["Florida", "Texas"]);
        assert_eq!(app.views, compute_views(&app.table.records, &app.filter));

        app.handle_key(KeyCode::Enter);
        assert!(app.filter.regions.is_empty());
        assert_eq!(app.views.totals.records, 4);
    }

    #[test]
    fn stale_selection_stays_listed() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus, Panel::State);
        app.handle_key(KeyCode::Char(' '));
        assert!(app.filter.states.contains("California"));

        app.handle_key(KeyCode::BackTab);
        app.handle_key(KeyCode::Char(' '));
        let states = app.entries(Panel::State);
        assert_eq!(values(&states), vec!["Florida", "Texas", "California"]);
        assert!(!states[2].offered && states[2].selected);
        assert_eq!(app.views.totals.records, 0);

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('c'));
        assert!(app.filter.states.is_empty());
        assert_eq!(app.views.totals.records, 3);
    }

    #[test]
    fn date_edit_applies_or_reports() {
        let mut app = app();
        app.focus = Panel::Dates;
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.editing.as_deref(), Some("10/01/2023"));

        for _ in 0..10 {
            app.handle_key(KeyCode::Backspace);
        }
        for c in "01/02/2023".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.editing, None);
        assert_eq!(app.filter.range.start(), d(2023, 2, 1));
        assert_eq!(app.views.totals.records, 3);

        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Char('/'));
        app.handle_key(KeyCode::Enter);
        assert!(app.status.starts_with("Invalid date"));
        assert_eq!(app.filter.range.start(), d(2023, 2, 1));
    }

    #[test]
    fn reversed_range_is_refused() {
        let mut app = app();
        app.focus = Panel::Dates;
        app.handle_key(KeyCode::Down);
        app.editing = Some("01/01/2023".to_string());
        app.handle_key(KeyCode::Enter);
        assert!(app.status.contains("after end"));
        assert_eq!(app.filter.range.end(), d(2023, 4, 20));
    }

    #[test]
    fn month_steps_clamp_to_data_span() {
        let mut app = app();
        app.focus = Panel::Dates;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.filter.range.start(), d(2023, 2, 10));
        assert_eq!(app.views.totals.records, 3);

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.filter.range.start(), d(2023, 1, 10));

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.filter, default_filter(&app.table.records).unwrap());
    }

    #[test]
    fn export_key_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.export_dir = dir.path().join("out");
        app.handle_key(KeyCode::Char('e'));
        assert!(app.status.starts_with("Exported 7 files"));
        assert!(app.export_dir.join("Category.csv").exists());
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('v')));
        assert_eq!(app.detail, Detail::Hierarchy);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn trend_series_spans_all_buckets() {
        let app = app();
        let series = TrendSeries::from_views(&app.views).unwrap();
        assert_eq!(series.labels, vec!["2023 : Jan", "2023 : Feb", "2023 : Apr"]);
        assert_eq!(series.points[1], (1.0, 250.0));
        assert_eq!(series.x_bounds, [-0.5, 2.5]);
        assert!(series.y_bounds[0] == 0.0 && series.y_bounds[1] > 300.0);
    }
}
