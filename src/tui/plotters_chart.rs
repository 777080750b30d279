//! Plotters-powered monthly sales chart widget for Ratatui.
//!
//! Plotters gives us axis + mesh rendering without manual tick work. Output is
//! drawn into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct SalesTrendChart<'a> {
    /// `(bucket index, sales)` in chronological order.
    pub points: &'a [(f64, f64)],
    /// Month labels, indexed like `points`.
    pub labels: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
}

impl<'a> Widget for SalesTrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(self.labels.len().clamp(2, 6))
                .y_labels(5)
                .x_label_formatter(&|v| label_at(self.labels, *v))
                .y_label_formatter(&|v| compact_amount(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255);
            let point_color = RGBColor(255, 255, 0);

            chart.draw_series(LineSeries::new(self.points.iter().copied(), &line_color))?;
            // `Circle` radii are mis-scaled by the ratatui backend; pixels read fine.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), point_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Label for a fractional x position, blank between buckets.
pub fn label_at(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// `1234567.0` → `1.2M`, `5300.0` → `5.3k`.
pub fn compact_amount(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_bucket_positions() {
        let labels = vec!["2023 : Jan".to_string(), "2023 : Feb".to_string()];
        assert_eq!(label_at(&labels, 1.0), "2023 : Feb");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, 7.0), "");
        assert_eq!(label_at(&labels, -1.0), "");
    }

    #[test]
    fn compact_amounts() {
        assert_eq!(compact_amount(950.0), "950");
        assert_eq!(compact_amount(5_300.0), "5.3k");
        assert_eq!(compact_amount(-2_500_000.0), "-2.5M");
    }
}
