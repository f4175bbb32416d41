//! Panel 5: Components: trend over time, weekly and yearly seasonality profiles.

use chrono::Datelike;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use stockcast_core::domain::ComponentPoint;

use crate::app::AppState;
use crate::theme;
use crate::ui::widgets::{date_labels, day_x, render_empty, value_labels, x_bounds, y_bounds};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(output) = &app.run.output else {
        render_empty(f, area, "No forecast components yet.", "Run a forecast from panel 1 first.");
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let components = &output.forecast.components;
    let future = components.get(output.forecast.history_len..).unwrap_or(&[]);

    let trend: Vec<(f64, f64)> = components.iter().map(|c| (day_x(c.date), c.trend)).collect();
    if let Some(xb) = x_bounds(&[trend.as_slice()]) {
        render_component(f, rows[0], "trend", &trend, xb, date_labels(xb));
    }

    let weekly = weekly_profile(future);
    render_component(
        f,
        rows[1],
        "weekly",
        &weekly,
        [0.0, 6.0],
        ["Mon", "Thu", "Sun"].map(|s| Span::styled(s, theme::muted())).to_vec(),
    );

    let yearly = yearly_profile(future);
    render_component(
        f,
        rows[2],
        "yearly",
        &yearly,
        [0.0, 365.0],
        ["Jan", "Jul", "Dec"].map(|s| Span::styled(s, theme::muted())).to_vec(),
    );
}

/// One value per weekday (Mon = 0), from the first week of `points`.
pub fn weekly_profile(points: &[ComponentPoint]) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = points
        .iter()
        .take(7)
        .map(|c| (c.date.weekday().num_days_from_monday() as f64, c.weekly))
        .collect();
    out.sort_by(|a, b| a.0.total_cmp(&b.0));
    out
}

/// One value per day of year (0-based), from the first year of `points`.
pub fn yearly_profile(points: &[ComponentPoint]) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = points
        .iter()
        .take(365)
        .map(|c| (c.date.ordinal0() as f64, c.yearly))
        .collect();
    out.sort_by(|a, b| a.0.total_cmp(&b.0));
    out
}

fn render_component(
    f: &mut Frame,
    area: Rect,
    name: &str,
    data: &[(f64, f64)],
    xb: [f64; 2],
    x_labels: Vec<Span<'static>>,
) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme::muted())
        .title(Span::styled(format!(" {name} "), theme::neutral()));
    let Some(yb) = y_bounds(&[data]) else {
        f.render_widget(block, area);
        return;
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme::ACCENT))
        .data(data);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().style(theme::muted()).bounds(xb).labels(x_labels))
        .y_axis(Axis::default().style(theme::muted()).bounds(yb).labels(value_labels(yb)));
    f.render_widget(chart, area);
}
