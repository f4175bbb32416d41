//! Panel 3: Prices: open/close lines over the visible window, range track below.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::widgets::{date_labels, day_x, render_empty, value_labels, x_bounds, y_bounds, RangeTrack};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(prices) = app.run.prices.as_ref().filter(|p| !p.records.is_empty()) else {
        render_empty(f, area, "No prices to chart.", "Run a forecast from panel 1 first.");
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let total = prices.records.len();
    let window = app.price_window.bounds(total);
    let visible = &prices.records[window.clone()];

    let open: Vec<(f64, f64)> = visible
        .iter()
        .filter(|r| r.open.is_finite())
        .map(|r| (day_x(r.date), r.open))
        .collect();
    let close: Vec<(f64, f64)> = visible
        .iter()
        .filter(|r| r.close.is_finite())
        .map(|r| (day_x(r.date), r.close))
        .collect();

    let (Some(xb), Some(yb)) = (
        x_bounds(&[open.as_slice(), close.as_slice()]),
        y_bounds(&[open.as_slice(), close.as_slice()]),
    ) else {
        render_empty(f, area, "Visible window has no finite prices.", "Press 0 to reset the window.");
        return;
    };

    let datasets = vec![
        Dataset::default()
            .name("Stock Open")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::NEUTRAL))
            .data(&open),
        Dataset::default()
            .name("Stock Close")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::POSITIVE))
            .data(&close),
    ];

    let chart = Chart::new(datasets)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(xb)
                .labels(date_labels(xb)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(prices.ticker.clone(), theme::muted()))
                .style(theme::muted())
                .bounds(yb)
                .labels(value_labels(yb)),
        );
    f.render_widget(chart, rows[0]);

    f.render_widget(
        RangeTrack {
            total,
            window: window.clone(),
        },
        rows[1],
    );

    let hint = format!(
        "rows {}–{} of {}   [ / ] zoom   < / > pan   0 reset",
        window.start + 1,
        window.end,
        total
    );
    f.render_widget(Paragraph::new(Line::from(Span::styled(hint, theme::muted()))), rows[2]);
}
