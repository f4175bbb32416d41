//! Panel 4: Forecast: history points, predicted line with bounds, tail table.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Row, Table};
use ratatui::Frame;

use stockcast_runner::RunOutput;

use crate::app::AppState;
use crate::theme;
use crate::ui::widgets::{date_labels, day_x, format_value, render_empty, value_labels, x_bounds, y_bounds};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(output) = &app.run.output else {
        let msg = if app.pending { "Forecasting…" } else { "No forecast yet." };
        render_empty(f, area, msg, "Press Enter to run; h/l changes the horizon.");
        return;
    };

    let tail = app.tail_rows;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(tail as u16 + 2)])
        .split(area);

    render_chart(f, rows[0], output);
    render_tail(f, rows[1], output, tail);
}

fn render_chart(f: &mut Frame, area: Rect, output: &RunOutput) {
    let history: Vec<(f64, f64)> = output
        .training
        .points
        .iter()
        .map(|p| (day_x(p.date), p.value))
        .collect();
    let points = &output.forecast.points;
    let predicted: Vec<(f64, f64)> = points.iter().map(|p| (day_x(p.date), p.predicted_value)).collect();
    let lower: Vec<(f64, f64)> = points.iter().map(|p| (day_x(p.date), p.lower_bound)).collect();
    let upper: Vec<(f64, f64)> = points.iter().map(|p| (day_x(p.date), p.upper_bound)).collect();

    let all = [history.as_slice(), predicted.as_slice(), lower.as_slice(), upper.as_slice()];
    let (Some(xb), Some(yb)) = (x_bounds(&all), y_bounds(&all)) else {
        render_empty(f, area, "Forecast is empty.", "");
        return;
    };

    let datasets = vec![
        Dataset::default()
            .name("lower")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::WARNING))
            .data(&lower),
        Dataset::default()
            .name("upper")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::WARNING))
            .data(&upper),
        Dataset::default()
            .name("history")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme::NEUTRAL))
            .data(&history),
        Dataset::default()
            .name("predicted")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::ACCENT))
            .data(&predicted),
    ];

    let title = format!(
        " {} · {} · {} year(s) ",
        output.input.ticker,
        output.forecast.model,
        output.horizon.years()
    );
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::NONE)
                .title(Span::styled(title, theme::neutral())),
        )
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(Axis::default().style(theme::muted()).bounds(xb).labels(date_labels(xb)))
        .y_axis(Axis::default().style(theme::muted()).bounds(yb).labels(value_labels(yb)));
    f.render_widget(chart, area);
}

fn render_tail(f: &mut Frame, area: Rect, output: &RunOutput, tail: usize) {
    let header = Row::new(vec!["Date", "Predicted", "Lower", "Upper"]).style(theme::accent_bold());
    let body: Vec<Row> = output
        .forecast
        .tail(tail)
        .iter()
        .map(|p| {
            Row::new(vec![
                p.date.to_string(),
                format_value(p.predicted_value),
                format_value(p.lower_bound),
                format_value(p.upper_bound),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme::muted())
            .title(Span::styled(
                format!(" Forecast data ({} rows) ", output.forecast.points.len()),
                theme::neutral(),
            )),
    );
    f.render_widget(table, area);
}
