//! Panel 1: Input: ticker selector, date range, horizon slider, suggestions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, EditField};
use crate::theme;
use crate::ui::widgets::Slider;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_ticker_list(f, cols[0], app);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(cols[1]);

    render_fields(f, rows[0], app);
    f.render_widget(
        Slider {
            label: "Horizon (years)",
            value: app.input.horizon.years(),
            min: stockcast_core::forecast::MIN_YEARS,
            max: stockcast_core::forecast::MAX_YEARS,
            focused: true,
        },
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<18}", "Model"), theme::muted()),
            Span::styled(app.model.to_string(), theme::accent()),
            Span::styled("  [m]toggle", theme::muted()),
        ])),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "[Enter]run [i]custom [s]start [d]end [h/l]horizon",
            theme::muted(),
        )),
        rows[3],
    );
    render_suggestions(f, rows[4], app);
}

fn render_ticker_list(f: &mut Frame, area: Rect, app: &AppState) {
    let input = &app.input;
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme::muted())
        .title(Span::styled(" Stock ", theme::neutral()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = inner.height as usize;
    let first = input.cursor.saturating_sub(visible.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    for (row, entry) in input.catalog.tickers.iter().enumerate().skip(first).take(visible) {
        let style = if row == input.cursor { theme::cursor() } else { theme::text() };
        lines.push(Line::from(Span::styled(format!(" {} ", entry.label()), style)));
    }
    if lines.len() < visible {
        let row = input.custom_row();
        let style = if row == input.cursor { theme::cursor() } else { theme::neutral() };
        lines.push(Line::from(Span::styled(" Custom… ", style)));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn field_line<'a>(app: &'a AppState, field: EditField, value: String) -> Line<'a> {
    let label = match field {
        EditField::Custom => "Custom ticker",
        EditField::Start => "Start date",
        EditField::End => "End date",
    };
    let editing = app.input.editing == Some(field);
    let value_span = if editing {
        Span::styled(format!("{}▏", app.input.edit_buffer), theme::accent_bold())
    } else if value.is_empty() {
        Span::styled("(none)", theme::muted())
    } else {
        Span::styled(value, theme::text())
    };
    Line::from(vec![Span::styled(format!("{label:<18}"), theme::muted()), value_span])
}

fn render_fields(f: &mut Frame, area: Rect, app: &AppState) {
    let input = &app.input;
    let selected = match input.catalog.get(input.cursor) {
        Some(entry) => Span::styled(entry.label(), theme::accent()),
        None => Span::styled("Custom", theme::neutral()),
    };
    let lines = vec![
        Line::from(vec![Span::styled(format!("{:<18}", "Selected"), theme::muted()), selected]),
        field_line(app, EditField::Custom, input.custom.clone()),
        field_line(app, EditField::Start, input.start.to_string()),
        field_line(app, EditField::End, input.end.to_string()),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_suggestions(f: &mut Frame, area: Rect, app: &AppState) {
    let (title, entries): (&str, Vec<_>) = if !app.suggestions.is_empty() {
        (" Did you mean one of these? ", app.suggestions.iter().collect())
    } else {
        (" Suggestions ", app.input.live_suggestions())
    };
    if entries.is_empty() {
        return;
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme::muted())
        .title(Span::styled(title, theme::warning()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = entries
        .iter()
        .take(inner.height as usize)
        .map(|t| {
            Line::from(vec![
                Span::styled(format!(" {:<14}", t.symbol), theme::accent()),
                Span::styled(t.name.clone(), theme::muted()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
