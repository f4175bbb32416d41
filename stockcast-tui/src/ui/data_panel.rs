//! Panel 2: Data: raw price tail, table shape and provenance, training tail.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use stockcast_core::domain::PRICE_COLUMNS;

use crate::app::AppState;
use crate::theme;
use crate::ui::widgets::{format_value, render_empty};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let (Some(prices), Some(training)) = (&app.run.prices, &app.run.training) else {
        let msg = if app.pending { "Loading data…" } else { "No data loaded." };
        render_empty(f, area, msg, "Pick a stock in panel 1 and press Enter.");
        return;
    };

    let tail = app.tail_rows;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(tail as u16 + 3),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    // Raw tail
    let header = Row::new(PRICE_COLUMNS.to_vec()).style(theme::accent_bold());
    let body: Vec<Row> = prices
        .tail(tail)
        .iter()
        .map(|r| {
            Row::new(vec![
                r.date.to_string(),
                format_value(r.open),
                format_value(r.high),
                format_value(r.low),
                format_value(r.close),
                format_value(r.adjusted_close),
                r.volume.to_string(),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(14),
    ];
    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme::muted())
            .title(Span::styled(format!(" Raw data: {} (last {tail}) ", prices.ticker), theme::neutral())),
    );
    f.render_widget(table, rows[0]);

    // Shape and provenance
    let (n_rows, n_cols) = prices.shape();
    let info = vec![
        Line::from(vec![
            Span::styled("Data shape  ", theme::muted()),
            Span::styled(format!("({n_rows}, {n_cols})"), theme::accent()),
            Span::styled("   Source  ", theme::muted()),
            Span::styled(prices.source.label(), theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Columns     ", theme::muted()),
            Span::styled(PRICE_COLUMNS.join(", "), theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Range       ", theme::muted()),
            Span::styled(format!("{} → {}", prices.range.start, prices.range.end), theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Dataset     ", theme::muted()),
            Span::styled(short_hash(&prices.dataset_hash), theme::neutral()),
        ]),
    ];
    f.render_widget(Paragraph::new(info), rows[1]);

    // Training tail
    let header = Row::new(vec!["Date", "Value"]).style(theme::accent_bold());
    let body: Vec<Row> = training
        .tail(tail)
        .iter()
        .map(|p| Row::new(vec![p.date.to_string(), format_value(p.value)]))
        .collect();
    let title = format!(
        " Training data: {} points, {} dropped ",
        training.points.len(),
        training.dropped()
    );
    let dropped_style = if training.dropped() > 0 { theme::warning() } else { theme::neutral() };
    let table = Table::new(body, [Constraint::Length(12), Constraint::Length(12)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme::muted())
                .title(Span::styled(title, dropped_style)),
        );
    f.render_widget(table, rows[2]);
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(16).collect()
}
