//! Sentiment banner (top) and status bar (bottom).

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

/// `Future Sentiment: Positive` in green, or Negative in pink.
pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(" StockCast ", theme::accent_bold())];

    match app.run.output.as_ref().and_then(|o| o.sentiment.map(|s| (o, s))) {
        Some((output, sentiment)) => {
            spans.push(Span::styled(format!("{}  ", output.input.ticker), theme::text()));
            spans.push(Span::styled("Future Sentiment: ", theme::muted()));
            spans.push(Span::styled(sentiment.direction.label(), theme::sentiment(sentiment.direction)));
            spans.push(Span::styled(
                format!(
                    "  ({} → {}, {:+.1}%)",
                    crate::ui::widgets::format_value(sentiment.current),
                    crate::ui::widgets::format_value(sentiment.predicted),
                    sentiment.change_pct() * 100.0
                ),
                theme::muted(),
            ));
        }
        None if app.pending => spans.push(Span::styled("working…", theme::warning())),
        None => spans.push(Span::styled("no forecast", theme::muted())),
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    // Panel hints
    spans.push(Span::styled(
        " 1:Input 2:Data 3:Prices 4:Forecast 5:Components ?:Help",
        theme::muted(),
    ));
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("{} · {}", app.provider_name, app.model),
        theme::neutral(),
    ));
    spans.push(Span::raw(" | "));

    // Status message
    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
