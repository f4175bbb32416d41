//! Shared chart helpers and small widgets.

pub mod slider;

pub use slider::{RangeTrack, Slider};

use chrono::{Datelike, NaiveDate};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

/// Chart x coordinate for a date.
pub fn day_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// x range over all series.
pub fn x_bounds(series: &[&[(f64, f64)]]) -> Option<[f64; 2]> {
    let mut xs = series.iter().flat_map(|s| s.iter().map(|p| p.0));
    let first = xs.next()?;
    let (lo, hi) = xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
    Some([lo, if hi > lo { hi } else { lo + 1.0 }])
}

/// Padded y range over the finite values of all series.
pub fn y_bounds(series: &[&[(f64, f64)]]) -> Option<[f64; 2]> {
    let mut ys = series
        .iter()
        .flat_map(|s| s.iter().map(|p| p.1))
        .filter(|y| y.is_finite());
    let first = ys.next()?;
    let (lo, hi) = ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let pad = ((hi - lo) * 0.05).max(hi.abs().max(lo.abs()) * 0.01).max(1e-6);
    Some([lo - pad, hi + pad])
}

/// Start / middle / end date labels for an x range.
pub fn date_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|x| {
            let text = x_date(x).map(|d| d.to_string()).unwrap_or_default();
            Span::styled(text, theme::muted())
        })
        .collect()
}

pub fn value_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::styled(format_value(v), theme::muted()))
        .collect()
}

/// Two decimals below 1000, none above.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        "-".to_string()
    } else if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Placeholder shown before a panel has data.
pub fn render_empty(f: &mut Frame, area: Rect, message: &str, hint: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme::muted())),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
