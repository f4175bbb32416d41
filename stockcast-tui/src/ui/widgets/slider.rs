//! Slider widgets: the horizon slider and the price-chart range track.

use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::theme;

/// Labeled integer slider: `Horizon (years)  1 ━━━●────── 10  [3]`.
pub struct Slider<'a> {
    pub label: &'a str,
    pub value: u32,
    pub min: u32,
    pub max: u32,
    pub focused: bool,
}

/// Track of `width` cells with the knob at `value`'s position.
pub fn slider_track(width: usize, value: u32, min: u32, max: u32) -> String {
    if width == 0 {
        return String::new();
    }
    let span = max.saturating_sub(min).max(1) as f64;
    let frac = (value.clamp(min, max) - min) as f64 / span;
    let knob = (frac * (width - 1) as f64).round() as usize;
    (0..width)
        .map(|i| match i.cmp(&knob) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        })
        .collect()
}

impl Widget for Slider<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = format!("{:<18}", self.label);
        let min = format!("{} ", self.min);
        let max = format!(" {}", self.max);
        let value = format!("  [{}]", self.value);
        let fixed = label.len() + min.len() + max.len() + value.len();
        let width = (area.width as usize).saturating_sub(fixed).clamp(3, 40);

        let track_style = if self.focused { theme::accent() } else { theme::muted() };
        Line::from(vec![
            Span::styled(label, theme::muted()),
            Span::styled(min, theme::muted()),
            Span::styled(slider_track(width, self.value, self.min, self.max), track_style),
            Span::styled(max, theme::muted()),
            Span::styled(value, theme::accent_bold()),
        ])
        .render(area, buf);
    }
}

/// Range-slider track under the price chart: the full table with the
/// visible window highlighted.
pub struct RangeTrack {
    pub total: usize,
    pub window: Range<usize>,
}

/// `width` cells; cells overlapping `window` (out of `total` rows) are filled.
pub fn range_track(width: usize, total: usize, window: &Range<usize>) -> String {
    if width == 0 {
        return String::new();
    }
    if total == 0 || window.is_empty() {
        return "─".repeat(width);
    }
    let first = window.start * width / total;
    let last = (window.end * width).div_ceil(total).clamp(first + 1, width);
    (0..width)
        .map(|i| if (first..last).contains(&i) { '█' } else { '─' })
        .collect()
}

impl Widget for RangeTrack {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let track = range_track(area.width as usize, self.total, &self.window);
        Line::from(Span::styled(track, theme::neutral())).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_sits_at_ends_and_middle() {
        assert_eq!(slider_track(5, 1, 1, 10), "●────");
        assert_eq!(slider_track(5, 10, 1, 10), "━━━━●");
        assert_eq!(slider_track(3, 5, 0, 10), "━●─");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(slider_track(4, 99, 1, 10), "━━━●");
        assert_eq!(slider_track(0, 3, 1, 10), "");
    }

    #[test]
    fn full_window_fills_track() {
        assert_eq!(range_track(8, 100, &(0..100)), "████████");
    }

    #[test]
    fn partial_window_marks_its_cells() {
        assert_eq!(range_track(10, 100, &(50..100)), "─────█████");
        assert_eq!(range_track(10, 100, &(0..10)), "█─────────");
    }

    #[test]
    fn tiny_window_still_shows_one_cell() {
        let track = range_track(10, 10_000, &(5000..5001));
        assert_eq!(track.chars().filter(|&c| c == '█').count(), 1);
    }

    #[test]
    fn empty_table_draws_bare_track() {
        assert_eq!(range_track(4, 0, &(0..0)), "────");
    }
}
