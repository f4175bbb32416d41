//! Help: keyboard shortcuts, shown in the `?` overlay.

use ratatui::text::{Line, Span};

use crate::theme;

pub fn lines() -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-5", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "Enter", "Run with the current inputs");
    key(&mut lines, "m", "Toggle model (additive / drift)");
    key(&mut lines, "x", "Export the current run (CSV + manifest)");
    key(&mut lines, "e", "Error history");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Input");
    key(&mut lines, "j / k", "Move through the stock list");
    key(&mut lines, "i", "Edit the custom ticker");
    key(&mut lines, "s / d", "Edit start / end date (YYYY-MM-DD)");
    key(&mut lines, "h / l", "Horizon slider (1-10 years)");
    key(&mut lines, "Enter / Esc", "Commit / cancel an edit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3: Prices");
    key(&mut lines, "[ / ]", "Zoom in / out");
    key(&mut lines, "< / >", "Pan older / newer");
    key(&mut lines, "0", "Show the full range");
    key(&mut lines, "h / l", "Horizon slider");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4: Forecast");
    key(&mut lines, "h / l", "Horizon slider");

    lines
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'static>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
