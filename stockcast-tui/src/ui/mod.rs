//! Top-level UI layout: sentiment banner, panel tabs, active panel, status bar.

pub mod components_panel;
pub mod data_panel;
pub mod forecast_panel;
pub mod help_panel;
pub mod input_panel;
pub mod overlays;
pub mod price_chart;
pub mod status_bar;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Tabs};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let [banner, tabs, body, status] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(f.area());

    status_bar::render_banner(f, banner, app);
    draw_tabs(f, tabs, app.active_panel);
    draw_panel(f, body, app);
    status_bar::render(f, status, app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, body),
        Overlay::ErrorHistory => overlays::render_error_history(f, body, app),
        Overlay::None => {}
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, active: Panel) {
    let titles: Vec<Line> = (0..Panel::COUNT)
        .filter_map(Panel::from_index)
        .map(|p| Line::from(format!("{} {}", p.index() + 1, p.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(active.index())
        .style(theme::muted())
        .highlight_style(theme::accent_bold())
        .divider("│");
    f.render_widget(tabs, area);
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Input => input_panel::render(f, inner, app),
        Panel::Data => data_panel::render(f, inner, app),
        Panel::Prices => price_chart::render(f, inner, app),
        Panel::Forecast => forecast_panel::render(f, inner, app),
        Panel::Components => components_panel::render(f, inner, app),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
