//! Keyboard input dispatch: text editor → overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, EditField, Overlay, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // 1. An open text field swallows every key.
    if app.input.editing.is_some() {
        handle_edit_key(app, key);
        return;
    }

    // 2. Overlays consume input next.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 3. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(panel) = c.to_digit(10).and_then(|n| Panel::from_index(n as usize - 1)) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Enter => {
            app.submit_run();
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('x') => {
            app.request_export();
            return;
        }
        KeyCode::Char('m') => {
            app.toggle_model();
            return;
        }
        _ => {}
    }

    // 4. Panel-specific keys.
    match app.active_panel {
        Panel::Input => handle_input_key(app, key),
        Panel::Prices => handle_prices_key(app, key),
        Panel::Forecast => handle_horizon_key(app, key),
        Panel::Data | Panel::Components => {}
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input.cancel_edit(),
        KeyCode::Enter => match app.input.commit_edit() {
            Ok(Some(field)) => {
                app.set_status(format!("Updated {}", field.label()));
                app.submit_run();
            }
            Ok(None) => {}
            Err(msg) => app.set_warning(msg),
        },
        KeyCode::Backspace => {
            app.input.edit_buffer.pop();
        }
        KeyCode::Char(c) => app.input.edit_buffer.push(c),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_input_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.input.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.input.cursor_up(),
        KeyCode::Char('g') | KeyCode::Home => app.input.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.input.cursor = app.input.custom_row(),
        KeyCode::Char('i') => app.input.begin_edit(EditField::Custom),
        KeyCode::Char('s') => app.input.begin_edit(EditField::Start),
        KeyCode::Char('d') => app.input.begin_edit(EditField::End),
        _ => handle_horizon_key(app, key),
    }
}

/// `h`/`l` move the horizon slider; an already-shown run is refreshed.
fn handle_horizon_key(app: &mut AppState, key: KeyEvent) {
    let delta = match key.code {
        KeyCode::Char('h') | KeyCode::Left => -1,
        KeyCode::Char('l') | KeyCode::Right => 1,
        _ => return,
    };
    if app.input.adjust_horizon(delta) {
        app.set_status(format!("Horizon: {} years", app.input.horizon.years()));
        app.rerun_if_shown();
    }
}

fn handle_prices_key(app: &mut AppState, key: KeyEvent) {
    let total = app.run.prices.as_ref().map_or(0, |p| p.records.len());
    match key.code {
        KeyCode::Char('[') | KeyCode::Char('+') if total > 0 => app.price_window.zoom_in(total),
        KeyCode::Char(']') | KeyCode::Char('-') if total > 0 => app.price_window.zoom_out(total),
        KeyCode::Char('<') | KeyCode::Char(',') if total > 0 => app.price_window.pan_left(total),
        KeyCode::Char('>') | KeyCode::Char('.') if total > 0 => app.price_window.pan_right(total),
        KeyCode::Char('0') => app.price_window.reset(),
        _ => handle_horizon_key(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};

    use chrono::NaiveDate;
    use stockcast_core::data::TickerCatalog;
    use stockcast_core::forecast::{Horizon, ModelKind};

    use crate::app::{InputState, PriceWindow};
    use crate::worker::WorkerCommand;

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let input = InputState::new(
            TickerCatalog::default_catalog(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            Horizon::default(),
        );
        (AppState::new(cmd_tx, resp_rx, input, ModelKind::Additive), cmd_rx)
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn digits_and_tab_switch_panels() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_panel, Panel::Prices);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel, Panel::Forecast);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_panel, Panel::Data);
    }

    #[test]
    fn q_quits_but_not_while_editing() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "q");
        assert!(app.running);
        assert_eq!(app.input.edit_buffer, "q");
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn typing_a_custom_ticker_submits_a_run() {
        let (mut app, rx) = app();
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "nvdx");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "a");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input.custom, "nvda");
        match rx.try_recv().unwrap() {
            WorkerCommand::Run { request, .. } => assert_eq!(request.choice.raw(), "nvda"),
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_keeps_editor_open_and_sends_nothing() {
        let (mut app, rx) = app();
        press(&mut app, KeyCode::Char('d'));
        for _ in 0..10 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "yesterday");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input.editing, Some(EditField::End));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn horizon_keys_rerun_only_after_first_run() {
        let (mut app, rx) = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.input.horizon.years(), 2);
        assert!(rx.try_recv().is_err());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('l'));
        let years: Vec<u32> = rx
            .try_iter()
            .filter_map(|c| match c {
                WorkerCommand::Run { request, .. } => Some(request.horizon.years()),
                _ => None,
            })
            .collect();
        assert_eq!(years, vec![2, 3]);
    }

    #[test]
    fn help_overlay_closes_on_any_key() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.overlay, Overlay::Help);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.input.cursor, 0);
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx) = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn prices_panel_pans_with_angle_brackets_and_keeps_h_l_for_horizon() {
        let (mut app, _rx) = app();
        app.active_panel = Panel::Prices;
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.input.horizon.years(), 2);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.input.horizon.years(), 1);
        assert_eq!(app.price_window, PriceWindow::default());
    }
}
