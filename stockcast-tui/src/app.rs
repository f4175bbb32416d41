//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels;
//! every run request carries a generation number and responses from older
//! generations are dropped on arrival.

use std::collections::VecDeque;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use stockcast_core::data::{TickerCatalog, TickerEntry};
use stockcast_core::forecast::{Horizon, ModelKind, MAX_YEARS, MIN_YEARS};
use stockcast_core::prepare::PreparedSeries;
use stockcast_core::resolve::{DateRange, ResolvedInput, TickerChoice};
use stockcast_runner::{LoadedPrices, RunOutput, RunRequest};

use crate::worker::{RunFailure, WorkerCommand, WorkerResponse};

/// Maximum number of errors kept for the history overlay.
pub const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Input,
    Data,
    Prices,
    Forecast,
    Components,
}

impl Panel {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            Panel::Input => 0,
            Panel::Data => 1,
            Panel::Prices => 2,
            Panel::Forecast => 3,
            Panel::Components => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Input),
            1 => Some(Panel::Data),
            2 => Some(Panel::Prices),
            3 => Some(Panel::Forecast),
            4 => Some(Panel::Components),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Input => "Input",
            Panel::Data => "Data",
            Panel::Prices => "Prices",
            Panel::Forecast => "Forecast",
            Panel::Components => "Components",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Input)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Input)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Empty ticker, bad date text, inverted range.
    Input,
    /// Probe came back empty.
    Ticker,
    Network,
    /// Fetch succeeded but returned nothing usable.
    Data,
    Forecast,
    Export,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Ticker => "TICKER",
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Forecast => "FCST",
            ErrorCategory::Export => "EXPORT",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// Text field currently being edited in the input panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Custom,
    Start,
    End,
}

impl EditField {
    pub fn label(self) -> &'static str {
        match self {
            EditField::Custom => "ticker",
            EditField::Start => "start date",
            EditField::End => "end date",
        }
    }
}

/// Input panel state: ticker selector, date fields, horizon slider.
#[derive(Debug)]
pub struct InputState {
    pub catalog: TickerCatalog,
    /// Row under the cursor; `catalog.len()` is the "Custom" row.
    pub cursor: usize,
    pub custom: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon: Horizon,
    pub editing: Option<EditField>,
    pub edit_buffer: String,
}

impl InputState {
    pub fn new(catalog: TickerCatalog, start: NaiveDate, end: NaiveDate, horizon: Horizon) -> Self {
        Self {
            catalog,
            cursor: 0,
            custom: String::new(),
            start,
            end,
            horizon,
            editing: None,
            edit_buffer: String::new(),
        }
    }

    /// Catalog rows plus the trailing "Custom" row.
    pub fn row_count(&self) -> usize {
        self.catalog.len() + 1
    }

    pub fn custom_row(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_custom(&self) -> bool {
        self.cursor >= self.custom_row()
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.row_count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Select a listed symbol, or fall back to the custom row with that text.
    pub fn select_symbol(&mut self, symbol: &str) {
        match self
            .catalog
            .tickers
            .iter()
            .position(|t| t.symbol.eq_ignore_ascii_case(symbol))
        {
            Some(i) => self.cursor = i,
            None => {
                self.custom = symbol.to_string();
                self.cursor = self.custom_row();
            }
        }
    }

    pub fn choice(&self) -> TickerChoice {
        match self.catalog.get(self.cursor) {
            Some(entry) => TickerChoice::Listed(entry.symbol.clone()),
            None => TickerChoice::Custom(self.custom.clone()),
        }
    }

    /// The request for the current selection.
    ///
    /// The range is passed through unchecked so an inverted range surfaces
    /// as a pipeline error like every other input problem.
    pub fn request(&self) -> RunRequest {
        RunRequest {
            choice: self.choice(),
            range: DateRange {
                start: self.start,
                end: self.end,
            },
            horizon: self.horizon,
        }
    }

    /// Returns true if the horizon changed.
    pub fn adjust_horizon(&mut self, delta: i32) -> bool {
        let years = (self.horizon.years() as i64 + delta as i64)
            .clamp(MIN_YEARS as i64, MAX_YEARS as i64) as u32;
        if years == self.horizon.years() {
            return false;
        }
        match Horizon::from_years(years) {
            Ok(h) => {
                self.horizon = h;
                true
            }
            Err(_) => false,
        }
    }

    pub fn begin_edit(&mut self, field: EditField) {
        self.edit_buffer = match field {
            EditField::Custom => self.custom.clone(),
            EditField::Start => self.start.to_string(),
            EditField::End => self.end.to_string(),
        };
        if field == EditField::Custom {
            self.cursor = self.custom_row();
        }
        self.editing = Some(field);
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_buffer.clear();
    }

    /// Apply the edit buffer to its field.
    ///
    /// A date that does not parse leaves the field unchanged and the editor
    /// open, returning the message to show.
    pub fn commit_edit(&mut self) -> Result<Option<EditField>, String> {
        let Some(field) = self.editing else {
            return Ok(None);
        };
        match field {
            EditField::Custom => self.custom = self.edit_buffer.clone(),
            EditField::Start | EditField::End => {
                let text = self.edit_buffer.trim();
                let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map_err(|_| format!("invalid {}: {text:?} (expected YYYY-MM-DD)", field.label()))?;
                if field == EditField::Start {
                    self.start = date;
                } else {
                    self.end = date;
                }
            }
        }
        self.cancel_edit();
        Ok(Some(field))
    }

    /// Live suggestions for the custom ticker text.
    pub fn live_suggestions(&self) -> Vec<&TickerEntry> {
        if !self.is_custom() {
            return Vec::new();
        }
        let query = if self.editing == Some(EditField::Custom) {
            &self.edit_buffer
        } else {
            &self.custom
        };
        self.catalog.suggest(query)
    }
}

/// Visible slice of the price table in the price chart.
///
/// `len = None` shows everything; `offset` counts rows hidden to the right
/// of the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceWindow {
    pub len: Option<usize>,
    pub offset: usize,
}

impl PriceWindow {
    pub const MIN_LEN: usize = 10;

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn visible_len(&self, total: usize) -> usize {
        self.len.unwrap_or(total).min(total)
    }

    pub fn bounds(&self, total: usize) -> Range<usize> {
        let len = self.visible_len(total);
        let offset = self.offset.min(total - len);
        let end = total - offset;
        end - len..end
    }

    pub fn is_zoomed(&self, total: usize) -> bool {
        self.visible_len(total) < total
    }

    pub fn zoom_in(&mut self, total: usize) {
        let current = self.visible_len(total);
        let target = (current / 2).max(Self::MIN_LEN.min(total));
        self.len = Some(target);
        self.clamp(total);
    }

    pub fn zoom_out(&mut self, total: usize) {
        let current = self.visible_len(total);
        self.len = Some(current.saturating_mul(2));
        self.clamp(total);
    }

    /// Move the window toward older rows.
    pub fn pan_left(&mut self, total: usize) {
        let len = self.visible_len(total);
        self.offset = (self.offset + Self::step(len)).min(total - len);
    }

    /// Move the window toward newer rows.
    pub fn pan_right(&mut self, total: usize) {
        let len = self.visible_len(total);
        self.offset = self.offset.saturating_sub(Self::step(len));
    }

    fn step(len: usize) -> usize {
        (len / 4).max(1)
    }

    fn clamp(&mut self, total: usize) {
        if self.len.is_some_and(|len| len >= total) {
            self.len = None;
        }
        let len = self.visible_len(total);
        self.offset = self.offset.min(total - len);
    }
}

/// What the latest run has produced so far.
#[derive(Debug, Default)]
pub struct RunView {
    pub input: Option<ResolvedInput>,
    pub prices: Option<Arc<LoadedPrices>>,
    pub training: Option<Arc<PreparedSeries>>,
    pub output: Option<RunOutput>,
}

impl RunView {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Active overlay (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,
    pub overlay: Overlay,

    // Inputs
    pub input: InputState,
    pub model: ModelKind,

    // Results
    pub run: RunView,
    /// Filled after the probe rejects a ticker.
    pub suggestions: Vec<TickerEntry>,
    pub price_window: PriceWindow,

    // Worker
    pub generation: u64,
    pub pending: bool,
    pub exporting: bool,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Settings
    pub tail_rows: usize,
    pub export_dir: PathBuf,
    pub provider_name: String,

    // Status & errors
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        input: InputState,
        model: ModelKind,
    ) -> Self {
        Self {
            active_panel: Panel::Input,
            running: true,
            overlay: Overlay::None,
            input,
            model,
            run: RunView::default(),
            suggestions: Vec::new(),
            price_window: PriceWindow::default(),
            generation: 0,
            pending: false,
            exporting: false,
            worker_tx,
            worker_rx,
            tail_rows: 5,
            export_dir: PathBuf::from("stockcast-exports"),
            provider_name: String::new(),
            status_message: None,
            error_history: VecDeque::new(),
            error_scroll: 0,
        }
    }

    /// Send the current inputs to the worker as a new generation.
    pub fn submit_run(&mut self) {
        self.generation += 1;
        let request = self.input.request();
        tracing::debug!(generation = self.generation, ticker = request.choice.raw(), "run submitted");
        let sent = self.worker_tx.send(WorkerCommand::Run {
            generation: self.generation,
            request,
            model: self.model,
        });
        if sent.is_err() {
            self.push_error(ErrorCategory::Other, "worker thread is not running".into(), String::new());
            return;
        }
        self.pending = true;
        self.suggestions.clear();
        let label = match self.input.choice() {
            TickerChoice::Listed(s) | TickerChoice::Custom(s) => s,
        };
        self.set_status(format!("Running {}…", label.trim()));
    }

    /// Re-run only if something has already been run for the current inputs.
    pub fn rerun_if_shown(&mut self) {
        if self.run.input.is_some() || self.pending {
            self.submit_run();
        }
    }

    pub fn toggle_model(&mut self) {
        self.model = match self.model {
            ModelKind::Additive => ModelKind::Drift,
            ModelKind::Drift => ModelKind::Additive,
        };
        self.set_status(format!("Model: {}", self.model));
        self.rerun_if_shown();
    }

    pub fn request_export(&mut self) {
        let Some(output) = &self.run.output else {
            self.set_warning("Nothing to export yet: run a forecast first");
            return;
        };
        if self.exporting {
            return;
        }
        let sent = self.worker_tx.send(WorkerCommand::Export {
            output: Box::new(output.clone()),
            dir: self.export_dir.clone(),
        });
        if sent.is_ok() {
            self.exporting = true;
            self.set_status("Exporting artifacts…");
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Apply one worker response. Responses for superseded runs are ignored.
    pub fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Validated { generation, input } => {
                if !self.is_current(generation) {
                    return;
                }
                let same_data = self
                    .run
                    .prices
                    .as_ref()
                    .is_some_and(|p| p.ticker == input.ticker && p.range == input.range);
                if !same_data {
                    self.run.prices = None;
                    self.run.training = None;
                    self.run.output = None;
                }
                self.run.input = Some(input);
            }
            WorkerResponse::Loaded {
                generation,
                prices,
                training,
            } => {
                if !self.is_current(generation) {
                    return;
                }
                let changed = self
                    .run
                    .prices
                    .as_ref()
                    .map_or(true, |p| p.dataset_hash != prices.dataset_hash);
                if changed {
                    self.price_window.reset();
                }
                if training.dropped() > 0 {
                    self.set_warning(format!("{} rows dropped while preparing", training.dropped()));
                }
                self.run.prices = Some(prices);
                self.run.training = Some(training);
            }
            WorkerResponse::Completed { generation, output } => {
                if !self.is_current(generation) {
                    return;
                }
                self.pending = false;
                let summary = match output.sentiment {
                    Some(s) => format!(
                        "{}: {} forecast points, sentiment {}",
                        output.input.ticker,
                        output.forecast.points.len(),
                        s.direction.label()
                    ),
                    None => format!("{}: forecast complete", output.input.ticker),
                };
                self.run.output = Some(*output);
                self.set_status(summary);
            }
            WorkerResponse::Failed { generation, failure } => {
                if !self.is_current(generation) {
                    return;
                }
                self.pending = false;
                self.apply_failure(failure);
            }
            WorkerResponse::Exported { dir } => {
                self.exporting = false;
                self.set_status(format!("Exported to {}", dir.display()));
            }
            WorkerResponse::ExportFailed { message } => {
                self.exporting = false;
                self.push_error(ErrorCategory::Export, message, self.export_dir.display().to_string());
            }
        }
    }

    /// A failed run halts every later stage, so nothing from it is shown.
    fn apply_failure(&mut self, failure: RunFailure) {
        self.run.clear();
        if failure.invalid_ticker {
            let suggested: Vec<TickerEntry> = self
                .input
                .catalog
                .suggest(&failure.ticker)
                .into_iter()
                .cloned()
                .collect();
            self.suggestions = if suggested.is_empty() {
                self.input.catalog.tickers.clone()
            } else {
                suggested
            };
        }
        self.push_error(failure.category, failure.message, failure.ticker);
    }

    /// Push an error into history and set the status bar.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input_state() -> InputState {
        InputState::new(
            TickerCatalog::default_catalog(),
            d(2020, 1, 1),
            d(2024, 6, 28),
            Horizon::default(),
        )
    }

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        (AppState::new(cmd_tx, resp_rx, input_state(), ModelKind::Additive), cmd_rx)
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Input.next(), Panel::Data);
        assert_eq!(Panel::Components.next(), Panel::Input);
        assert_eq!(Panel::Input.prev(), Panel::Components);
        for i in 0..Panel::COUNT {
            assert_eq!(Panel::from_index(i).unwrap().index(), i);
        }
        assert_eq!(Panel::from_index(Panel::COUNT), None);
    }

    #[test]
    fn cursor_reaches_custom_row_and_stops() {
        let mut input = input_state();
        for _ in 0..50 {
            input.cursor_down();
        }
        assert!(input.is_custom());
        assert_eq!(input.choice(), TickerChoice::Custom(String::new()));
        input.cursor_up();
        assert_eq!(input.choice(), TickerChoice::Listed("HDFCBANK.NS".into()));
    }

    #[test]
    fn select_symbol_falls_back_to_custom() {
        let mut input = input_state();
        input.select_symbol("msft");
        assert_eq!(input.choice(), TickerChoice::Listed("MSFT".into()));
        input.select_symbol("NVDA");
        assert_eq!(input.choice(), TickerChoice::Custom("NVDA".into()));
    }

    #[test]
    fn horizon_is_clamped_to_slider_range() {
        let mut input = input_state();
        assert!(!input.adjust_horizon(-1));
        assert_eq!(input.horizon.years(), 1);
        assert!(input.adjust_horizon(3));
        assert_eq!(input.horizon.years(), 4);
        assert!(input.adjust_horizon(100));
        assert_eq!(input.horizon.years(), 10);
        assert!(!input.adjust_horizon(1));
    }

    #[test]
    fn date_edit_rejects_bad_text_and_keeps_editor_open() {
        let mut input = input_state();
        input.begin_edit(EditField::Start);
        assert_eq!(input.edit_buffer, "2020-01-01");
        input.edit_buffer = "2021-13-40".into();
        assert!(input.commit_edit().is_err());
        assert_eq!(input.editing, Some(EditField::Start));
        assert_eq!(input.start, d(2020, 1, 1));

        input.edit_buffer = " 2021-03-15 ".into();
        assert_eq!(input.commit_edit().unwrap(), Some(EditField::Start));
        assert_eq!(input.start, d(2021, 3, 15));
        assert_eq!(input.editing, None);
    }

    #[test]
    fn custom_edit_moves_cursor_and_suggests_live() {
        let mut input = input_state();
        input.begin_edit(EditField::Custom);
        assert!(input.is_custom());
        input.edit_buffer = "tata".into();
        let live: Vec<&str> = input.live_suggestions().iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(live, vec!["TATASTEEL.NS"]);
        input.commit_edit().unwrap();
        assert_eq!(input.choice(), TickerChoice::Custom("tata".into()));
    }

    #[test]
    fn inverted_range_is_passed_through_to_the_pipeline() {
        let mut input = input_state();
        input.start = d(2024, 1, 1);
        input.end = d(2023, 1, 1);
        let request = input.request();
        assert!(request.range.start > request.range.end);
    }

    #[test]
    fn price_window_zoom_and_pan() {
        let mut w = PriceWindow::default();
        assert_eq!(w.bounds(100), 0..100);
        assert_eq!(w.bounds(0), 0..0);

        w.zoom_in(100);
        assert_eq!(w.bounds(100), 50..100);
        w.pan_left(100);
        assert_eq!(w.bounds(100), 38..88);
        for _ in 0..20 {
            w.pan_left(100);
        }
        assert_eq!(w.bounds(100), 0..50);
        w.pan_right(100);
        assert_eq!(w.bounds(100), 12..62);

        w.zoom_out(100);
        assert!(!w.is_zoomed(100));
        assert_eq!(w.bounds(100), 0..100);
    }

    #[test]
    fn price_window_never_zooms_below_minimum() {
        let mut w = PriceWindow::default();
        for _ in 0..10 {
            w.zoom_in(100);
        }
        assert_eq!(w.visible_len(100), PriceWindow::MIN_LEN);
        // Shorter table than the minimum: whole table stays visible.
        let mut w = PriceWindow::default();
        w.zoom_in(4);
        assert_eq!(w.bounds(4), 0..4);
    }

    #[test]
    fn submit_run_bumps_generation_and_sends_request() {
        let (mut app, cmd_rx) = app();
        app.submit_run();
        app.submit_run();
        assert_eq!(app.generation, 2);
        assert!(app.pending);
        let gens: Vec<u64> = cmd_rx
            .try_iter()
            .filter_map(|c| match c {
                WorkerCommand::Run { generation, .. } => Some(generation),
                _ => None,
            })
            .collect();
        assert_eq!(gens, vec![1, 2]);
    }

    #[test]
    fn stale_responses_are_dropped() {
        let (mut app, _rx) = app();
        app.submit_run();
        app.submit_run();
        app.handle_response(WorkerResponse::Validated {
            generation: 1,
            input: ResolvedInput {
                ticker: "AAPL".into(),
                range: DateRange::new(d(2020, 1, 1), d(2024, 6, 28)).unwrap(),
            },
        });
        assert!(app.run.input.is_none());
        app.handle_response(WorkerResponse::Failed {
            generation: 1,
            failure: RunFailure {
                category: ErrorCategory::Network,
                message: "boom".into(),
                ticker: "AAPL".into(),
                invalid_ticker: false,
            },
        });
        assert!(app.error_history.is_empty());
        assert!(app.pending);
    }

    #[test]
    fn invalid_ticker_lists_catalog_as_suggestions() {
        let (mut app, _rx) = app();
        app.submit_run();
        app.handle_response(WorkerResponse::Failed {
            generation: 1,
            failure: RunFailure {
                category: ErrorCategory::Ticker,
                message: "invalid ticker: ZZZZ".into(),
                ticker: "ZZZZ".into(),
                invalid_ticker: true,
            },
        });
        assert!(!app.pending);
        assert_eq!(app.suggestions.len(), app.input.catalog.len());
        assert_eq!(app.error_history.len(), 1);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Error);
    }

    #[test]
    fn invalid_ticker_prefers_matching_suggestions() {
        let (mut app, _rx) = app();
        app.submit_run();
        app.handle_response(WorkerResponse::Failed {
            generation: 1,
            failure: RunFailure {
                category: ErrorCategory::Ticker,
                message: "invalid ticker: RELIANCE".into(),
                ticker: "RELIANCE".into(),
                invalid_ticker: true,
            },
        });
        assert_eq!(app.suggestions.len(), 1);
        assert_eq!(app.suggestions[0].symbol, "RELIANCE.NS");
    }

    #[test]
    fn error_history_is_capped() {
        let (mut app, _rx) = app();
        for i in 0..(ERROR_HISTORY_CAP + 10) {
            app.push_error(ErrorCategory::Other, format!("e{i}"), String::new());
        }
        assert_eq!(app.error_history.len(), ERROR_HISTORY_CAP);
        assert_eq!(app.error_history[0].message, format!("e{}", ERROR_HISTORY_CAP + 9));
    }

    #[test]
    fn export_without_output_warns() {
        let (mut app, cmd_rx) = app();
        app.request_export();
        assert!(!app.exporting);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn model_toggle_reruns_only_after_a_run() {
        let (mut app, cmd_rx) = app();
        app.toggle_model();
        assert_eq!(app.model, ModelKind::Drift);
        assert!(cmd_rx.try_recv().is_err());

        app.submit_run();
        app.toggle_model();
        let models: Vec<ModelKind> = cmd_rx
            .try_iter()
            .filter_map(|c| match c {
                WorkerCommand::Run { model, .. } => Some(model),
                _ => None,
            })
            .collect();
        assert_eq!(models, vec![ModelKind::Drift, ModelKind::Additive]);
    }
}
