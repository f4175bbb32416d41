//! App state persistence: JSON save/load across restarts.
//!
//! Only the input selection is kept. The end date is not persisted; every
//! session starts with the range ending today.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockcast_core::forecast::{Horizon, ModelKind};

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// Listed symbol under the cursor; `None` means the custom row.
    pub listed: Option<String>,
    pub custom: String,
    pub start: Option<NaiveDate>,
    pub horizon_years: u32,
    pub model: Option<ModelKind>,
    pub active_panel: Panel,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            listed: None,
            custom: String::new(),
            start: None,
            horizon_years: Horizon::default().years(),
            model: None,
            active_panel: Panel::Input,
        }
    }
}

/// Load persisted state from disk. Returns `None` if the file is missing or corrupt.
pub fn load(path: &Path) -> Option<PersistedState> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
            None
        }
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        listed: app.input.catalog.get(app.input.cursor).map(|t| t.symbol.clone()),
        custom: app.input.custom.clone(),
        start: Some(app.input.start),
        horizon_years: app.input.horizon.years(),
        model: Some(app.model),
        active_panel: app.active_panel,
    }
}

/// Apply persisted state to AppState. Values that no longer fit are skipped.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.input.custom = state.custom;
    match state.listed {
        Some(symbol) if app.input.catalog.find(&symbol).is_some() => app.input.select_symbol(&symbol),
        _ => app.input.cursor = app.input.custom_row(),
    }
    if let Some(start) = state.start {
        app.input.start = start;
    }
    if let Ok(horizon) = Horizon::from_years(state.horizon_years) {
        app.input.horizon = horizon;
    }
    if let Some(model) = state.model {
        app.model = model;
    }
    app.active_panel = state.active_panel;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            listed: Some("TSLA".into()),
            custom: "nvda".into(),
            start: NaiveDate::from_ymd_opt(2019, 5, 1),
            horizon_years: 4,
            model: Some(ModelKind::Drift),
            active_panel: Panel::Forecast,
        };

        save(&path, &state).unwrap();
        assert_eq!(load(&path), Some(state));
    }

    #[test]
    fn missing_file_returns_none() {
        assert_eq!(load(Path::new("/nonexistent/path/state.json")), None);
    }

    #[test]
    fn corrupt_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        assert_eq!(load(&path), None);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let state: PersistedState = serde_json::from_str(r#"{"custom":"ZOMATO"}"#).unwrap();
        assert_eq!(state.custom, "ZOMATO");
        assert_eq!(state.horizon_years, 1);
        assert_eq!(state.active_panel, Panel::Input);
    }
}
