//! Artifact export: CSV tables plus a JSON manifest per run.
//!
//! `save_artifacts` writes `{ticker}_{start}_{end}_{years}y/` under the output
//! directory containing:
//! - `prices.csv`: canonical price table
//! - `training.csv`: prepared (date, value) series
//! - `forecast.csv`: predicted value and bounds per date
//! - `components.csv`: trend / weekly / yearly per date
//! - `manifest.json`: inputs, model, provenance, sentiment, run fingerprint
//!
//! Manifests carry a `schema_version`; newer versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::data::DataSource;
use stockcast_core::domain::{ComponentPoint, ForecastPoint, PriceRecord, Sentiment, TrainingPoint, PRICE_COLUMNS};
use stockcast_core::fingerprint::RunFingerprint;

use crate::pipeline::RunOutput;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon_years: u32,
    pub model: String,
    pub source: DataSource,
    pub dataset_hash: String,
    pub price_rows: usize,
    pub training_rows: usize,
    pub dropped_rows: usize,
    pub forecast_rows: usize,
    pub sentiment: Option<Sentiment>,
    pub fingerprint: RunFingerprint,
    pub exported_at: DateTime<Utc>,
}

impl RunManifest {
    pub fn from_output(output: &RunOutput) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ticker: output.input.ticker.clone(),
            start: output.input.range.start,
            end: output.input.range.end,
            horizon_years: output.horizon.years(),
            model: output.forecast.model.clone(),
            source: output.prices.source,
            dataset_hash: output.prices.dataset_hash.clone(),
            price_rows: output.prices.records.len(),
            training_rows: output.training.points.len(),
            dropped_rows: output.training.dropped(),
            forecast_rows: output.forecast.points.len(),
            sentiment: output.sentiment,
            fingerprint: output.fingerprint.clone(),
            exported_at: Utc::now(),
        }
    }
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Blank cell for missing (NaN) provider values.
fn cell(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.6}")
    } else {
        String::new()
    }
}

pub fn export_prices_csv(records: &[PriceRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(PRICE_COLUMNS)?;
    for r in records {
        wtr.write_record([
            r.date.to_string(),
            cell(r.open),
            cell(r.high),
            cell(r.low),
            cell(r.close),
            cell(r.adjusted_close),
            r.volume.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_training_csv(points: &[TrainingPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "value"])?;
    for p in points {
        wtr.write_record([p.date.to_string(), cell(p.value)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_forecast_csv(points: &[ForecastPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "predicted_value", "lower_bound", "upper_bound"])?;
    for p in points {
        wtr.write_record([
            p.date.to_string(),
            cell(p.predicted_value),
            cell(p.lower_bound),
            cell(p.upper_bound),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_components_csv(points: &[ComponentPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "trend", "weekly", "yearly"])?;
    for p in points {
        wtr.write_record([p.date.to_string(), cell(p.trend), cell(p.weekly), cell(p.yearly)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// `{ticker}_{start}_{end}_{years}y`, with path separators in the ticker replaced.
pub fn run_dir_name(output: &RunOutput) -> String {
    let ticker: String = output
        .input
        .ticker
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!(
        "{}_{}_{}_{}y",
        ticker,
        output.input.range.start,
        output.input.range.end,
        output.horizon.years()
    )
}

/// Write the full artifact set for one run. Returns the created directory.
pub fn save_artifacts(output: &RunOutput, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(run_dir_name(output));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let files = [
        ("prices.csv", export_prices_csv(&output.prices.records)?),
        ("training.csv", export_training_csv(&output.training.points)?),
        ("forecast.csv", export_forecast_csv(&output.forecast.points)?),
        ("components.csv", export_components_csv(&output.forecast.components)?),
        (
            "manifest.json",
            serde_json::to_string_pretty(&RunManifest::from_output(output))
                .context("failed to serialize run manifest")?,
        ),
    ];
    for (name, content) in files {
        let path = run_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    tracing::info!(dir = %run_dir.display(), "artifacts exported");
    Ok(run_dir)
}

/// Load the manifest from an artifact directory, rejecting unknown schema versions.
pub fn load_manifest(dir: &Path) -> Result<RunManifest> {
    let path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: RunManifest =
        serde_json::from_str(&json).context("failed to deserialize run manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_prices_export_as_blank_cells() {
        let csv = export_prices_csv(&[PriceRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            open: 1.0,
            high: f64::NAN,
            low: 0.5,
            close: 0.75,
            adjusted_close: 0.75,
            volume: 0,
        }])
        .unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), PRICE_COLUMNS.join(","));
        assert_eq!(lines.next().unwrap(), "2024-03-01,1.000000,,0.500000,0.750000,0.750000,0");
    }

    #[test]
    fn forecast_csv_has_header_and_rows() {
        let csv = export_forecast_csv(&[ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            predicted_value: 10.0,
            lower_bound: 9.0,
            upper_bound: 11.0,
        }])
        .unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.starts_with("date,predicted_value,lower_bound,upper_bound"));
    }
}
