//! Artifact export round trip against the synthetic provider.

use std::sync::Arc;

use chrono::NaiveDate;
use stockcast_core::data::SyntheticProvider;
use stockcast_core::forecast::{AdditiveSettings, Horizon, ModelKind};
use stockcast_core::resolve::{DateRange, TickerChoice};
use stockcast_runner::export::{run_dir_name, SCHEMA_VERSION};
use stockcast_runner::{load_manifest, save_artifacts, Pipeline, RunRequest};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn run() -> stockcast_runner::RunOutput {
    let mut pipeline = Pipeline::new(
        Arc::new(SyntheticProvider::new()),
        ModelKind::Drift,
        AdditiveSettings::default(),
    )
    .with_today(d(2024, 6, 28));
    pipeline
        .run(&RunRequest {
            choice: TickerChoice::Listed("RELIANCE.NS".into()),
            range: DateRange::new(d(2023, 1, 1), d(2024, 6, 28)).unwrap(),
            horizon: Horizon::from_years(2).unwrap(),
        })
        .unwrap()
}

#[test]
fn writes_all_files_and_manifest_round_trips() {
    let out = run();
    let tmp = tempfile::tempdir().unwrap();
    let dir = save_artifacts(&out, tmp.path()).unwrap();

    assert_eq!(
        dir.file_name().unwrap().to_str().unwrap(),
        "RELIANCE.NS_2023-01-01_2024-06-28_2y"
    );
    assert_eq!(run_dir_name(&out), "RELIANCE.NS_2023-01-01_2024-06-28_2y");
    for name in ["prices.csv", "training.csv", "forecast.csv", "components.csv", "manifest.json"] {
        assert!(dir.join(name).is_file(), "missing {name}");
    }

    let forecast_csv = std::fs::read_to_string(dir.join("forecast.csv")).unwrap();
    assert_eq!(forecast_csv.lines().count(), out.forecast.points.len() + 1);

    let manifest = load_manifest(&dir).unwrap();
    assert_eq!(manifest.schema_version, SCHEMA_VERSION);
    assert_eq!(manifest.ticker, "RELIANCE.NS");
    assert_eq!(manifest.model, "drift");
    assert_eq!(manifest.dataset_hash, out.prices.dataset_hash);
    assert_eq!(manifest.fingerprint, out.fingerprint);
    let (saved, live) = (manifest.sentiment.unwrap(), out.sentiment.unwrap());
    assert_eq!(saved.direction, live.direction);
    assert!((saved.predicted - live.predicted).abs() <= live.predicted.abs() * 1e-12);
}

#[test]
fn newer_schema_is_rejected() {
    let out = run();
    let tmp = tempfile::tempdir().unwrap();
    let dir = save_artifacts(&out, tmp.path()).unwrap();

    let path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&path).unwrap();
    let bumped = json.replacen(
        &format!("\"schema_version\": {SCHEMA_VERSION}"),
        "\"schema_version\": 99",
        1,
    );
    std::fs::write(&path, bumped).unwrap();

    let err = load_manifest(&dir).unwrap_err();
    assert!(err.to_string().contains("unsupported schema version 99"));
}
