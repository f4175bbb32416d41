//! Run fingerprinting: deterministic identification of a forecast run.
//!
//! - `RunInputs`: everything the user chose (ticker, range, horizon, model + knobs).
//! - `inputs_hash`: identity of the inputs alone.
//! - `RunFingerprint`: inputs plus the dataset hash they ran against; its `run_hash`
//!   changes whenever either the inputs or the underlying data change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::forecast::{AdditiveSettings, ModelKind};

/// User-facing inputs of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon_years: u32,
    pub model: ModelKind,
    pub settings: AdditiveSettings,
}

impl RunInputs {
    /// BLAKE3 over the canonical JSON of the inputs.
    ///
    /// Struct field order is fixed, so the JSON is deterministic.
    pub fn inputs_hash(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

/// Complete fingerprint of a single forecast run, written to the export manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub inputs: RunInputs,
    pub inputs_hash: String,
    pub dataset_hash: String,
    pub run_hash: String,
}

impl RunFingerprint {
    pub fn new(inputs: RunInputs, dataset_hash: &str) -> Result<Self, serde_json::Error> {
        let inputs_hash = inputs.inputs_hash()?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(inputs_hash.as_bytes());
        hasher.update(b"+");
        hasher.update(dataset_hash.as_bytes());
        Ok(Self {
            inputs,
            inputs_hash,
            dataset_hash: dataset_hash.to_string(),
            run_hash: hasher.finalize().to_hex().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> RunInputs {
        RunInputs {
            ticker: "AAPL".into(),
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            horizon_years: 1,
            model: ModelKind::Additive,
            settings: AdditiveSettings::default(),
        }
    }

    #[test]
    fn hashing_is_deterministic() {
        let a = RunFingerprint::new(sample_inputs(), "abc").unwrap();
        let b = RunFingerprint::new(sample_inputs(), "abc").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn horizon_changes_inputs_hash() {
        let mut other = sample_inputs();
        other.horizon_years = 2;
        assert_ne!(
            sample_inputs().inputs_hash().unwrap(),
            other.inputs_hash().unwrap()
        );
    }

    #[test]
    fn dataset_changes_run_hash_only() {
        let a = RunFingerprint::new(sample_inputs(), "abc").unwrap();
        let b = RunFingerprint::new(sample_inputs(), "def").unwrap();
        assert_eq!(a.inputs_hash, b.inputs_hash);
        assert_ne!(a.run_hash, b.run_hash);
    }

    #[test]
    fn serialization_roundtrip() {
        let fp = RunFingerprint::new(sample_inputs(), "abc").unwrap();
        let json = serde_json::to_string(&fp).unwrap();
        let back: RunFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
