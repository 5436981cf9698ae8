//! Precomputed age estimates, one JSON file per user.

use crate::types::AgeEstimate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
enum AgeError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk shape of `<age_dir>/<name>.json`. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct AgeRecord {
    median_age: Option<serde_json::Number>,
}

/// Read-only directory of per-user age records.
#[derive(Debug, Clone)]
pub struct AgeStore {
    dir: PathBuf,
}

impl AgeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Look up the median age written for `name`, falling back to
    /// [`AgeEstimate::NotYetPredicted`] on any failure.
    pub fn lookup(&self, name: &str) -> AgeEstimate {
        let path = self.record_path(name);
        if !path.exists() {
            return AgeEstimate::NotYetPredicted;
        }

        match read_record(&path) {
            Ok(AgeRecord { median_age: Some(age) }) => AgeEstimate::Predicted(age),
            Ok(AgeRecord { median_age: None }) => AgeEstimate::NotYetPredicted,
            Err(e) => {
                tracing::warn!(name, path = %path.display(), error = %e, "error loading age data");
                AgeEstimate::NotYetPredicted
            }
        }
    }
}

fn read_record(path: &Path) -> Result<AgeRecord, AgeError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
