//! Daily attendance ledger lookup.
//!
//! The ledger is a CSV file written by an external capture process:
//! a header row followed by `name, roll_no, date` rows, dates as `YYYY-MM-DD`.
//! Lookups never fail; an unreadable ledger maps to [`AttendanceStatus::Error`].

use crate::types::AttendanceStatus;
use chrono::NaiveDate;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
enum LedgerError {
    #[error("ledger has no header row")]
    MissingHeader,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Read-only view over the attendance CSV file.
#[derive(Debug, Clone)]
pub struct AttendanceLedger {
    path: PathBuf,
}

impl AttendanceLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Attendance for `name`/`roll_no` on the local calendar day.
    pub fn status_today(&self, name: &str, roll_no: &str) -> AttendanceStatus {
        self.status_on(name, roll_no, chrono::Local::now().date_naive())
    }

    /// Attendance for `name`/`roll_no` on `date`.
    ///
    /// Full linear scan on every call; the first row matching all three
    /// trimmed fields marks the user present.
    pub fn status_on(&self, name: &str, roll_no: &str, date: NaiveDate) -> AttendanceStatus {
        if !self.path.exists() {
            return AttendanceStatus::Absent;
        }

        match self.scan(name.trim(), roll_no.trim(), &date.format(DATE_FORMAT).to_string()) {
            Ok(true) => AttendanceStatus::Present,
            Ok(false) => AttendanceStatus::Absent,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "error reading attendance");
                AttendanceStatus::Error
            }
        }
    }

    fn scan(&self, name: &str, roll_no: &str, day: &str) -> Result<bool, LedgerError> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        if reader.headers()?.is_empty() {
            return Err(LedgerError::MissingHeader);
        }

        for record in reader.records() {
            let record = record?;
            if record.len() < 3 {
                continue;
            }
            if &record[0] == name && &record[1] == roll_no && &record[2] == day {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
