//! Dataset container and its on-disk form.
//!
//! # Storage Format
//!
//! A dataset is written as one pretty-printed JSON file,
//! `measurements_data_<YYYYMMDD_HHMMSS>.json`, holding:
//! - `version`, `created_at`, `powerjoin_version`: provenance
//! - `columns`: the fixed column order, repeated for readers that want it
//! - `rows`: one object per run, keys in column order, sample lists intact

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::measurement::{COLUMNS, MeasurementRecord};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;
/// File name prefix for saved datasets.
pub const DATASET_PREFIX: &str = "measurements_data_";
const DATASET_EXTENSION: &str = ".json";

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Ordered measurement rows, one per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<MeasurementRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: MeasurementRecord) {
        self.rows.push(record);
    }

    pub fn rows(&self) -> &[MeasurementRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeasurementRecord> {
        self.rows.iter()
    }

    /// Shape, distinct models and timestamp range.
    pub fn summary(&self) -> DatasetSummary {
        let unique_models = self
            .rows
            .iter()
            .map(|r| r.model_identity.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let first_timestamp = self.rows.iter().map(|r| r.timestamp.clone()).min();
        let last_timestamp = self.rows.iter().map(|r| r.timestamp.clone()).max();

        DatasetSummary {
            rows: self.rows.len(),
            columns: COLUMNS.len(),
            unique_models,
            total_samples: self.rows.iter().map(MeasurementRecord::sample_count).sum(),
            first_timestamp,
            last_timestamp,
        }
    }
}

impl FromIterator<MeasurementRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = MeasurementRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a MeasurementRecord;
    type IntoIter = std::slice::Iter<'a, MeasurementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Headline numbers for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub unique_models: usize,
    pub total_samples: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
}

// ---------------------------------------------------------------------------
// Dataset file
// ---------------------------------------------------------------------------

/// Serialized dataset plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub version: u32,
    pub created_at: String,
    pub powerjoin_version: String,
    pub columns: Vec<String>,
    pub rows: Dataset,
}

impl DatasetFile {
    /// Wrap a dataset, stamping it with the current time.
    pub fn new(rows: Dataset) -> Self {
        Self {
            version: FORMAT_VERSION,
            created_at: format_iso8601(since_epoch(SystemTime::now())),
            powerjoin_version: crate::VERSION.to_string(),
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Write to an explicit path, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| PipelineError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|e| PipelineError::io(path, e))
    }

    /// Write into `reports_dir` under a timestamped name and return the path.
    pub fn save_to_reports(&self, reports_dir: &Path) -> Result<PathBuf> {
        let path = dataset_path(reports_dir, since_epoch(SystemTime::now()));
        self.write_json(&path)?;
        Ok(path)
    }

    /// Load and validate a dataset file.
    pub fn read_json(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let file: Self = serde_json::from_str(&contents).map_err(|source| PipelineError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        file.validate(path)?;
        Ok(file)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != FORMAT_VERSION {
            return Err(PipelineError::invalid(
                path,
                "version",
                format!("unsupported format version {}", self.version),
            ));
        }
        if self.columns.iter().map(String::as_str).ne(COLUMNS.iter().copied()) {
            return Err(PipelineError::invalid(
                path,
                "columns",
                format!("expected {COLUMNS:?}, got {:?}", self.columns),
            ));
        }
        if let Some((i, _)) = self.rows.iter().enumerate().find(|(_, r)| !r.is_aligned()) {
            return Err(PipelineError::invalid(
                path,
                "rows",
                format!("row {i}: current_list and voltage_list lengths differ"),
            ));
        }
        Ok(())
    }
}

/// Most recent `measurements_data_*.json` in `reports_dir`, by name.
pub fn latest_dataset(reports_dir: &Path) -> Result<Option<PathBuf>> {
    if !reports_dir.is_dir() {
        return Ok(None);
    }
    let entries = fs::read_dir(reports_dir).map_err(|e| PipelineError::io(reports_dir, e))?;

    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(DATASET_PREFIX) && n.ends_with(DATASET_EXTENSION))
        })
        .max_by(|a, b| a.file_name().cmp(&b.file_name())))
}

/// `<reports_dir>/measurements_data_<YYYYMMDD_HHMMSS>.json`.
pub fn dataset_path(reports_dir: &Path, since_epoch: Duration) -> PathBuf {
    reports_dir.join(format!(
        "{DATASET_PREFIX}{}{DATASET_EXTENSION}",
        format_run_timestamp(since_epoch)
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn since_epoch(t: SystemTime) -> Duration {
    t.duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// Format a duration-since-epoch the way run timestamps are written.
/// Example: `20260215_013000`
pub fn format_run_timestamp(since_epoch: Duration) -> String {
    let (year, month, day, hour, min, sec) = secs_to_utc(since_epoch.as_secs());
    format!("{year:04}{month:02}{day:02}_{hour:02}{min:02}{sec:02}")
}

/// Format a duration-since-epoch as a full ISO-8601 timestamp.
/// Example: `2026-02-15T01:30:00Z`
fn format_iso8601(since_epoch: Duration) -> String {
    let (year, month, day, hour, min, sec) = secs_to_utc(since_epoch.as_secs());
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z")
}

/// Seconds since Unix epoch → (year, month, day, hour, minute, second) UTC.
/// No leap second handling.
fn secs_to_utc(secs: u64) -> (u64, u64, u64, u64, u64, u64) {
    let sec = secs % 60;
    let min = (secs / 60) % 60;
    let hour = (secs / 3600) % 24;

    let mut days = secs / 86400;
    let mut year = 1970u64;
    loop {
        let days_in_year = if is_leap(year) { 366 } else { 365 };
        if days < days_in_year {
            break;
        }
        days -= days_in_year;
        year += 1;
    }

    let february = if is_leap(year) { 29 } else { 28 };
    let months_days: [u64; 12] = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut month = 12u64;
    for (i, &md) in months_days.iter().enumerate() {
        if days < md {
            month = i as u64 + 1;
            break;
        }
        days -= md;
    }

    (year, month, days + 1, hour, min, sec)
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
