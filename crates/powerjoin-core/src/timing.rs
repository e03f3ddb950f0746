//! Timing record parsing.
//!
//! A timing file is a CSV with a header row. Only the first data row is used;
//! the benchmark runner writes exactly one row per run.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// One run's inference-speed summary.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    pub model_identity: String,
    /// `YYYYMMDD_HHMMSS`, sortable as text.
    pub timestamp: String,
    pub iteration_count: u64,
    pub microseconds_per_inference: f64,
    pub total_duration_seconds: f64,
}

/// Header-keyed row as it appears on disk. Numeric fields are kept as text so
/// parse failures can name the offending column.
#[derive(Debug, Deserialize)]
struct TimingRow {
    model: String,
    timestamp: String,
    measurement_iterations: String,
    us_per_inference: String,
    total_time_sec: String,
}

/// Parse the first row of a timing file.
pub fn parse_timing_file(path: &Path) -> Result<TimingRecord> {
    let bytes = std::fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    parse_timing_bytes(path, &bytes)
}

/// Parse timing CSV content already in memory. `path` is used for error context.
pub fn parse_timing_bytes(path: &Path, bytes: &[u8]) -> Result<TimingRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let row: TimingRow = match reader.deserialize().next() {
        Some(Ok(row)) => row,
        Some(Err(source)) => {
            return Err(PipelineError::Csv {
                path: path.to_path_buf(),
                source,
            });
        }
        None => return Err(PipelineError::EmptyTimingFile(path.to_path_buf())),
    };

    row.validate(path)
}

impl TimingRow {
    fn validate(self, path: &Path) -> Result<TimingRecord> {
        if self.model.is_empty() {
            return Err(PipelineError::invalid(path, "model", "empty model name"));
        }
        if !is_run_timestamp(&self.timestamp) {
            return Err(PipelineError::invalid(
                path,
                "timestamp",
                format!("expected YYYYMMDD_HHMMSS, got '{}'", self.timestamp),
            ));
        }

        let iteration_count = parse_iterations(&self.measurement_iterations)
            .ok_or_else(|| {
                PipelineError::invalid(
                    path,
                    "measurement_iterations",
                    format!("expected a positive integer, got '{}'", self.measurement_iterations),
                )
            })?;

        let microseconds_per_inference =
            parse_float(path, "us_per_inference", &self.us_per_inference)?;
        if microseconds_per_inference <= 0.0 {
            return Err(PipelineError::invalid(
                path,
                "us_per_inference",
                format!("must be > 0, got {microseconds_per_inference}"),
            ));
        }

        let total_duration_seconds = parse_float(path, "total_time_sec", &self.total_time_sec)?;
        if total_duration_seconds < 0.0 {
            return Err(PipelineError::invalid(
                path,
                "total_time_sec",
                format!("must be >= 0, got {total_duration_seconds}"),
            ));
        }

        Ok(TimingRecord {
            model_identity: self.model,
            timestamp: self.timestamp,
            iteration_count,
            microseconds_per_inference,
            total_duration_seconds,
        })
    }
}

/// Accepts `"1200"` and whole-valued floats such as `"1200.0"`; rejects zero.
fn parse_iterations(raw: &str) -> Option<u64> {
    let n = match raw.parse::<u64>() {
        Ok(n) => n,
        Err(_) => {
            let f = raw.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 || f < 0.0 || f > u64::MAX as f64 {
                return None;
            }
            f as u64
        }
    };
    (n > 0).then_some(n)
}

fn parse_float(path: &Path, field: &'static str, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PipelineError::invalid(
            path,
            field,
            format!("expected a finite number, got '{raw}'"),
        )),
    }
}

/// `YYYYMMDD_HHMMSS`: 8 digits, underscore, 6 digits.
pub fn is_run_timestamp(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 15
        && b[8] == b'_'
        && b[..8].iter().all(u8::is_ascii_digit)
        && b[9..].iter().all(u8::is_ascii_digit)
}
