//! Dataset builder: scan a measurements directory and join every run.
//!
//! Timing files are processed in lexical file-name order so repeated builds
//! over the same directory produce identical datasets. Each file goes through
//! timing parse → power-log match → power-log parse → assembly; the first
//! failing stage turns the run into a [`SkippedRun`] and the scan moves on.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::matcher::{find_power_log, run_stem};
use crate::measurement::MeasurementRecord;
use crate::power::parse_power_log;
use crate::timing::parse_timing_file;

/// Pipeline stage at which a run was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Timing file unreadable, malformed, or failing validation.
    NoTimingData,
    /// No power log alongside the timing file.
    NoPowerLog,
    /// Power log unreadable or yielding no samples.
    NoPowerData,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTimingData => write!(f, "no timing data"),
            Self::NoPowerLog => write!(f, "no power log"),
            Self::NoPowerData => write!(f, "no power data"),
        }
    }
}

/// A timing file that did not make it into the dataset.
#[derive(Debug)]
pub struct SkippedRun {
    pub file: PathBuf,
    pub reason: SkipReason,
    pub error: PipelineError,
}

/// Outcome of a full directory scan.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub dataset: Dataset,
    pub processed: usize,
    pub skipped: Vec<SkippedRun>,
}

impl BuildReport {
    /// Number of timing files considered.
    pub fn total(&self) -> usize {
        self.processed + self.skipped.len()
    }

    /// The dataset, or [`PipelineError::EmptyDataset`] if nothing was joined.
    pub fn require_rows(self) -> Result<Dataset> {
        if self.dataset.is_empty() {
            Err(PipelineError::EmptyDataset)
        } else {
            Ok(self.dataset)
        }
    }
}

/// Timing files in `dir`, sorted by file name.
pub fn find_timing_files(dir: &Path, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::DirectoryNotFound(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| run_stem(n, &config.timing_suffix))
                    .is_some()
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Run one timing file through every stage.
pub fn process_timing_file(
    timing_path: &Path,
    config: &PipelineConfig,
) -> std::result::Result<MeasurementRecord, (SkipReason, PipelineError)> {
    let timing = parse_timing_file(timing_path).map_err(|e| (SkipReason::NoTimingData, e))?;
    let power_path =
        find_power_log(timing_path, config).map_err(|e| (SkipReason::NoPowerLog, e))?;
    let power = parse_power_log(
        &power_path,
        timing.total_duration_seconds,
        config.voltage_lines,
    )
    .map_err(|e| (SkipReason::NoPowerData, e))?;

    Ok(MeasurementRecord::assemble(timing, power))
}

/// Scan `config.measurements_dir` and build the dataset.
///
/// Only a missing or unreadable directory is an error. Zero timing files, or
/// every file skipped, yields an empty dataset; see [`BuildReport::require_rows`].
pub fn build_dataset(config: &PipelineConfig) -> Result<BuildReport> {
    let dir = &config.measurements_dir;
    let files = find_timing_files(dir, config)?;

    let mut report = BuildReport::default();
    if files.is_empty() {
        log::warn!(
            "no '*{}' files found in {}",
            config.timing_suffix,
            dir.display()
        );
        return Ok(report);
    }
    log::info!("found {} timing file(s) in {}", files.len(), dir.display());

    for path in files {
        let name = display_name(&path);
        match process_timing_file(&path, config) {
            Ok(record) => {
                log::info!(
                    "processed {name}: {} ({}), {} samples, {:.4} W",
                    record.model_identity,
                    record.timestamp,
                    record.sample_count(),
                    record.average_power_watts
                );
                report.dataset.push(record);
                report.processed += 1;
            }
            Err((reason, error)) => {
                log::warn!("skipped ({reason}) {name}: {error}");
                report.skipped.push(SkippedRun {
                    file: path,
                    reason,
                    error,
                });
            }
        }
    }

    log::info!(
        "processed: {}, skipped: {}",
        report.processed,
        report.skipped.len()
    );
    Ok(report)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
