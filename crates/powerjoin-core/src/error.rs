//! Pipeline error taxonomy.
//!
//! Every stage returns [`PipelineError`]. The dataset builder turns per-file
//! errors into skips; only [`PipelineError::DirectoryNotFound`] and
//! [`PipelineError::EmptyDataset`] are meant to end a run.

use std::path::PathBuf;

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// File absent, unreadable, or missing/invalid fields. Integrity
    /// violations (non-positive iterations, negative durations) land here too.
    MissingOrMalformedInput,
    /// No power log for a timing record, or a log that yields no samples.
    NoCorrelatedData,
    /// Run-level condition: missing source directory or nothing processed.
    Fatal,
}

/// Errors produced by the measurement pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed timing file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("timing file {0} has no data rows")]
    EmptyTimingFile(PathBuf),

    #[error("invalid field `{field}` in {path}: {reason}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },

    #[error("no power log found for {timing} (expected {expected})")]
    NoMatchingPowerLog { timing: PathBuf, expected: PathBuf },

    #[error("power log {0} yielded no voltage/current samples")]
    NoPowerSamples(PathBuf),

    #[error("measurements directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("no measurements were processed successfully")]
    EmptyDataset,

    #[error("dataset file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    /// Map this error onto the three-way taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { .. }
            | Self::Csv { .. }
            | Self::EmptyTimingFile(_)
            | Self::InvalidField { .. }
            | Self::Json { .. } => ErrorCategory::MissingOrMalformedInput,
            Self::NoMatchingPowerLog { .. } | Self::NoPowerSamples(_) => {
                ErrorCategory::NoCorrelatedData
            }
            Self::DirectoryNotFound(_) | Self::EmptyDataset => ErrorCategory::Fatal,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(
        path: impl Into<PathBuf>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            path: path.into(),
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
