//! Pipeline configuration.
//!
//! Directories and naming rules are passed explicitly to every stage. A config
//! can be built from [`Default`], loaded from a JSON file, or both (missing
//! keys fall back to defaults).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Default suffix marking a timing file: `<stem>_performance.csv`.
pub const DEFAULT_TIMING_SUFFIX: &str = "_performance.csv";
/// Default suffix marking a power log: `<stem>_batterystats.txt`.
pub const DEFAULT_POWER_SUFFIX: &str = "_batterystats.txt";

/// Which power-log lines feed the carry-forward voltage state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoltageLines {
    /// Any line carrying a `volt=` token updates the last observed voltage.
    #[default]
    All,
    /// Only lines that also contain `current=` are considered at all.
    CurrentOnly,
}

impl std::fmt::Display for VoltageLines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::CurrentOnly => write!(f, "current-only"),
        }
    }
}

/// Configuration for one dataset build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding timing files and power logs side by side.
    pub measurements_dir: PathBuf,
    /// Directory where serialized datasets are written.
    pub reports_dir: PathBuf,
    pub timing_suffix: String,
    pub power_suffix: String,
    pub voltage_lines: VoltageLines,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            measurements_dir: PathBuf::from("measurements"),
            reports_dir: PathBuf::from("reports"),
            timing_suffix: DEFAULT_TIMING_SUFFIX.to_string(),
            power_suffix: DEFAULT_POWER_SUFFIX.to_string(),
            voltage_lines: VoltageLines::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file. Keys not present keep their defaults.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|source| PipelineError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
