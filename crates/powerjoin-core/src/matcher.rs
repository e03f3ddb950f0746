//! Timing file → power log matching by file name.
//!
//! `<stem>_performance.csv` pairs with `<stem>_batterystats.txt` in the same
//! directory. The transform is pure; [`find_power_log`] adds the existence
//! check.

use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

/// Strip `timing_suffix` from a file name, returning the shared stem.
pub fn run_stem<'a>(file_name: &'a str, timing_suffix: &str) -> Option<&'a str> {
    file_name
        .strip_suffix(timing_suffix)
        .filter(|stem| !stem.is_empty())
}

/// Expected power-log path for a timing file. No filesystem access.
pub fn power_log_candidate(timing_path: &Path, config: &PipelineConfig) -> Option<PathBuf> {
    let file_name = timing_path.file_name()?.to_str()?;
    let stem = run_stem(file_name, &config.timing_suffix)?;
    Some(timing_path.with_file_name(format!("{stem}{}", config.power_suffix)))
}

/// Locate the power log for a timing file, failing if it does not exist.
pub fn find_power_log(timing_path: &Path, config: &PipelineConfig) -> Result<PathBuf> {
    let expected = power_log_candidate(timing_path, config).ok_or_else(|| {
        PipelineError::invalid(
            timing_path,
            "file_name",
            format!("does not end with '{}'", config.timing_suffix),
        )
    })?;

    if expected.is_file() {
        Ok(expected)
    } else {
        Err(PipelineError::NoMatchingPowerLog {
            timing: timing_path.to_path_buf(),
            expected,
        })
    }
}
