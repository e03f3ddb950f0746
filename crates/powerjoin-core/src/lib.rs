//! # powerjoin-core
//!
//! **Per-inference energy from benchmark runs and battery logs.**
//!
//! A benchmark run leaves two files side by side:
//! - `<stem>_performance.csv`: model, timestamp, iteration count, µs per
//!   inference, total run time
//! - `<stem>_batterystats.txt`: free-text battery history with `volt=` and
//!   `current=` tokens
//!
//! `powerjoin-core` pairs them by name, rebuilds the voltage/current series,
//! and derives average power and energy per inference.
//!
//! ## Quick Start
//!
//! ```no_run
//! use powerjoin_core::{DatasetFile, PipelineConfig, build_dataset};
//!
//! let config = PipelineConfig::default();
//! let report = build_dataset(&config).expect("measurements directory");
//! println!("{} joined, {} skipped", report.processed, report.skipped.len());
//!
//! let dataset = report.require_rows().expect("at least one run");
//! let path = DatasetFile::new(dataset)
//!     .save_to_reports(&config.reports_dir)
//!     .expect("write dataset");
//! println!("saved {}", path.display());
//! ```
//!
//! ## Pipeline
//!
//! Timing parse → power-log match → power-log parse → assembly, once per
//! timing file, in file-name order. A failure at any stage skips that run and
//! never aborts the scan.

pub mod builder;
pub mod config;
pub mod dataset;
pub mod error;
pub mod matcher;
pub mod measurement;
pub mod power;
pub mod timing;

pub use builder::{BuildReport, SkipReason, SkippedRun, build_dataset, process_timing_file};
pub use config::{PipelineConfig, VoltageLines};
pub use dataset::{Dataset, DatasetFile, DatasetSummary, latest_dataset};
pub use error::{ErrorCategory, PipelineError};
pub use matcher::{find_power_log, power_log_candidate};
pub use measurement::{COLUMNS, MeasurementRecord, energy_per_inference};
pub use power::{PowerSample, PowerTelemetry, parse_power_log, reconstruct_samples};
pub use timing::{TimingRecord, parse_timing_file};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
