//! Integration tests for powerjoin-core.
//!
//! These tests drive the full pipeline over scratch directories:
//! timing files + battery logs → dataset → JSON → dataset.

use std::path::Path;

use powerjoin_core::{
    COLUMNS, DatasetFile, PipelineConfig, SkipReason, VoltageLines, build_dataset,
    latest_dataset,
};

const HEADER: &str = "model,timestamp,measurement_iterations,us_per_inference,total_time_sec";

fn write_timing(dir: &Path, model: &str, timestamp: &str, iterations: u64, us: f64, secs: f64) {
    let stem = format!("{}_{timestamp}", model.replace('/', "_"));
    std::fs::write(
        dir.join(format!("{stem}_performance.csv")),
        format!("{HEADER}\n{model},{timestamp},{iterations},{us},{secs}\n"),
    )
    .unwrap();
}

fn write_power(dir: &Path, model: &str, timestamp: &str, lines: &[&str]) {
    let stem = format!("{}_{timestamp}", model.replace('/', "_"));
    std::fs::write(
        dir.join(format!("{stem}_batterystats.txt")),
        lines.join("\n"),
    )
    .unwrap();
}

fn config_for(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        measurements_dir: dir.to_path_buf(),
        reports_dir: dir.join("reports"),
        ..Default::default()
    }
}

#[test]
fn joins_runs_and_derives_energy() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_timing(dir, "conv.onnx", "20250101_120000", 1000, 1000.0, 3600.0);
    write_power(
        dir,
        "conv.onnx",
        "20250101_120000",
        &[
            "Battery History (2% used, 10KB used of 4096KB)",
            "  +1s000ms (2) 100 volt=4000",
            "  +1s100ms (2) 100 current=-500",
            "  +1s200ms (2) 100 current=-1000",
        ],
    );

    let report = build_dataset(&config_for(dir)).unwrap();
    assert_eq!(report.processed, 1);
    assert!(report.skipped.is_empty());

    let rec = &report.dataset.rows()[0];
    assert_eq!(rec.model_identity, "conv.onnx");
    assert_eq!(rec.current_series, vec![-500, -1000]);
    assert_eq!(rec.voltage_series, vec![4000, 4000]);
    assert!((rec.average_power_watts - 3.0).abs() < 1e-12);
    // 3 W × 1 ms = 3 mJ = 3 / 3.6e6 Wh
    let expected = 3.0 * 0.001 / 3600.0;
    assert!((rec.energy_per_inference_watt_hours - expected).abs() < 1e-18);
    assert!(rec.energy_per_inference_watt_hours >= 0.0);
}

#[test]
fn missing_power_log_skips_only_that_run() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_timing(dir, "a.onnx", "20250101_120000", 10, 50.0, 1.0);
    write_power(dir, "a.onnx", "20250101_120000", &["volt=4000 current=-100"]);
    write_timing(dir, "b.onnx", "20250101_120000", 10, 50.0, 1.0);
    write_timing(dir, "c.onnx", "20250101_120000", 10, 50.0, 1.0);
    write_power(dir, "c.onnx", "20250101_120000", &["volt=3900 current=-90"]);

    let report = build_dataset(&config_for(dir)).unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::NoPowerLog);

    let models: Vec<&str> = report
        .dataset
        .iter()
        .map(|r| r.model_identity.as_str())
        .collect();
    assert_eq!(models, vec!["a.onnx", "c.onnx"]);
}

#[test]
fn repeated_model_gives_one_row_per_run() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    for ts in ["20250102_080000", "20250101_120000"] {
        write_timing(dir, "zi_t/model.onnx", ts, 100, 10.0, 2.0);
        write_power(dir, "zi_t/model.onnx", ts, &["volt=4000", "current=-10"]);
    }

    let report = build_dataset(&config_for(dir)).unwrap();
    let rows = report.dataset.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].model_identity, rows[1].model_identity);
    assert_eq!(rows[0].model_identity, "zi_t/model.onnx");
    // lexical file order puts the earlier timestamp first
    assert_eq!(rows[0].timestamp, "20250101_120000");
    assert_eq!(rows[1].timestamp, "20250102_080000");
}

#[test]
fn rebuilding_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    for (i, model) in ["x.onnx", "a.onnx", "m.onnx"].iter().enumerate() {
        let ts = format!("2025010{}_120000", i + 1);
        write_timing(dir, model, &ts, 10 + i as u64, 12.5 * (i + 1) as f64, 3.0);
        write_power(
            dir,
            model,
            &ts,
            &["current=1", "volt=4100", "current=-300", "volt=4050 current=-280"],
        );
    }

    let first = build_dataset(&config_for(dir)).unwrap().dataset;
    let second = build_dataset(&config_for(dir)).unwrap().dataset;
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn saved_dataset_round_trips_exactly() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_timing(dir, "r.onnx", "20250101_120000", 777, 1287.123456789, 10.000123);
    write_power(
        dir,
        "r.onnx",
        "20250101_120000",
        &["volt=4012 current=-333", "current=-317", "volt=3999", "current=-1"],
    );

    let config = config_for(dir);
    let dataset = build_dataset(&config).unwrap().require_rows().unwrap();
    let path = DatasetFile::new(dataset.clone())
        .save_to_reports(&config.reports_dir)
        .unwrap();

    assert_eq!(latest_dataset(&config.reports_dir).unwrap(), Some(path.clone()));

    let loaded = DatasetFile::read_json(&path).unwrap();
    assert_eq!(loaded.columns, COLUMNS.to_vec());
    assert_eq!(loaded.rows, dataset);

    let (a, b) = (&loaded.rows.rows()[0], &dataset.rows()[0]);
    assert_eq!(a.current_series, vec![-333, -317, -1]);
    assert_eq!(a.voltage_series, vec![4012, 4012, 3999]);
    assert_eq!(a.average_power_watts.to_bits(), b.average_power_watts.to_bits());
    assert_eq!(
        a.microseconds_per_inference.to_bits(),
        b.microseconds_per_inference.to_bits()
    );
    assert_eq!(
        a.energy_per_inference_watt_hours.to_bits(),
        b.energy_per_inference_watt_hours.to_bits()
    );
}

#[test]
fn zero_duration_run_is_kept() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_timing(dir, "z.onnx", "20250101_120000", 1, 5.0, 0.0);
    write_power(dir, "z.onnx", "20250101_120000", &["volt=4000 current=-1000"]);

    let report = build_dataset(&config_for(dir)).unwrap();
    let rec = &report.dataset.rows()[0];
    assert_eq!(rec.total_duration_seconds, 0.0);
    assert!((rec.average_power_watts - 4.0).abs() < 1e-12);
}

#[test]
fn integrity_violations_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_timing(dir, "neg.onnx", "20250101_120000", 5, 5.0, -1.0);
    write_power(dir, "neg.onnx", "20250101_120000", &["volt=4000 current=-1"]);
    std::fs::write(
        dir.join("zero_20250101_120000_performance.csv"),
        format!("{HEADER}\nzero.onnx,20250101_120000,0,5.0,1.0\n"),
    )
    .unwrap();
    write_power(dir, "zero", "20250101_120000", &["volt=4000 current=-1"]);

    let report = build_dataset(&config_for(dir)).unwrap();
    assert_eq!(report.processed, 0);
    assert_eq!(report.skipped.len(), 2);
    assert!(
        report
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::NoTimingData)
    );
}

#[test]
fn current_only_mode_matches_strict_filter() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_timing(dir, "s.onnx", "20250101_120000", 1, 5.0, 1.0);
    write_power(
        dir,
        "s.onnx",
        "20250101_120000",
        &["volt=4000", "current=-100", "volt=3900 current=-50", "current=-20"],
    );

    let mut config = config_for(dir);
    let all = build_dataset(&config).unwrap().dataset;
    assert_eq!(all.rows()[0].current_series, vec![-100, -50, -20]);

    config.voltage_lines = VoltageLines::CurrentOnly;
    let strict = build_dataset(&config).unwrap().dataset;
    assert_eq!(strict.rows()[0].current_series, vec![-50, -20]);
    assert_eq!(strict.rows()[0].voltage_series, vec![3900, 3900]);
}
