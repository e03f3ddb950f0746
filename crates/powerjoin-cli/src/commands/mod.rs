pub mod inspect;
pub mod parse;

use std::path::PathBuf;

use powerjoin_core::{DatasetSummary, MeasurementRecord, PipelineConfig, VoltageLines};

/// Build the pipeline config: defaults, then the JSON file, then flags.
pub fn resolve_config(
    config_path: Option<&str>,
    measurements_dir: Option<&str>,
    reports_dir: Option<&str>,
    voltage_lines: Option<&str>,
) -> PipelineConfig {
    let mut config = match config_path {
        Some(path) => match PipelineConfig::from_json_path(&PathBuf::from(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                std::process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    if let Some(dir) = measurements_dir {
        config.measurements_dir = PathBuf::from(dir);
    }
    if let Some(dir) = reports_dir {
        config.reports_dir = PathBuf::from(dir);
    }
    if let Some(mode) = voltage_lines {
        config.voltage_lines = parse_voltage_lines(mode);
    }
    config
}

/// Parse a voltage-lines mode string into the enum.
pub fn parse_voltage_lines(s: &str) -> VoltageLines {
    match s {
        "all" => VoltageLines::All,
        "current-only" | "current_only" | "current" => VoltageLines::CurrentOnly,
        _ => {
            eprintln!("Unknown voltage-lines mode '{s}', using all");
            VoltageLines::All
        }
    }
}

pub fn print_summary(summary: &DatasetSummary) {
    println!(
        "  Shape:          {} rows × {} columns",
        summary.rows, summary.columns
    );
    println!("  Unique models:  {}", summary.unique_models);
    println!("  Samples:        {}", summary.total_samples);
    if let (Some(first), Some(last)) = (&summary.first_timestamp, &summary.last_timestamp) {
        println!("  Date range:     {first} to {last}");
    }
}

const TABLE_WIDTH: usize = 118;

/// Print rows as a fixed-width table. `limit == 0` prints everything.
pub fn print_rows(rows: &[MeasurementRecord], limit: usize) {
    let shown = if limit == 0 {
        rows.len()
    } else {
        limit.min(rows.len())
    };
    println!("{}", table_header());
    println!("{}", "-".repeat(TABLE_WIDTH));
    for row in &rows[..shown] {
        println!("{}", format_row(row));
    }
    if shown < rows.len() {
        println!("... {} more row(s)", rows.len() - shown);
    }
}

fn table_header() -> String {
    format!(
        "{:<40} {:<16} {:>8} {:>10} {:>10} {:>12} {:>10} {:>12}",
        "filename", "date_time", "samples", "avg_power", "iterations", "usperinf", "totalsec", "energy"
    )
}

fn format_row(r: &MeasurementRecord) -> String {
    format!(
        "{:<40} {:<16} {:>8} {:>10.4} {:>10} {:>12.2} {:>10.2} {:>12.4e}",
        truncate(&r.model_identity, 40),
        r.timestamp,
        r.sample_count(),
        r.average_power_watts,
        r.iteration_count,
        r.microseconds_per_inference,
        r.total_duration_seconds,
        r.energy_per_inference_watt_hours,
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
