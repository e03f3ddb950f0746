//! `powerjoin parse` — build and save the measurement dataset.

use std::path::PathBuf;

use powerjoin_core::{DatasetFile, build_dataset};

pub struct ParseCommandConfig<'a> {
    pub measurements_dir: Option<&'a str>,
    pub reports_dir: Option<&'a str>,
    pub output_path: Option<&'a str>,
    pub config_path: Option<&'a str>,
    pub voltage_lines: Option<&'a str>,
    pub preview_rows: usize,
}

/// Run the parse command.
pub fn run(cmd: ParseCommandConfig<'_>) {
    let config = super::resolve_config(
        cmd.config_path,
        cmd.measurements_dir,
        cmd.reports_dir,
        cmd.voltage_lines,
    );

    println!("{}", "=".repeat(60));
    println!("Measurement data parser");
    println!("{}", "=".repeat(60));
    println!("  Measurements: {}", config.measurements_dir.display());
    println!("  Voltage:      carried forward from {} lines", config.voltage_lines);
    println!();

    let report = match build_dataset(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Processed: {}, Skipped: {} (of {} timing file(s))",
        report.processed,
        report.skipped.len(),
        report.total()
    );
    for skipped in &report.skipped {
        let name = skipped
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        eprintln!("  skipped ({}): {name}", skipped.reason);
    }

    let dataset = match report.require_rows() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("\nNo data to save: {e}");
            std::process::exit(1);
        }
    };
    let summary = dataset.summary();
    let file = DatasetFile::new(dataset);

    let saved = match cmd.output_path {
        Some(path) => {
            let path = PathBuf::from(path);
            file.write_json(&path).map(|()| path)
        }
        None => file.save_to_reports(&config.reports_dir),
    };
    let path = match saved {
        Ok(p) => p,
        Err(e) => {
            eprintln!("\nError saving dataset: {e}");
            std::process::exit(1);
        }
    };

    println!("\nDataset saved to: {}", path.display());
    super::print_summary(&summary);

    if cmd.preview_rows > 0 {
        println!("\nSample data (first {} row(s)):", cmd.preview_rows);
        super::print_rows(file.rows.rows(), cmd.preview_rows);
    }
}
