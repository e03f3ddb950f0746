//! `powerjoin inspect` — show a saved dataset.

use std::path::{Path, PathBuf};

use powerjoin_core::{DatasetFile, latest_dataset};

/// Run the inspect command.
pub fn run(dataset_path: Option<&str>, reports_dir: &str, rows: usize) {
    let path = match dataset_path {
        Some(p) => PathBuf::from(p),
        None => match latest_dataset(Path::new(reports_dir)) {
            Ok(Some(p)) => p,
            Ok(None) => {
                println!("No datasets found in {reports_dir}/");
                println!("Build one first: powerjoin parse --measurements-dir <dir>");
                return;
            }
            Err(e) => {
                eprintln!("Failed to read {reports_dir}: {e}");
                std::process::exit(1);
            }
        },
    };

    let file = match DatasetFile::read_json(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to load dataset: {e}");
            std::process::exit(1);
        }
    };

    println!("Dataset: {}", path.display());
    println!("  Created:        {}", file.created_at);
    println!("  Format:         v{} (powerjoin {})", file.version, file.powerjoin_version);
    println!("  Columns:        {}", file.columns.join(", "));
    super::print_summary(&file.rows.summary());
    println!();
    super::print_rows(file.rows.rows(), rows);
}
