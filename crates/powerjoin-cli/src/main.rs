//! CLI for powerjoin — turn benchmark runs and battery logs into an energy dataset.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "powerjoin")]
#[command(about = "powerjoin — per-inference energy from benchmark runs and battery logs")]
#[command(version = powerjoin_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join every *_performance.csv with its *_batterystats.txt and save the dataset
    Parse {
        /// Directory with timing files and battery logs (default: ./measurements/)
        #[arg(long)]
        measurements_dir: Option<String>,

        /// Directory for saved datasets (default: ./reports/)
        #[arg(long)]
        reports_dir: Option<String>,

        /// Write the dataset to this path instead of a timestamped file in the reports directory
        #[arg(long)]
        output: Option<String>,

        /// JSON config file; command-line flags take precedence
        #[arg(long)]
        config: Option<String>,

        /// Which battery-log lines update the carried-forward voltage
        #[arg(long, value_parser = ["all", "current-only"])]
        voltage_lines: Option<String>,

        /// Number of rows to print after saving
        #[arg(long, default_value = "3")]
        preview: usize,
    },

    /// Show a saved dataset (defaults to the most recent one in the reports directory)
    Inspect {
        /// Path to a dataset JSON file
        dataset: Option<String>,

        /// Directory searched for the most recent dataset
        #[arg(long, default_value = "reports")]
        reports_dir: String,

        /// Maximum rows to print (0 = all)
        #[arg(long, default_value = "0")]
        rows: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            measurements_dir,
            reports_dir,
            output,
            config,
            voltage_lines,
            preview,
        } => commands::parse::run(commands::parse::ParseCommandConfig {
            measurements_dir: measurements_dir.as_deref(),
            reports_dir: reports_dir.as_deref(),
            output_path: output.as_deref(),
            config_path: config.as_deref(),
            voltage_lines: voltage_lines.as_deref(),
            preview_rows: preview,
        }),
        Commands::Inspect {
            dataset,
            reports_dir,
            rows,
        } => commands::inspect::run(dataset.as_deref(), &reports_dir, rows),
    }
}
