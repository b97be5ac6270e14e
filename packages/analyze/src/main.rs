#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the accident analysis tool.
//!
//! Uses `indicatif-log-bridge` (via [`crash_stats_cli_utils::init_logger`])
//! so log output and progress bars do not interfere with each other.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crash_stats_analyze::{AnalyzeRequest, DEFAULT_MIN_TYPE_COUNT};
use crash_stats_cli_utils::IndicatifProgress;
use crash_stats_source::registry::load_dataset;

#[derive(Parser)]
#[command(name = "crash_stats_analyze", about = "Traffic accident analysis tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an accident CSV and report summary statistics
    Analyze {
        /// Path to the accident CSV export
        csv: PathBuf,
        /// Directory to write summary artifacts to (created if missing)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Dataset definition TOML (defaults to the built-in `mdta` definition)
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Accident types need more than this many records to be significant
        #[arg(long, default_value_t = DEFAULT_MIN_TYPE_COUNT)]
        min_type_count: u64,
    },
    /// List the accident-type aliases and the severity each maps to
    Aliases {
        /// Dataset definition TOML (defaults to the built-in `mdta` definition)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Show the columns the dataset expects, optionally checking a CSV header
    Columns {
        /// Dataset definition TOML (defaults to the built-in `mdta` definition)
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// CSV export whose header should be checked
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crash_stats_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return crash_stats_analyze::interactive::run(&multi);
    };

    match command {
        Commands::Analyze {
            csv,
            output_dir,
            dataset,
            min_type_count,
        } => {
            let request = AnalyzeRequest {
                csv_path: csv,
                output_dir,
                dataset_path: dataset,
                min_type_count,
            };
            let progress = IndicatifProgress::records_bar(&multi, "Normalizing records");
            crash_stats_analyze::execute(&request, &progress)?;
        }
        Commands::Aliases { dataset } => {
            crash_stats_analyze::print_aliases(&load_dataset(dataset.as_deref())?);
        }
        Commands::Columns { dataset, csv } => {
            crash_stats_analyze::print_columns(
                &load_dataset(dataset.as_deref())?,
                csv.as_deref(),
            )?;
        }
    }

    Ok(())
}
