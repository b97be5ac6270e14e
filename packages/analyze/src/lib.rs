#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic-accident analysis pipeline.
//!
//! [`run`] normalizes every row of a raw export with a
//! [`DatasetDefinition`], then computes the type, hour, weekday, and
//! severity summaries plus the spatial density used for heatmaps. The
//! [`report`] module turns a [`PipelineOutput`] into a console report and
//! on-disk artifacts.

pub mod interactive;
pub mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crash_stats_analytics::spatial::spatial_density;
use crash_stats_analytics::summaries::summarize;
use crash_stats_analytics_models::{SpatialDensity, Summaries};
use crash_stats_source::SourceError;
use crash_stats_source::csv_load::load_table;
use crash_stats_source::dataset_def::{DataQuality, DatasetDefinition};
use crash_stats_source::progress::ProgressCallback;
use crash_stats_source::registry::load_dataset;
use crash_stats_source_models::{NormalizedAccident, RawTable};

/// Accident types need strictly more than this many records to be listed
/// as significant.
pub const DEFAULT_MIN_TYPE_COUNT: u64 = 10;

/// Everything computed by one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// One normalized record per input row, in input order.
    pub accidents: Vec<NormalizedAccident>,
    /// Type, hour, weekday, and severity summaries.
    pub summaries: Summaries,
    /// Counts of fields that degraded during normalization.
    pub quality: DataQuality,
    /// Heatmap grid, or the reason there is none.
    pub spatial: SpatialDensity,
}

/// Runs the full pipeline over an already-loaded table.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if the table lacks the date, time,
/// or accident-type column named by `dataset`.
pub fn run(
    dataset: &DatasetDefinition,
    table: &RawTable,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineOutput, SourceError> {
    let start = Instant::now();

    let accidents = dataset.normalize_table(table, progress)?;
    let summaries = summarize(&accidents);
    let quality = DataQuality::tally(&accidents);
    let spatial = spatial_density(&accidents);

    log::info!(
        "[{}] Pipeline complete: {} records in {:.2}s",
        dataset.id(),
        accidents.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(PipelineOutput {
        accidents,
        summaries,
        quality,
        spatial,
    })
}

/// Loads the CSV at `path` and runs the pipeline over it.
///
/// # Errors
///
/// Returns [`SourceError::Io`] or [`SourceError::Csv`] if the file cannot
/// be read as a table, [`SourceError::EmptyTable`] if it has no header, and
/// [`SourceError::MissingColumn`] if a required column is absent.
pub fn analyze_file(
    path: &Path,
    dataset: &DatasetDefinition,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineOutput, SourceError> {
    let table = load_table(path)?;
    run(dataset, &table, progress)
}

// ── Commands ─────────────────────────────────────────────────────────────

/// Parameters of one `analyze` invocation, from flags or interactive
/// prompts.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// CSV export to analyze.
    pub csv_path: PathBuf,
    /// Directory for artifacts. Nothing is written when `None`.
    pub output_dir: Option<PathBuf>,
    /// Dataset definition TOML. The built-in definition when `None`.
    pub dataset_path: Option<PathBuf>,
    /// Threshold for listing an accident type as significant.
    pub min_type_count: u64,
}

/// Runs an `analyze` request end to end: loads the dataset definition and
/// CSV, runs the pipeline, prints the key statistics, and writes artifacts
/// when an output directory was given.
///
/// # Errors
///
/// Returns an error if the dataset definition or CSV cannot be loaded, a
/// required column is missing, or artifacts cannot be written.
pub fn execute(
    request: &AnalyzeRequest,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineOutput, Box<dyn std::error::Error>> {
    let dataset = load_dataset(request.dataset_path.as_deref())?;
    let output = analyze_file(&request.csv_path, &dataset, progress)?;

    println!(
        "{}",
        report::render_key_statistics(&output, request.min_type_count)
    );

    if let Some(dir) = &request.output_dir {
        report::write_artifacts(dir, &output, request.min_type_count)?;
        log::info!("Analysis complete! Results saved to {}", dir.display());
    }

    Ok(output)
}

/// Prints the alias table of `dataset`.
pub fn print_aliases(dataset: &DatasetDefinition) {
    println!("{:<30} SEVERITY", "ALIAS");
    println!("{}", "-".repeat(50));
    for (alias, severity) in dataset.severity_aliases.iter() {
        println!("{alias:<30} {severity}");
    }
}

/// Prints the column mapping of `dataset`. When `csv_path` is given, also
/// checks the export's header against it.
///
/// # Errors
///
/// Returns an error if the CSV cannot be loaded or lacks a required column.
pub fn print_columns(
    dataset: &DatasetDefinition,
    csv_path: Option<&Path>,
) -> Result<(), SourceError> {
    let columns = &dataset.columns;
    println!("{} ({})", dataset.name(), dataset.id());
    println!("{:<16} COLUMN", "FIELD");
    println!("{}", "-".repeat(50));
    println!("{:<16} {}", "date", columns.date);
    println!("{:<16} {}", "time", columns.time);
    println!("{:<16} {}", "accident_type", columns.accident_type);
    println!(
        "{:<16} {}",
        "coordinates",
        columns.coordinates.as_deref().unwrap_or("(none)")
    );

    if let Some(path) = csv_path {
        let table = load_table(path)?;
        dataset.validate_schema(&table)?;
        println!("\n{} has every required column.", path.display());
    }

    Ok(())
}
