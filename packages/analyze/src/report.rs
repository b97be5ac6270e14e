//! Report collaborator: console key statistics and on-disk artifacts.
//!
//! [`render_key_statistics`] formats the text report printed after a run.
//! [`write_artifacts`] writes the summary JSON files, the optional heatmap
//! grid, and the normalized table as CSV into an output directory, which is
//! created on demand.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crash_stats_accident_models::{Severity, Weekday};
use crash_stats_analytics::summaries::severity_distribution;
use crash_stats_analytics_models::{
    HOURS_PER_DAY, SeverityShare, SpatialDensity, SummaryEntry,
};
use crash_stats_source_models::NormalizedAccident;
use serde::Serialize;

use crate::PipelineOutput;

/// Per-type counts, significant types, and the peak type.
pub const ACCIDENT_TYPES_FILE: &str = "accident_types.json";
/// Counts for hours 0-23 and the peak hour.
pub const ACCIDENTS_BY_HOUR_FILE: &str = "accidents_by_hour.json";
/// Counts for Monday through Sunday and the peak day.
pub const ACCIDENTS_BY_DAY_FILE: &str = "accidents_by_day.json";
/// Severity counts and percentages of classified records.
pub const ACCIDENT_SEVERITY_FILE: &str = "accident_severity.json";
/// Density grid; only written when enough coordinates were valid.
pub const ACCIDENT_HEATMAP_FILE: &str = "accident_heatmap.json";
/// The normalized table, one row per input record.
pub const NORMALIZED_ACCIDENTS_FILE: &str = "normalized_accidents.csv";

/// Errors that can occur while writing report artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Creating the directory or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ── Console report ───────────────────────────────────────────────────────

/// Formats the key statistics of a run: totals, per-type counts, peaks,
/// the severity distribution, and data quality.
///
/// # Panics
///
/// Does not panic; writing to a `String` is infallible.
#[must_use]
pub fn render_key_statistics(output: &PipelineOutput, min_type_count: u64) -> String {
    let summaries = &output.summaries;
    let mut out = String::new();

    writeln!(out, "Key Statistics:").unwrap();
    writeln!(out, "Total number of accidents: {}", output.accidents.len()).unwrap();

    writeln!(out).unwrap();
    writeln!(out, "Accidents by type:").unwrap();
    for entry in summaries.accident_type.by_count_desc() {
        writeln!(out, "  {:<30} {}", entry.key, entry.count).unwrap();
    }
    let significant = summaries.accident_type.significant(min_type_count);
    writeln!(
        out,
        "  ({} type(s) with more than {min_type_count} accidents)",
        significant.len()
    )
    .unwrap();

    writeln!(out).unwrap();
    writeln!(
        out,
        "Peak hour: {}",
        summaries
            .hour
            .peak
            .map_or_else(|| "n/a".to_string(), |h| format!("{h}:00"))
    )
    .unwrap();
    writeln!(out, "Peak day: {}", display_or_na(summaries.weekday.peak)).unwrap();
    writeln!(
        out,
        "Most common severity: {}",
        display_or_na(summaries.severity.peak)
    )
    .unwrap();

    writeln!(out).unwrap();
    writeln!(out, "Accident severity distribution:").unwrap();
    for share in severity_distribution(&summaries.severity) {
        match share.percent {
            Some(percent) => {
                writeln!(
                    out,
                    "  {:<22} {:>6} ({percent:.1}%)",
                    share.severity.as_ref(),
                    share.count
                )
                .unwrap();
            }
            None => {
                writeln!(
                    out,
                    "  {:<22} {:>6}",
                    share.severity.as_ref(),
                    share.count
                )
                .unwrap();
            }
        }
    }

    let quality = &output.quality;
    writeln!(out).unwrap();
    writeln!(out, "Data quality:").unwrap();
    writeln!(out, "  Unparseable dates:        {}", quality.without_date).unwrap();
    writeln!(out, "  Unparseable times:        {}", quality.without_hour).unwrap();
    writeln!(out, "  Unclassified types:       {}", quality.unclassified).unwrap();
    writeln!(
        out,
        "  Rows without coordinates: {}",
        quality.without_coordinates
    )
    .unwrap();

    out
}

fn display_or_na<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

// ── Artifacts ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccidentTypesArtifact<'a> {
    min_count: u64,
    counts: Vec<&'a SummaryEntry<String>>,
    significant: Vec<&'a SummaryEntry<String>>,
    peak: Option<&'a str>,
    excluded: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HourArtifact {
    counts: [u64; HOURS_PER_DAY],
    peak: Option<u32>,
    excluded: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeverityArtifact {
    shares: Vec<SeverityShare>,
    peak: Option<Severity>,
}

/// One row of the normalized table as written to CSV.
#[derive(Serialize)]
struct NormalizedRow<'a> {
    date: Option<String>,
    weekday: Option<Weekday>,
    time: Option<String>,
    hour: Option<u32>,
    accident_type: Option<&'a str>,
    severity: Severity,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl<'a> From<&'a NormalizedAccident> for NormalizedRow<'a> {
    fn from(accident: &'a NormalizedAccident) -> Self {
        Self {
            date: accident.date.map(|d| d.format("%Y-%m-%d").to_string()),
            weekday: accident.weekday,
            time: accident.time_of_day.map(|t| t.format("%H:%M:%S").to_string()),
            hour: accident.hour,
            accident_type: accident.accident_type.as_deref(),
            severity: accident.severity,
            latitude: accident.latitude(),
            longitude: accident.longitude(),
        }
    }
}

/// Writes every artifact of `output` into `output_dir` and returns the
/// paths written.
///
/// The heatmap file is only written when a density grid was computed.
///
/// # Errors
///
/// Returns [`ReportError`] if the directory cannot be created or any file
/// cannot be serialized or written.
pub fn write_artifacts(
    output_dir: &Path,
    output: &PipelineOutput,
    min_type_count: u64,
) -> Result<Vec<PathBuf>, ReportError> {
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
        log::info!("Created directory: {}", output_dir.display());
    }

    let summaries = &output.summaries;
    let mut written = Vec::new();

    let types = AccidentTypesArtifact {
        min_count: min_type_count,
        counts: summaries.accident_type.by_count_desc(),
        significant: summaries.accident_type.significant(min_type_count),
        peak: summaries.accident_type.peak.as_deref(),
        excluded: summaries.accident_type.excluded,
    };
    written.push(write_json(output_dir, ACCIDENT_TYPES_FILE, &types)?);

    let hours = HourArtifact {
        counts: summaries.hour.hour_axis(),
        peak: summaries.hour.peak,
        excluded: summaries.hour.excluded,
    };
    written.push(write_json(output_dir, ACCIDENTS_BY_HOUR_FILE, &hours)?);

    written.push(write_json(
        output_dir,
        ACCIDENTS_BY_DAY_FILE,
        &summaries.weekday,
    )?);

    let severity = SeverityArtifact {
        shares: severity_distribution(&summaries.severity),
        peak: summaries.severity.peak,
    };
    written.push(write_json(output_dir, ACCIDENT_SEVERITY_FILE, &severity)?);

    match &output.spatial {
        SpatialDensity::Grid(grid) => {
            written.push(write_json(output_dir, ACCIDENT_HEATMAP_FILE, grid)?);
        }
        SpatialDensity::Insufficient { valid, required } => {
            log::info!(
                "Not enough valid coordinates for a heatmap ({valid} of {required} required)"
            );
        }
    }

    written.push(write_normalized_csv(
        &output_dir.join(NORMALIZED_ACCIDENTS_FILE),
        &output.accidents,
    )?);

    log::info!(
        "Wrote {} artifact(s) to {}",
        written.len(),
        output_dir.display()
    );

    Ok(written)
}

fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json)?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}

fn write_normalized_csv(
    path: &Path,
    accidents: &[NormalizedAccident],
) -> Result<PathBuf, ReportError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    for accident in accidents {
        writer.serialize(NormalizedRow::from(accident))?;
    }
    writer.flush()?;
    log::debug!("Wrote {} rows to {}", accidents.len(), path.display());
    Ok(path.to_path_buf())
}
