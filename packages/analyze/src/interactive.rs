#![allow(clippy::module_name_repetitions)]

//! Interactive TUI for the accident analysis tool.
//!
//! Provides a menu-driven interface using `dialoguer` for running the
//! analysis without memorizing CLI flags.

use std::path::PathBuf;

use crash_stats_cli_utils::{IndicatifProgress, MultiProgress};
use crash_stats_source::registry::load_dataset;
use dialoguer::{Confirm, Input, Select};

use crate::{AnalyzeRequest, DEFAULT_MIN_TYPE_COUNT};

/// Top-level actions available in the interactive menu.
enum AnalyzeAction {
    Analyze,
    ListAliases,
    ShowColumns,
}

impl AnalyzeAction {
    const ALL: &[Self] = &[Self::Analyze, Self::ListAliases, Self::ShowColumns];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Analyze => "Analyze an accident CSV",
            Self::ListAliases => "List severity aliases",
            Self::ShowColumns => "Show expected columns",
        }
    }
}

/// Runs the interactive menu, prompting the user to select and configure
/// an operation.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = AnalyzeAction::ALL.iter().map(AnalyzeAction::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let dataset_path = prompt_optional_path("Dataset definition TOML (empty for built-in)")?;

    match AnalyzeAction::ALL[idx] {
        AnalyzeAction::Analyze => analyze(multi, dataset_path)?,
        AnalyzeAction::ListAliases => {
            crate::print_aliases(&load_dataset(dataset_path.as_deref())?);
        }
        AnalyzeAction::ShowColumns => {
            let csv_path = prompt_optional_path("CSV to check (empty to skip)")?;
            crate::print_columns(
                &load_dataset(dataset_path.as_deref())?,
                csv_path.as_deref(),
            )?;
        }
    }

    Ok(())
}

/// Prompts for the input CSV, output directory, and type threshold, then
/// runs the analysis.
fn analyze(
    multi: &MultiProgress,
    dataset_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let csv_path: String = Input::new()
        .with_prompt("Path to accident CSV")
        .interact_text()?;

    let output_dir = if Confirm::new()
        .with_prompt("Write summary artifacts?")
        .default(true)
        .interact()?
    {
        let dir: String = Input::new()
            .with_prompt("Output directory")
            .default("accident_analysis".to_string())
            .interact_text()?;
        Some(PathBuf::from(dir.trim()))
    } else {
        None
    };

    let min_type_count_str: String = Input::new()
        .with_prompt("Minimum records for a significant accident type")
        .default(DEFAULT_MIN_TYPE_COUNT.to_string())
        .interact_text()?;

    let request = AnalyzeRequest {
        csv_path: PathBuf::from(csv_path.trim()),
        output_dir,
        dataset_path,
        min_type_count: min_type_count_str.trim().parse()?,
    };

    let progress = IndicatifProgress::records_bar(multi, "Normalizing records");
    crate::execute(&request, &progress)?;

    Ok(())
}

/// Prompts the user for an optional path. Returns `None` if the input is
/// empty.
fn prompt_optional_path(prompt: &str) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(trimmed)))
    }
}
