//! Dataset registry: the built-in dataset definition plus loading of
//! user-supplied definitions.
//!
//! The default `.toml` in `packages/source/datasets/` is baked into the
//! binary at compile time via [`include_str!`].

use std::path::Path;

use crate::SourceError;
use crate::dataset_def::{DatasetDefinition, parse_dataset_toml};

/// Identifier of the built-in dataset.
pub const DEFAULT_DATASET_ID: &str = "mdta";

/// TOML config embedded at compile time.
const DEFAULT_DATASET_TOML: &str = include_str!("../datasets/mdta.toml");

/// Returns the built-in dataset definition.
///
/// # Panics
///
/// Panics if the embedded TOML config is malformed (this is a compile-time
/// guarantee since the config is embedded).
#[must_use]
pub fn default_dataset() -> DatasetDefinition {
    parse_dataset_toml(DEFAULT_DATASET_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse {DEFAULT_DATASET_ID}.toml: {e}"))
}

/// Loads the dataset definition at `path`, or the built-in one when `path`
/// is `None`.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read, or
/// [`SourceError::Toml`] if it is not a valid dataset definition.
pub fn load_dataset(path: Option<&Path>) -> Result<DatasetDefinition, SourceError> {
    let Some(path) = path else {
        return Ok(default_dataset());
    };

    log::info!("Loading dataset definition from {}", path.display());
    let toml_str = std::fs::read_to_string(path)?;
    parse_dataset_toml(&toml_str)
}
