#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Accident export loading and normalization logic.
//!
//! A [`dataset_def::DatasetDefinition`] describes where each field lives in
//! an export and how accident-type labels map to severities. The loader in
//! [`csv_load`] produces a raw table; the definition turns every row into
//! a [`crash_stats_source_models::NormalizedAccident`].

pub mod csv_load;
pub mod dataset_def;
pub mod parsing;
pub mod progress;
pub mod registry;
pub mod type_mapping;

/// Errors that can occur while loading or normalizing an export.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset definition TOML is malformed.
    #[error("Dataset definition error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required column is absent from the export header.
    #[error("Required column {column:?} is missing from the input")]
    MissingColumn {
        /// Header name that was expected.
        column: String,
    },

    /// The input has no header row.
    #[error("Input has no header row")]
    EmptyTable,
}
