#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw accident table types and the canonical normalized accident format.
//!
//! A loaded export is a [`RawTable`] of untyped string rows. The pipeline
//! turns every [`RawRecord`] into exactly one [`NormalizedAccident`] whose
//! severity belongs to the shared taxonomy in
//! [`crash_stats_accident_models`].

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use crash_stats_accident_models::{Severity, Weekday};
use serde::{Deserialize, Serialize};

/// One untransformed row of the source export, keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Returns the value of `column`, or `None` when the column is missing
    /// or the cell is empty.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A loaded export: the header row plus every data row.
///
/// The header is kept separately so that schema checks work even when the
/// export has no data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub records: Vec<RawRecord>,
}

impl RawTable {
    /// Returns `true` if `column` is one of the table headers.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A latitude/longitude pair in decimal degrees.
///
/// Coordinates are only ever extracted or discarded together, so a record
/// holds an `Option<Coordinates>` rather than two independent optionals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// An accident after temporal, categorical, and spatial normalization.
///
/// Every field except `severity` may be absent; rows are never dropped
/// during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAccident {
    /// Calendar date. `None` when the source date was missing or unparseable.
    pub date: Option<NaiveDate>,
    /// Weekday of `date`. `None` exactly when `date` is `None`.
    pub weekday: Option<Weekday>,
    /// Wall-clock time. `None` when no `H:MM:SS AM/PM` time was found.
    pub time_of_day: Option<NaiveTime>,
    /// Hour of day, 0-23. `None` exactly when `time_of_day` is `None`.
    pub hour: Option<u32>,
    /// The source accident-type label, unmodified.
    pub accident_type: Option<String>,
    /// Severity classified from `accident_type`.
    pub severity: Severity,
    /// Location, if the source carried a usable coordinate pair.
    pub coordinates: Option<Coordinates>,
}

impl NormalizedAccident {
    /// Latitude, if the record has coordinates.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude)
    }

    /// Longitude, if the record has coordinates.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude)
    }
}
