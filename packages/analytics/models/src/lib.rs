#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate summary types produced by the accident analytics.
//!
//! A [`Summary`] is a count per key plus a designated peak key. The four
//! summaries of a pipeline run are grouped in [`Summaries`]; spatial data
//! for heatmap rendering is described by [`SpatialDensity`].

use crash_stats_accident_models::{Severity, Weekday};
use serde::{Deserialize, Serialize};

/// Number of hours in the hour-of-day axis.
pub const HOURS_PER_DAY: usize = 24;

/// One key and its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry<K> {
    /// The categorical key.
    pub key: K,
    /// Number of records with this key.
    pub count: u64,
}

/// Frequency distribution over one categorical key.
///
/// Computed once per pipeline run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary<K> {
    /// Counts, in the summary's presentation order.
    pub entries: Vec<SummaryEntry<K>>,
    /// Key with the maximum count; ties go to the key observed first in the
    /// record sequence. `None` when nothing was counted.
    pub peak: Option<K>,
    /// Records skipped because their key was null.
    pub excluded: u64,
}

impl<K> Summary<K> {
    /// Sum of all counts (excluded records not included).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Returns `true` if no record was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Entries with strictly more than `min_count` records, in presentation
    /// order.
    #[must_use]
    pub fn significant(&self, min_count: u64) -> Vec<&SummaryEntry<K>> {
        self.entries.iter().filter(|e| e.count > min_count).collect()
    }

    /// Entries sorted by descending count. Equal counts keep presentation
    /// order.
    #[must_use]
    pub fn by_count_desc(&self) -> Vec<&SummaryEntry<K>> {
        let mut sorted: Vec<&SummaryEntry<K>> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }
}

impl<K: PartialEq> Summary<K> {
    /// Count for `key`, zero if absent.
    #[must_use]
    pub fn count(&self, key: &K) -> u64 {
        self.entries
            .iter()
            .find(|e| e.key == *key)
            .map_or(0, |e| e.count)
    }
}

impl Summary<u32> {
    /// Counts for hours 0-23, zero-filled for unobserved hours.
    #[must_use]
    pub fn hour_axis(&self) -> [u64; HOURS_PER_DAY] {
        let mut axis = [0; HOURS_PER_DAY];
        for entry in &self.entries {
            if let Some(slot) = usize::try_from(entry.key)
                .ok()
                .and_then(|h| axis.get_mut(h))
            {
                *slot = entry.count;
            }
        }
        axis
    }
}

/// The four summaries computed by every pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summaries {
    /// Counts per raw accident-type label, first-observed order.
    pub accident_type: Summary<String>,
    /// Counts per observed hour of day, ascending hour order.
    pub hour: Summary<u32>,
    /// Counts for all seven weekdays, Monday through Sunday.
    pub weekday: Summary<Weekday>,
    /// Counts per severity, first-observed order.
    pub severity: Summary<Severity>,
}

/// One slice of the severity distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityShare {
    /// The severity.
    pub severity: Severity,
    /// Number of records with this severity.
    pub count: u64,
    /// Percentage of classified records. `None` for
    /// [`Severity::Unclassified`], which is outside the denominator.
    pub percent: Option<f64>,
}

/// Two-dimensional histogram of accident locations.
///
/// `counts[row][col]` counts points whose latitude falls in bin `row` and
/// whose longitude falls in bin `col`; the last bin on each axis is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityGrid {
    /// Bins per axis.
    pub bins: usize,
    /// Smallest longitude among the points.
    pub min_longitude: f64,
    /// Largest longitude among the points.
    pub max_longitude: f64,
    /// Smallest latitude among the points.
    pub min_latitude: f64,
    /// Largest latitude among the points.
    pub max_latitude: f64,
    /// Point counts, indexed `[latitude bin][longitude bin]`.
    pub counts: Vec<Vec<u64>>,
}

impl DensityGrid {
    /// Total number of binned points.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

/// Outcome of spatial density computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpatialDensity {
    /// Enough valid coordinates were present to bin.
    Grid(DensityGrid),
    /// Too few valid coordinates; rendering should be skipped.
    Insufficient {
        /// Rows with a valid coordinate pair.
        valid: usize,
        /// Minimum rows needed.
        required: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(entries: &[(&str, u64)]) -> Summary<String> {
        Summary {
            entries: entries
                .iter()
                .map(|(k, c)| SummaryEntry {
                    key: (*k).to_string(),
                    count: *c,
                })
                .collect(),
            peak: None,
            excluded: 0,
        }
    }

    #[test]
    fn significant_is_strictly_greater() {
        let s = summary(&[("PD", 11), ("PI", 10), ("F", 3)]);
        let keys: Vec<&str> = s.significant(10).iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["PD"]);
    }

    #[test]
    fn count_order_is_stable() {
        let s = summary(&[("PI", 2), ("PD", 5), ("F", 2)]);
        let keys: Vec<&str> = s.by_count_desc().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["PD", "PI", "F"]);
    }

    #[test]
    fn count_and_total() {
        let s = summary(&[("PD", 5), ("F", 2)]);
        assert_eq!(s.total(), 7);
        assert_eq!(s.count(&"F".to_string()), 2);
        assert_eq!(s.count(&"PI".to_string()), 0);
        assert!(!s.is_empty());
    }

    #[test]
    fn hour_axis_zero_fills() {
        let s = Summary {
            entries: vec![
                SummaryEntry { key: 0, count: 2 },
                SummaryEntry { key: 19, count: 4 },
            ],
            peak: Some(19),
            excluded: 1,
        };
        let axis = s.hour_axis();
        assert_eq!(axis.len(), 24);
        assert_eq!(axis[0], 2);
        assert_eq!(axis[19], 4);
        assert_eq!(axis.iter().sum::<u64>(), 6);
    }
}
