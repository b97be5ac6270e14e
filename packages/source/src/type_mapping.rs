//! Accident type mapping utilities.
//!
//! Maps free-text and abbreviated accident-type labels onto the canonical
//! [`Severity`] taxonomy through an exact-match alias table. The table is
//! plain configuration: datasets declare their own aliases in TOML, and
//! the built-in default covers the labels seen in MDTA exports.

use std::collections::BTreeMap;

use crash_stats_accident_models::Severity;
use serde::{Deserialize, Serialize};

/// Aliases used when a dataset does not declare its own table.
const DEFAULT_ALIASES: &[(&str, Severity)] = &[
    ("Property Damage Crash", Severity::PropertyDamageOnly),
    ("PD", Severity::PropertyDamageOnly),
    ("pd", Severity::PropertyDamageOnly),
    ("Injury Crash", Severity::Injury),
    ("PI", Severity::Injury),
    ("Fatal Crash", Severity::Fatal),
    ("F", Severity::Fatal),
];

/// Exact-match lookup table from accident-type label to [`Severity`].
///
/// Matching is case-sensitive with no trimming or fuzzy matching; `"pd"`
/// only matches because it is listed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityAliases {
    aliases: BTreeMap<String, Severity>,
}

impl SeverityAliases {
    /// Creates an alias table from `(label, severity)` pairs.
    #[must_use]
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (S, Severity)>,
        S: Into<String>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(label, severity)| (label.into(), severity))
                .collect(),
        }
    }

    /// Adds or replaces an alias.
    pub fn insert(&mut self, label: impl Into<String>, severity: Severity) {
        self.aliases.insert(label.into(), severity);
    }

    /// Classifies an accident-type label.
    ///
    /// Returns [`Severity::Unclassified`] for missing labels and for labels
    /// not present in the table.
    #[must_use]
    pub fn classify(&self, label: Option<&str>) -> Severity {
        label
            .and_then(|l| self.aliases.get(l))
            .copied()
            .unwrap_or(Severity::Unclassified)
    }

    /// Iterates over `(label, severity)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.aliases.iter().map(|(label, s)| (label.as_str(), *s))
    }

    /// Number of aliases in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if the table has no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for SeverityAliases {
    fn default() -> Self {
        Self::new(DEFAULT_ALIASES.iter().copied())
    }
}
