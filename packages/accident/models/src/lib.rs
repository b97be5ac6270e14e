#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident severity taxonomy and calendar types.
//!
//! This crate defines the closed severity taxonomy that every free-text
//! accident-type label is classified into, plus the weekday axis used by
//! the temporal summaries.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of a traffic accident.
///
/// Labels that do not match any configured alias are
/// [`Severity::Unclassified`] rather than an error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Severity {
    /// Vehicle or property damage with no reported injuries
    #[serde(rename = "Property Damage Only")]
    #[strum(serialize = "Property Damage Only")]
    PropertyDamageOnly,
    /// At least one person injured
    #[serde(rename = "Injury")]
    #[strum(serialize = "Injury")]
    Injury,
    /// At least one fatality
    #[serde(rename = "Fatal")]
    #[strum(serialize = "Fatal")]
    Fatal,
    /// Label not present in the alias table
    #[serde(rename = "Unclassified")]
    #[strum(serialize = "Unclassified")]
    Unclassified,
}

impl Severity {
    /// Returns `true` for every severity except [`Severity::Unclassified`].
    #[must_use]
    pub const fn is_classified(self) -> bool {
        !matches!(self, Self::Unclassified)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::PropertyDamageOnly,
            Self::Injury,
            Self::Fatal,
            Self::Unclassified,
        ]
    }
}

/// Day of the week, ordered Monday through Sunday.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Returns all seven days in calendar order, Monday first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn severity_labels_match_taxonomy() {
        let labels: Vec<String> = Severity::all().iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            ["Property Damage Only", "Injury", "Fatal", "Unclassified"]
        );
    }

    #[test]
    fn severity_parses_from_label() {
        assert_eq!(
            Severity::from_str("Property Damage Only").unwrap(),
            Severity::PropertyDamageOnly
        );
        assert!(Severity::from_str("PD").is_err());
    }

    #[test]
    fn only_unclassified_is_unclassified() {
        for severity in Severity::all() {
            assert_eq!(
                severity.is_classified(),
                *severity != Severity::Unclassified,
                "{severity:?}"
            );
        }
    }

    #[test]
    fn weekdays_in_calendar_order() {
        let days = Weekday::all();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], Weekday::Monday);
        assert_eq!(days[6], Weekday::Sunday);
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn converts_chrono_weekday() {
        assert_eq!(Weekday::from(chrono::Weekday::Fri), Weekday::Friday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun).to_string(), "Sunday");
    }
}
