//! Per-run accident summaries.
//!
//! Builds the accident-type, hour, weekday, and severity [`Summary`]s from
//! a normalized record set in one reduction pass, and derives the severity
//! distribution from the severity summary.

use crash_stats_accident_models::{Severity, Weekday};
use crash_stats_analytics_models::{SeverityShare, Summaries, Summary};
use crash_stats_source_models::NormalizedAccident;

use crate::tally::{KeyOrder, Tally};

/// Accumulates all four summaries over a record sequence.
///
/// Accumulators over disjoint slices can be [`merged`](Self::merge) as long
/// as each record is observed with its index in the full sequence.
#[derive(Debug, Clone, Default)]
pub struct SummaryAccumulator {
    accident_type: Tally<String>,
    hour: Tally<u32>,
    weekday: Tally<Weekday>,
    severity: Tally<Severity>,
}

impl SummaryAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one accident found at `position` in the record sequence.
    pub fn observe(&mut self, position: usize, accident: &NormalizedAccident) {
        self.accident_type
            .observe(position, accident.accident_type.clone());
        self.hour.observe(position, accident.hour);
        self.weekday.observe(position, accident.weekday);
        self.severity.observe(position, Some(accident.severity));
    }

    /// Folds another accumulator into this one.
    pub fn merge(&mut self, other: Self) {
        self.accident_type.merge(other.accident_type);
        self.hour.merge(other.hour);
        self.weekday.merge(other.weekday);
        self.severity.merge(other.severity);
    }

    /// Finishes all four summaries.
    #[must_use]
    pub fn finish(self) -> Summaries {
        Summaries {
            accident_type: self.accident_type.into_summary(KeyOrder::FirstSeen),
            hour: self.hour.into_summary(KeyOrder::Key),
            weekday: self.weekday.into_calendar_summary(),
            severity: self.severity.into_summary(KeyOrder::FirstSeen),
        }
    }
}

/// Computes all four summaries over `accidents`.
#[must_use]
pub fn summarize(accidents: &[NormalizedAccident]) -> Summaries {
    let mut acc = SummaryAccumulator::new();
    for (position, accident) in accidents.iter().enumerate() {
        acc.observe(position, accident);
    }
    let summaries = acc.finish();

    log::debug!(
        "Summarized {} records: {} accident types, {} hours observed, peak weekday {:?}",
        accidents.len(),
        summaries.accident_type.entries.len(),
        summaries.hour.entries.len(),
        summaries.weekday.peak,
    );

    summaries
}

/// Share of each severity in `summary`.
///
/// Percentages are taken over classified records only: the
/// [`Severity::Unclassified`] entry keeps its count but has no percentage
/// and does not enlarge the denominator.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn severity_distribution(summary: &Summary<Severity>) -> Vec<SeverityShare> {
    let classified: u64 = summary
        .entries
        .iter()
        .filter(|e| e.key.is_classified())
        .map(|e| e.count)
        .sum();

    summary
        .entries
        .iter()
        .map(|e| SeverityShare {
            severity: e.key,
            count: e.count,
            percent: (e.key.is_classified() && classified > 0)
                .then(|| e.count as f64 * 100.0 / classified as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Timelike as _};
    use crash_stats_source_models::Coordinates;

    use super::*;

    fn accident(
        date: Option<(i32, u32, u32)>,
        hour: Option<u32>,
        accident_type: Option<&str>,
        severity: Severity,
    ) -> NormalizedAccident {
        let date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        let time_of_day = hour.and_then(|h| NaiveTime::from_hms_opt(h, 0, 0));
        NormalizedAccident {
            date,
            weekday: date.map(|d| Weekday::from(chrono::Datelike::weekday(&d))),
            time_of_day,
            hour: time_of_day.map(|t| t.hour()),
            accident_type: accident_type.map(String::from),
            severity,
            coordinates: None,
        }
    }

    fn scenario() -> Vec<NormalizedAccident> {
        let mut first = accident(
            Some((2019, 4, 12)),
            Some(19),
            Some("PD"),
            Severity::PropertyDamageOnly,
        );
        first.coordinates = Some(Coordinates {
            latitude: 39.30,
            longitude: -76.61,
        });
        vec![
            first,
            accident(
                Some((2019, 4, 13)),
                Some(11),
                Some("Fatal Crash"),
                Severity::Fatal,
            ),
        ]
    }

    #[test]
    fn end_to_end_severity_summary() {
        let summaries = summarize(&scenario());
        let severity = &summaries.severity;
        assert_eq!(severity.entries.len(), 2);
        assert_eq!(severity.count(&Severity::PropertyDamageOnly), 1);
        assert_eq!(severity.count(&Severity::Fatal), 1);
        assert_eq!(severity.peak, Some(Severity::PropertyDamageOnly));
    }

    #[test]
    fn weekday_summary_always_has_seven_days() {
        let summaries = summarize(&scenario());
        let days: Vec<Weekday> = summaries.weekday.entries.iter().map(|e| e.key).collect();
        assert_eq!(days, Weekday::all());
        assert_eq!(summaries.weekday.count(&Weekday::Friday), 1);
        assert_eq!(summaries.weekday.count(&Weekday::Saturday), 1);
        assert_eq!(summaries.weekday.peak, Some(Weekday::Friday));

        let empty = summarize(&[]);
        assert_eq!(empty.weekday.entries.len(), 7);
    }

    #[test]
    fn hour_summary_only_has_observed_hours_ascending() {
        let accidents = vec![
            accident(None, Some(19), None, Severity::Unclassified),
            accident(None, Some(7), None, Severity::Unclassified),
            accident(None, None, None, Severity::Unclassified),
            accident(None, Some(19), None, Severity::Unclassified),
        ];
        let hour = summarize(&accidents).hour;
        let hours: Vec<u32> = hour.entries.iter().map(|e| e.key).collect();
        assert_eq!(hours, [7, 19]);
        assert_eq!(hour.peak, Some(19));
        assert_eq!(hour.excluded, 1);
    }

    #[test]
    fn counts_are_conserved() {
        let accidents = vec![
            accident(Some((2019, 4, 12)), Some(1), Some("PD"), Severity::PropertyDamageOnly),
            accident(None, None, None, Severity::Unclassified),
            accident(Some((2019, 13, 1)), Some(2), Some("Other"), Severity::Unclassified),
            accident(Some((2020, 1, 1)), None, Some("PD"), Severity::PropertyDamageOnly),
        ];
        let total = accidents.len() as u64;
        let s = summarize(&accidents);

        assert_eq!(s.accident_type.total() + s.accident_type.excluded, total);
        assert_eq!(s.hour.total() + s.hour.excluded, total);
        assert_eq!(s.weekday.total() + s.weekday.excluded, total);
        assert_eq!(s.severity.total() + s.severity.excluded, total);
        assert_eq!(s.severity.excluded, 0);
    }

    #[test]
    fn partial_accumulators_merge_to_single_pass() {
        let mut accidents = scenario();
        accidents.extend(scenario());
        accidents.push(accident(None, Some(11), Some("PI"), Severity::Injury));

        let single = summarize(&accidents);

        let mut merged = SummaryAccumulator::new();
        for (chunk_idx, chunk) in accidents.chunks(2).enumerate().rev() {
            let mut partial = SummaryAccumulator::new();
            for (i, accident) in chunk.iter().enumerate() {
                partial.observe(chunk_idx * 2 + i, accident);
            }
            merged.merge(partial);
        }

        assert_eq!(merged.finish(), single);
    }

    #[test]
    fn severity_percentages_exclude_unclassified() {
        let accidents = vec![
            accident(None, None, Some("PD"), Severity::PropertyDamageOnly),
            accident(None, None, Some("PD"), Severity::PropertyDamageOnly),
            accident(None, None, Some("PD"), Severity::PropertyDamageOnly),
            accident(None, None, Some("F"), Severity::Fatal),
            accident(None, None, Some("Rollover"), Severity::Unclassified),
        ];
        let shares = severity_distribution(&summarize(&accidents).severity);
        assert_eq!(shares.len(), 3);

        let pdo = &shares[0];
        assert_eq!(pdo.severity, Severity::PropertyDamageOnly);
        assert!((pdo.percent.unwrap() - 75.0).abs() < 1e-9);

        let unclassified = shares
            .iter()
            .find(|s| s.severity == Severity::Unclassified)
            .unwrap();
        assert_eq!(unclassified.count, 1);
        assert_eq!(unclassified.percent, None);
    }

    #[test]
    fn all_unclassified_has_no_percentages() {
        let accidents = vec![accident(None, None, Some("?"), Severity::Unclassified)];
        let shares = severity_distribution(&summarize(&accidents).severity);
        assert!(shares.iter().all(|s| s.percent.is_none()));
    }
}
