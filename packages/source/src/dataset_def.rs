//! Config-driven accident dataset definition.
//!
//! [`DatasetDefinition`] captures everything unique about one export format
//! in a serializable config struct: which columns hold the date, time,
//! accident type, and coordinates, and how accident-type labels map to
//! severities. A single generic normalizer handles every dataset.

use std::sync::Arc;

use crash_stats_source_models::{NormalizedAccident, RawRecord, RawTable};
use serde::Deserialize;

use crate::SourceError;
use crate::parsing::{normalize_temporal, parse_coordinate_pair};
use crate::progress::ProgressCallback;
use crate::type_mapping::SeverityAliases;

/// Rows between progress updates while normalizing.
const PROGRESS_BATCH: usize = 1_000;

// ── Top-level dataset definition ─────────────────────────────────────────

/// A complete, config-driven accident dataset definition.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"mdta"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Column names for each normalized field.
    pub columns: ColumnMapping,
    /// Accident-type label to severity lookup. Falls back to the built-in
    /// table when omitted.
    #[serde(default)]
    pub severity_aliases: SeverityAliases,
}

/// Maps canonical accident fields to the export's column headers.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    /// Column holding the `MM/DD/YYYY` date.
    pub date: String,
    /// Column holding the `H:MM:SS AM/PM` time, possibly with a prefix.
    pub time: String,
    /// Column holding the free-text accident type.
    pub accident_type: String,
    /// Column holding the composite `(lat, lon)` string, if the export has
    /// one.
    #[serde(default)]
    pub coordinates: Option<String>,
}

/// Columns confirmed present in a particular [`RawTable`].
#[derive(Debug, Clone, Copy)]
struct ResolvedColumns<'a> {
    date: &'a str,
    time: &'a str,
    accident_type: &'a str,
    coordinates: Option<&'a str>,
}

// ── Data-quality tally ───────────────────────────────────────────────────

/// Counts of fields that degraded during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQuality {
    /// Records normalized.
    pub records: u64,
    /// Records whose date was missing or unparseable.
    pub without_date: u64,
    /// Records whose time was missing or unparseable.
    pub without_hour: u64,
    /// Records whose accident type matched no alias.
    pub unclassified: u64,
    /// Records without a usable coordinate pair.
    pub without_coordinates: u64,
}

impl DataQuality {
    /// Tallies degraded fields over a normalized record set.
    #[must_use]
    pub fn tally(accidents: &[NormalizedAccident]) -> Self {
        accidents.iter().fold(Self::default(), |mut q, a| {
            q.records += 1;
            q.without_date += u64::from(a.date.is_none());
            q.without_hour += u64::from(a.hour.is_none());
            q.unclassified += u64::from(!a.severity.is_classified());
            q.without_coordinates += u64::from(a.coordinates.is_none());
            q
        })
    }
}

// ── Normalization ────────────────────────────────────────────────────────

impl DatasetDefinition {
    /// Returns the unique dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks that every required column exists in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] naming the first required
    /// column (date, time, accident type) absent from the header.
    pub fn validate_schema(&self, table: &RawTable) -> Result<(), SourceError> {
        self.resolve_columns(table).map(|_| ())
    }

    fn resolve_columns<'a>(
        &'a self,
        table: &RawTable,
    ) -> Result<ResolvedColumns<'a>, SourceError> {
        let columns = &self.columns;
        for required in [&columns.date, &columns.time, &columns.accident_type] {
            if !table.has_column(required) {
                return Err(SourceError::MissingColumn {
                    column: required.clone(),
                });
            }
        }

        let coordinates = match columns.coordinates.as_deref() {
            Some(column) if table.has_column(column) => Some(column),
            Some(column) => {
                log::warn!(
                    "[{}] Coordinate column {column:?} not present, skipping spatial extraction",
                    self.id
                );
                None
            }
            None => None,
        };

        Ok(ResolvedColumns {
            date: &columns.date,
            time: &columns.time,
            accident_type: &columns.accident_type,
            coordinates,
        })
    }

    /// Normalizes a single raw record. Never fails: every malformed field
    /// degrades to `None` (or [`crash_stats_accident_models::Severity::Unclassified`]).
    #[must_use]
    pub fn normalize_record(&self, record: &RawRecord) -> NormalizedAccident {
        let columns = ResolvedColumns {
            date: &self.columns.date,
            time: &self.columns.time,
            accident_type: &self.columns.accident_type,
            coordinates: self.columns.coordinates.as_deref(),
        };
        self.normalize_with(columns, record)
    }

    fn normalize_with(
        &self,
        columns: ResolvedColumns<'_>,
        record: &RawRecord,
    ) -> NormalizedAccident {
        // ── Date / time ──────────────────────────────────────────
        let date_str = record.get(columns.date);
        let time_str = record.get(columns.time);
        let temporal = normalize_temporal(date_str, time_str);
        if temporal.date.is_none() {
            log::debug!("Unparseable date {date_str:?}, storing with NULL date");
        }
        if temporal.hour.is_none() {
            log::debug!("Unparseable time {time_str:?}, storing with NULL hour");
        }

        // ── Accident type ────────────────────────────────────────
        let accident_type = record.get(columns.accident_type);
        let severity = self.severity_aliases.classify(accident_type);

        // ── Coordinates ──────────────────────────────────────────
        let coordinates = columns
            .coordinates
            .and_then(|c| record.get(c))
            .and_then(|raw| {
                let parsed = parse_coordinate_pair(raw);
                if parsed.is_none() {
                    log::debug!("Unusable coordinates {raw:?}");
                }
                parsed
            });

        NormalizedAccident {
            date: temporal.date,
            weekday: temporal.weekday,
            time_of_day: temporal.time_of_day,
            hour: temporal.hour,
            accident_type: accident_type.map(String::from),
            severity,
            coordinates,
        }
    }

    /// Normalizes every record of `table`, in order, one output per input
    /// row.
    ///
    /// A coordinate column that is configured but absent from the header is
    /// treated as if every row had malformed coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if a required column is absent
    /// from the table header.
    pub fn normalize_table(
        &self,
        table: &RawTable,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<NormalizedAccident>, SourceError> {
        let columns = self.resolve_columns(table)?;

        progress.set_total(table.len() as u64);
        progress.set_message(format!("Normalizing {}", self.name));

        let mut accidents = Vec::with_capacity(table.len());
        for chunk in table.records.chunks(PROGRESS_BATCH) {
            accidents.extend(chunk.iter().map(|r| self.normalize_with(columns, r)));
            progress.inc(chunk.len() as u64);
        }

        let quality = DataQuality::tally(&accidents);
        log::info!(
            "[{}] Normalized {} records ({} without date, {} without hour, {} unclassified, {} without coordinates)",
            self.id,
            quality.records,
            quality.without_date,
            quality.without_hour,
            quality.unclassified,
            quality.without_coordinates,
        );
        progress.finish(format!("[{}] normalized {} records", self.id, quality.records));

        Ok(accidents)
    }
}

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if the TOML is malformed or missing
/// required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, SourceError> {
    Ok(toml::de::from_str(toml_str)?)
}

#[cfg(test)]
mod tests {
    use crash_stats_accident_models::{Severity, Weekday};

    use super::*;
    use crate::progress::null_progress;

    const MINIMAL_TOML: &str = r#"
        id = "test"
        name = "Test Export"

        [columns]
        date = "Date"
        time = "Time"
        accident_type = "Accident Type"
        coordinates = "New Georeferenced Column"
    "#;

    fn definition() -> DatasetDefinition {
        parse_dataset_toml(MINIMAL_TOML).unwrap()
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(ToString::to_string).collect(),
            records: rows
                .iter()
                .map(|row| headers.iter().copied().zip(row.iter().copied()).collect())
                .collect(),
        }
    }

    const HEADERS: &[&str] = &["Date", "Time", "Accident Type", "New Georeferenced Column"];

    #[test]
    fn omitted_aliases_fall_back_to_default() {
        assert_eq!(definition().severity_aliases, SeverityAliases::default());
    }

    #[test]
    fn parses_custom_aliases() {
        let toml = format!("{MINIMAL_TOML}\n[severity_aliases]\n\"K\" = \"Fatal\"\n");
        let def = parse_dataset_toml(&toml).unwrap();
        assert_eq!(def.severity_aliases.len(), 1);
        assert_eq!(def.severity_aliases.classify(Some("K")), Severity::Fatal);
    }

    #[test]
    fn rejects_unknown_severity_label() {
        let toml = format!("{MINIMAL_TOML}\n[severity_aliases]\n\"K\" = \"Deadly\"\n");
        assert!(matches!(
            parse_dataset_toml(&toml),
            Err(SourceError::Toml(_))
        ));
    }

    #[test]
    fn normalizes_every_row() {
        let table = table(
            HEADERS,
            &[
                &["4/12/2019", "7:45:00 PM", "PD", "(39.30, -76.61)"],
                &["4/13/2019", "11:15:00 AM", "Fatal Crash", "bad-data"],
                &["not a date", "noon", "", ""],
            ],
        );
        let accidents = definition().normalize_table(&table, &null_progress()).unwrap();
        assert_eq!(accidents.len(), 3);

        assert_eq!(accidents[0].weekday, Some(Weekday::Friday));
        assert_eq!(accidents[0].hour, Some(19));
        assert_eq!(accidents[0].severity, Severity::PropertyDamageOnly);
        assert_eq!(accidents[0].accident_type.as_deref(), Some("PD"));
        assert!(accidents[0].coordinates.is_some());

        assert_eq!(accidents[1].weekday, Some(Weekday::Saturday));
        assert_eq!(accidents[1].hour, Some(11));
        assert_eq!(accidents[1].severity, Severity::Fatal);
        assert!(accidents[1].coordinates.is_none());

        assert!(accidents[2].date.is_none());
        assert!(accidents[2].weekday.is_none());
        assert!(accidents[2].hour.is_none());
        assert!(accidents[2].accident_type.is_none());
        assert_eq!(accidents[2].severity, Severity::Unclassified);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let table = table(&["Date", "Time"], &[&["4/12/2019", "7:45:00 PM"]]);
        let err = definition()
            .normalize_table(&table, &null_progress())
            .unwrap_err();
        assert!(
            matches!(err, SourceError::MissingColumn { ref column } if column == "Accident Type")
        );
    }

    #[test]
    fn normalizes_single_record() {
        let record: RawRecord = [
            ("Date", "1/1/2020"),
            ("Time", "1/1/2020 12:30:00 AM"),
            ("Accident Type", "Injury Crash"),
            ("New Georeferenced Column", "(39.1, -76.9)"),
        ]
        .into_iter()
        .collect();
        let accident = definition().normalize_record(&record);
        assert_eq!(accident.weekday, Some(Weekday::Wednesday));
        assert_eq!(accident.hour, Some(0));
        assert_eq!(accident.severity, Severity::Injury);
        assert_eq!(accident.latitude(), Some(39.1));
    }

    #[test]
    fn missing_coordinate_column_degrades() {
        let table = table(
            &["Date", "Time", "Accident Type"],
            &[&["4/12/2019", "7:45:00 PM", "PI"]],
        );
        let accidents = definition().normalize_table(&table, &null_progress()).unwrap();
        assert_eq!(accidents.len(), 1);
        assert_eq!(accidents[0].severity, Severity::Injury);
        assert!(accidents[0].coordinates.is_none());
    }

    #[test]
    fn empty_table_with_schema_normalizes_to_nothing() {
        let table = table(HEADERS, &[]);
        let accidents = definition().normalize_table(&table, &null_progress()).unwrap();
        assert!(accidents.is_empty());
    }

    #[test]
    fn tallies_data_quality() {
        let table = table(
            HEADERS,
            &[
                &["4/12/2019", "7:45:00 PM", "PD", "(39.30, -76.61)"],
                &["13/40/2019", "7:45:00", "Rollover", ""],
            ],
        );
        let accidents = definition().normalize_table(&table, &null_progress()).unwrap();
        assert_eq!(
            DataQuality::tally(&accidents),
            DataQuality {
                records: 2,
                without_date: 1,
                without_hour: 1,
                unclassified: 1,
                without_coordinates: 1,
            }
        );
    }
}
