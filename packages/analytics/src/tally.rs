//! Mergeable frequency counter.
//!
//! A [`Tally`] counts keys and remembers the record position at which each
//! key was first observed. Partial tallies over disjoint slices of a record
//! sequence can be merged in any order and produce the same [`Summary`] as
//! a single pass, provided positions are global record indices.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crash_stats_accident_models::Weekday;
use crash_stats_analytics_models::{Summary, SummaryEntry};

/// Presentation order for the entries of a finished summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Order in which keys were first observed.
    FirstSeen,
    /// Ascending key order.
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyTally {
    count: u64,
    first_seen: usize,
}

/// Per-key counts plus the number of records whose key was null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    keys: BTreeMap<K, KeyTally>,
    excluded: u64,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self {
            keys: BTreeMap::new(),
            excluded: 0,
        }
    }
}

impl<K: Ord + Clone> Tally<K> {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the record at `position`. A `None` key is counted as excluded.
    pub fn observe(&mut self, position: usize, key: Option<K>) {
        let Some(key) = key else {
            self.excluded += 1;
            return;
        };

        let entry = self.keys.entry(key).or_insert(KeyTally {
            count: 0,
            first_seen: position,
        });
        entry.count += 1;
        entry.first_seen = entry.first_seen.min(position);
    }

    /// Folds another tally into this one.
    pub fn merge(&mut self, other: Self) {
        self.excluded += other.excluded;
        for (key, theirs) in other.keys {
            self.keys
                .entry(key)
                .and_modify(|ours| {
                    ours.count += theirs.count;
                    ours.first_seen = ours.first_seen.min(theirs.first_seen);
                })
                .or_insert(theirs);
        }
    }

    /// Key with the maximum count, ties broken by earliest first
    /// observation.
    fn peak(&self) -> Option<K> {
        self.keys
            .iter()
            .filter(|(_, t)| t.count > 0)
            .min_by_key(|(_, t)| (Reverse(t.count), t.first_seen))
            .map(|(key, _)| key.clone())
    }

    /// Finishes the tally into an immutable [`Summary`] containing only the
    /// observed keys.
    #[must_use]
    pub fn into_summary(self, order: KeyOrder) -> Summary<K> {
        let peak = self.peak();
        let mut keys: Vec<(K, KeyTally)> = self.keys.into_iter().collect();
        if order == KeyOrder::FirstSeen {
            keys.sort_by_key(|(_, t)| t.first_seen);
        }

        Summary {
            entries: keys
                .into_iter()
                .map(|(key, t)| SummaryEntry {
                    key,
                    count: t.count,
                })
                .collect(),
            peak,
            excluded: self.excluded,
        }
    }
}

impl Tally<Weekday> {
    /// Finishes a weekday tally with all seven days present, Monday first,
    /// zero-filled for days never observed.
    #[must_use]
    pub fn into_calendar_summary(self) -> Summary<Weekday> {
        let peak = self.peak();
        Summary {
            entries: Weekday::all()
                .iter()
                .map(|day| SummaryEntry {
                    key: *day,
                    count: self.keys.get(day).map_or(0, |t| t.count),
                })
                .collect(),
            peak,
            excluded: self.excluded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(keys: &[Option<&'static str>]) -> Tally<&'static str> {
        let mut tally = Tally::new();
        for (i, key) in keys.iter().enumerate() {
            tally.observe(i, *key);
        }
        tally
    }

    #[test]
    fn counts_and_excludes() {
        let summary = tally_of(&[Some("PD"), None, Some("F"), Some("PD")])
            .into_summary(KeyOrder::FirstSeen);
        assert_eq!(summary.count(&"PD"), 2);
        assert_eq!(summary.count(&"F"), 1);
        assert_eq!(summary.excluded, 1);
        assert_eq!(summary.total() + summary.excluded, 4);
    }

    #[test]
    fn first_seen_order() {
        let summary =
            tally_of(&[Some("b"), Some("a"), Some("b"), Some("c")]).into_summary(KeyOrder::FirstSeen);
        let keys: Vec<&str> = summary.entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn key_order() {
        let summary =
            tally_of(&[Some("b"), Some("a"), Some("c")]).into_summary(KeyOrder::Key);
        let keys: Vec<&str> = summary.entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn peak_ties_go_to_first_observed() {
        let summary = tally_of(&[Some("z"), Some("a"), Some("a"), Some("z")])
            .into_summary(KeyOrder::Key);
        assert_eq!(summary.peak, Some("z"));
    }

    #[test]
    fn strict_maximum_wins() {
        let summary = tally_of(&[Some("z"), Some("a"), Some("a")]).into_summary(KeyOrder::FirstSeen);
        assert_eq!(summary.peak, Some("a"));
    }

    #[test]
    fn empty_tally_has_no_peak() {
        let summary = tally_of(&[None, None]).into_summary(KeyOrder::FirstSeen);
        assert!(summary.entries.is_empty());
        assert_eq!(summary.peak, None);
        assert_eq!(summary.excluded, 2);
    }

    #[test]
    fn merge_matches_single_pass() {
        let keys = [
            Some("PD"),
            Some("F"),
            None,
            Some("PI"),
            Some("F"),
            Some("PD"),
            None,
        ];
        let single = tally_of(&keys).into_summary(KeyOrder::FirstSeen);

        let mut left = Tally::new();
        let mut right = Tally::new();
        for (i, key) in keys.iter().enumerate() {
            if i < 3 {
                left.observe(i, *key);
            } else {
                right.observe(i, *key);
            }
        }
        // Merge order must not matter.
        right.merge(left);
        assert_eq!(right.into_summary(KeyOrder::FirstSeen), single);
    }

    #[test]
    fn calendar_summary_has_all_days() {
        let mut tally = Tally::new();
        tally.observe(0, Some(Weekday::Saturday));
        tally.observe(1, Some(Weekday::Friday));
        tally.observe(2, None);

        let summary = tally.into_calendar_summary();
        let days: Vec<Weekday> = summary.entries.iter().map(|e| e.key).collect();
        assert_eq!(days, Weekday::all());
        assert_eq!(summary.count(&Weekday::Monday), 0);
        assert_eq!(summary.count(&Weekday::Friday), 1);
        assert_eq!(summary.peak, Some(Weekday::Saturday));
        assert_eq!(summary.excluded, 1);
    }

    #[test]
    fn calendar_summary_of_nothing_has_no_peak() {
        let summary = Tally::<Weekday>::new().into_calendar_summary();
        assert_eq!(summary.entries.len(), 7);
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.peak, None);
    }
}
