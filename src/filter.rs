//! Year and severity filtering.

use crate::error::{Error, Result};
use crate::loader::Dataset;
use crate::types::AccidentRecord;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// The chosen years and, when the dataset has a severity column, severities.
///
/// `severities == None` means the severity predicate is inactive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub severities: Option<BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new(years: impl IntoIterator<Item = i32>, severities: Option<BTreeSet<String>>) -> Self {
        Self {
            years: years.into_iter().collect(),
            severities,
        }
    }

    /// Every observed value selected; the initial state for a dataset.
    pub fn all_observed(dataset: &Dataset) -> Self {
        Self {
            years: dataset.observed_years(),
            severities: dataset.observed_severities(),
        }
    }

    /// Build a selection from user input, defaulting empty input to all
    /// observed values and rejecting values the dataset never contains.
    pub fn from_requested(dataset: &Dataset, years: &[i32], severities: &[String]) -> Result<Self> {
        let mut selection = Self::all_observed(dataset);

        if !years.is_empty() {
            let unknown: Vec<String> = years
                .iter()
                .filter(|y| !selection.years.contains(*y))
                .map(|y| y.to_string())
                .collect();
            if !unknown.is_empty() {
                return Err(Error::invalid_selection(format!(
                    "year(s) {} not present in the dataset",
                    unknown.join(", ")
                )));
            }
            selection.years = years.iter().copied().collect();
        }

        if !severities.is_empty() {
            let Some(observed) = &selection.severities else {
                return Err(Error::invalid_selection(
                    "dataset has no Accident_Severity column to filter on",
                ));
            };
            let unknown: Vec<&str> = severities
                .iter()
                .filter(|s| !observed.contains(*s))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                return Err(Error::invalid_selection(format!(
                    "severity value(s) {} not present in the dataset",
                    unknown.join(", ")
                )));
            }
            selection.severities = Some(severities.iter().cloned().collect());
        }

        Ok(selection)
    }

    pub fn matches(&self, record: &AccidentRecord) -> bool {
        let year_ok = record.year.is_some_and(|y| self.years.contains(&y));
        let severity_ok = match &self.severities {
            None => true,
            Some(allowed) => record
                .severity
                .as_ref()
                .is_some_and(|s| allowed.contains(s)),
        };
        year_ok && severity_ok
    }
}

/// Records passing `selection`, in input order.
pub fn filter_records(records: &[AccidentRecord], selection: &FilterSelection) -> Vec<AccidentRecord> {
    let kept: Vec<AccidentRecord> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    debug!(input = records.len(), kept = kept.len(), "Applied filter selection");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn rec(year: Option<i32>, severity: Option<&str>, casualties: i64) -> AccidentRecord {
        AccidentRecord {
            year,
            severity: severity.map(str::to_string),
            casualties: Some(casualties),
            ..Default::default()
        }
    }

    fn severities(values: &[&str]) -> Option<BTreeSet<String>> {
        Some(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_year_and_severity_scenario() {
        let records = vec![
            rec(Some(2020), Some("Fatal"), 1),
            rec(Some(2020), Some("Slight"), 2),
            rec(Some(2021), Some("Fatal"), 1),
        ];
        let sel = FilterSelection::new([2020], severities(&["Fatal"]));
        let out = filter_records(&records, &sel);
        assert_eq!(out, vec![rec(Some(2020), Some("Fatal"), 1)]);
    }

    #[test]
    fn test_inactive_severity_filters_on_year_only() {
        let records = vec![
            rec(Some(2020), None, 1),
            rec(Some(2020), Some("Slight"), 2),
            rec(Some(2021), Some("Fatal"), 1),
        ];
        let sel = FilterSelection::new([2020], None);
        let out = filter_records(&records, &sel);
        assert_eq!(out, records[..2].to_vec());
    }

    #[test]
    fn test_null_year_and_severity_never_pass() {
        let records = vec![rec(None, Some("Fatal"), 1), rec(Some(2020), None, 1)];
        let sel = FilterSelection::new([2020], severities(&["Fatal"]));
        assert!(filter_records(&records, &sel).is_empty());
    }

    #[test]
    fn test_empty_selection_is_empty_result() {
        let records = vec![rec(Some(2020), Some("Fatal"), 1)];
        assert!(filter_records(&records, &FilterSelection::new([], None)).is_empty());
        let sel = FilterSelection::new([2020], severities(&[]));
        assert!(filter_records(&records, &sel).is_empty());
    }

    #[test]
    fn test_all_observed_is_identity() {
        let records = vec![
            rec(Some(2019), Some("Serious"), 1),
            rec(Some(2020), Some("Slight"), 2),
            rec(Some(2021), Some("Fatal"), 3),
        ];
        let ds = Dataset::with_all_columns(records.clone());
        let sel = FilterSelection::all_observed(&ds);
        assert_eq!(filter_records(&records, &sel), records);

        let no_severity = FilterSelection::new(ds.observed_years(), None);
        assert_eq!(filter_records(&records, &no_severity), records);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = vec![
            rec(Some(2020), Some("Fatal"), 1),
            rec(Some(2020), Some("Slight"), 2),
            rec(Some(2021), Some("Fatal"), 1),
            rec(None, Some("Fatal"), 4),
        ];
        let sel = FilterSelection::new([2020, 2021], severities(&["Fatal"]));
        let once = filter_records(&records, &sel);
        let twice = filter_records(&once, &sel);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_from_requested_defaults_and_validation() {
        let ds = Dataset::with_all_columns(vec![
            rec(Some(2020), Some("Fatal"), 1),
            rec(Some(2021), Some("Slight"), 1),
        ]);
        let sel = FilterSelection::from_requested(&ds, &[], &[]).unwrap();
        assert_eq!(sel, FilterSelection::all_observed(&ds));

        let sel = FilterSelection::from_requested(&ds, &[2021], &["Slight".to_string()]).unwrap();
        assert_eq!(sel.years, BTreeSet::from([2021]));
        assert_eq!(sel.severities, severities(&["Slight"]));

        let err = FilterSelection::from_requested(&ds, &[1999], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidSelection { .. }));
    }

    #[test]
    fn test_from_requested_without_severity_column() {
        let ds = Dataset::new(vec![rec(Some(2020), None, 1)], [Column::AccidentDate]);
        let sel = FilterSelection::from_requested(&ds, &[], &[]).unwrap();
        assert_eq!(sel.severities, None);
        let err = FilterSelection::from_requested(&ds, &[], &["Fatal".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidSelection { .. }));
    }
}
