//! Frequency tables, monthly series and summary metrics over a record set.
//!
//! All functions are pure reads of the slice they are given. Sorting is left
//! to the `rows()` views used for presentation.

use crate::calendar::month_start;
use crate::dimension::Dimension;
use crate::types::{AccidentRecord, FrequencyRow, MonthlyRow, SeverityMonthlyRow, SummaryMetrics};
use crate::util::format_number;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Label shown for the missing-value bucket.
pub const MISSING_LABEL: &str = "(missing)";

/// Value -> count for one dimension, including a missing bucket if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    dimension: Dimension,
    counts: HashMap<Option<String>, usize>,
}

impl FrequencyTable {
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn get(&self, value: Option<&str>) -> usize {
        self.counts
            .get(&value.map(str::to_string))
            .copied()
            .unwrap_or(0)
    }

    pub fn missing(&self) -> usize {
        self.get(None)
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Buckets sorted by count descending; ties by value, missing last.
    pub fn sorted(&self) -> Vec<(Option<&str>, usize)> {
        let mut entries: Vec<(Option<&str>, usize)> = self
            .counts
            .iter()
            .map(|(k, v)| (k.as_deref(), *v))
            .collect();
        entries.sort_by(|a, b| {
            b.1.cmp(&a.1).then_with(|| match (a.0, b.0) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
        });
        entries
    }

    pub fn rows(&self) -> Vec<FrequencyRow> {
        let total = self.total();
        self.sorted()
            .into_iter()
            .map(|(value, count)| FrequencyRow {
                value: value.unwrap_or(MISSING_LABEL).to_string(),
                count,
                share: format!("{}%", format_number(share_pct(count, total), 2)),
            })
            .collect()
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

fn share_pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn frequency_count(records: &[AccidentRecord], dimension: Dimension) -> FrequencyTable {
    let mut counts: HashMap<Option<String>, usize> = HashMap::new();
    for r in records {
        *counts.entry(dimension.value(r)).or_insert(0) += 1;
    }
    FrequencyTable { dimension, counts }
}

/// Accidents per calendar month, keyed by the first day of the month.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlySeries {
    counts: BTreeMap<NaiveDate, usize>,
}

impl MonthlySeries {
    pub fn get(&self, month: NaiveDate) -> usize {
        self.counts.get(&month_start(month)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn rows(&self) -> Vec<MonthlyRow> {
        self.counts
            .iter()
            .map(|(date, n)| MonthlyRow {
                date: *date,
                accidents: *n,
            })
            .collect()
    }
}

impl Serialize for MonthlySeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

pub fn monthly_count(records: &[AccidentRecord]) -> MonthlySeries {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in records.iter().filter_map(|r| r.date) {
        *counts.entry(month_start(date)).or_insert(0) += 1;
    }
    MonthlySeries { counts }
}

/// Accidents per (month, severity) pair that actually occurs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeverityMonthlySeries {
    counts: BTreeMap<(NaiveDate, String), usize>,
}

impl SeverityMonthlySeries {
    pub fn get(&self, month: NaiveDate, severity: &str) -> usize {
        self.counts
            .get(&(month_start(month), severity.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn rows(&self) -> Vec<SeverityMonthlyRow> {
        self.counts
            .iter()
            .map(|((date, severity), n)| SeverityMonthlyRow {
                date: *date,
                severity: severity.clone(),
                accidents: *n,
            })
            .collect()
    }
}

impl Serialize for SeverityMonthlySeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

pub fn monthly_severity_count(records: &[AccidentRecord]) -> SeverityMonthlySeries {
    let mut counts: BTreeMap<(NaiveDate, String), usize> = BTreeMap::new();
    for r in records {
        if let (Some(date), Some(severity)) = (r.date, &r.severity) {
            *counts
                .entry((month_start(date), severity.clone()))
                .or_insert(0) += 1;
        }
    }
    SeverityMonthlySeries { counts }
}

pub fn summarize(records: &[AccidentRecord]) -> SummaryMetrics {
    let districts: HashSet<&str> = records.iter().filter_map(|r| r.district.as_deref()).collect();
    SummaryMetrics {
        total_accidents: records.len(),
        total_casualties: records
            .iter()
            .map(|r| r.casualties.unwrap_or(0))
            .fold(0i64, i64::saturating_add),
        total_vehicles: records
            .iter()
            .map(|r| r.vehicles.unwrap_or(0))
            .fold(0i64, i64::saturating_add),
        unique_districts: districts.len(),
    }
}
