//! Corpus statistics for the dashboard and the filter pickers.

use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{CancelToken, Document, EngineError, Partition, Result, executor::gather};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_docs: usize,
    pub available_docs: usize,
    /// Display names, e.g. `LEGAL_REGULATORY` becomes `Legal Regulatory`.
    pub document_types: Vec<String>,
    /// `None` when no document carries a year.
    pub years_covered: Option<YearRange>,
    /// Partitions whose scan failed and were left out of the totals.
    pub failed_partitions: Vec<String>,
}

/// Distinct values found in one partition, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Two-digit months (`01`..`12`).
    pub months: Vec<String>,
    /// Two-digit days of month.
    pub days: Vec<String>,
    /// Raw document types.
    pub document_types: Vec<String>,
}

#[derive(Debug, Default)]
struct PartitionStats {
    total: usize,
    available: usize,
    types: BTreeSet<String>,
    years: Option<YearRange>,
}

impl PartitionStats {
    fn add(&mut self, doc: &Document) {
        self.total += 1;
        if doc.is_available() {
            self.available += 1;
        }
        if let Some(t) = doc.document_type.as_deref().filter(|t| !t.is_empty()) {
            self.types.insert(t.to_owned());
        }
        if let Some(year) = doc.year() {
            self.years = Some(widen(self.years, YearRange { from: year, to: year }));
        }
    }
}

fn widen(acc: Option<YearRange>, next: YearRange) -> YearRange {
    match acc {
        None => next,
        Some(r) => YearRange {
            from: r.from.min(next.from),
            to: r.to.max(next.to),
        },
    }
}

fn partition_stats(partition: &dyn Partition, cancel: &CancelToken) -> Result<PartitionStats> {
    let mut stats = PartitionStats::default();
    let mut cancelled = false;

    partition.scan(&mut |doc| {
        if cancel.is_cancelled_sparse(stats.total + 1) {
            cancelled = true;
            return false;
        }
        stats.add(doc);
        true
    })?;

    if cancelled {
        return Err(EngineError::Cancelled);
    }
    Ok(stats)
}

/// Totals across every partition, scanned concurrently.
///
/// A failing partition is left out of the totals and listed in
/// `failed_partitions`.
pub fn collect_dashboard(
    partitions: &[Arc<dyn Partition>],
    workers: usize,
    cancel: &CancelToken,
) -> Result<DashboardStats> {
    let gathered = gather(partitions, workers, cancel, |p| partition_stats(p, cancel))?;

    let mut total_docs = 0;
    let mut available_docs = 0;
    let mut raw_types = BTreeSet::new();
    let mut years_covered = None;

    for (_, stats) in gathered.values {
        total_docs += stats.total;
        available_docs += stats.available;
        raw_types.extend(stats.types);
        if let Some(range) = stats.years {
            years_covered = Some(widen(years_covered, range));
        }
    }

    let document_types: BTreeSet<String> = raw_types
        .iter()
        .map(|t| format_document_type(t))
        .filter(|t| !t.is_empty())
        .collect();

    Ok(DashboardStats {
        total_docs,
        available_docs,
        document_types: document_types.into_iter().collect(),
        years_covered,
        failed_partitions: gathered.failed,
    })
}

/// Distinct month, day and type values of one partition.
pub fn collect_filter_options(partition: &dyn Partition, cancel: &CancelToken) -> Result<FilterOptions> {
    let mut months = BTreeSet::new();
    let mut days = BTreeSet::new();
    let mut types = BTreeSet::new();
    let mut seen = 0usize;
    let mut cancelled = false;

    partition.scan(&mut |doc| {
        if cancel.is_cancelled_sparse(seen) {
            cancelled = true;
            return false;
        }
        seen += 1;
        if let Some(date) = doc.document_date.as_deref() {
            if let Some(mm) = two_digits(date, 5) {
                months.insert(mm.to_owned());
            }
            if let Some(dd) = two_digits(date, 8) {
                days.insert(dd.to_owned());
            }
        }
        if let Some(t) = doc.document_type.as_deref().filter(|t| !t.is_empty()) {
            types.insert(t.to_owned());
        }
        true
    })?;

    if cancelled {
        return Err(EngineError::Cancelled);
    }

    Ok(FilterOptions {
        months: months.into_iter().collect(),
        days: days.into_iter().collect(),
        document_types: types.into_iter().collect(),
    })
}

fn two_digits(date: &str, at: usize) -> Option<&str> {
    let s = date.get(at..at + 2)?;
    s.bytes().all(|b| b.is_ascii_digit()).then_some(s)
}

/// Human form of a raw type: words title-cased, underscores to spaces,
/// surrounding whitespace trimmed.
///
/// A letter is uppercased when it follows a non-letter, so `1ST_NOTICE`
/// becomes `1St Notice`.
pub fn format_document_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;

    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(if c == '_' { ' ' } else { c });
            prev_is_letter = false;
        }
    }

    out.trim().to_owned()
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
