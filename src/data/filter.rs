use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{ReportRecord, ReportTable};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Filter predicate: selected countries, industries and a date window
// ---------------------------------------------------------------------------

/// Inclusive publication-date window at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `start <= date <= end`. Always false for an inverted range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// User filter selections. An empty set or a `None` date range means "no
/// restriction" on that dimension; `FilterState::default()` is the reset state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub countries: BTreeSet<String>,
    pub industries: BTreeSet<String>,
    pub date_range: Option<DateRange>,
}

impl FilterState {
    /// Flag an inverted date range. Filtering still proceeds and simply
    /// matches nothing.
    pub fn validate(&self) -> Result<(), DashboardError> {
        match self.date_range {
            Some(DateRange { start, end }) if start > end => {
                Err(DashboardError::FilterStateInvalid { start, end })
            }
            _ => Ok(()),
        }
    }

    /// Whether any dimension is restricted.
    pub fn is_active(&self) -> bool {
        !self.countries.is_empty() || !self.industries.is_empty() || self.date_range.is_some()
    }

    /// Whether a record passes every active predicate.
    pub fn matches(&self, record: &ReportRecord) -> bool {
        member_of(&self.countries, record.country.as_deref())
            && member_of(&self.industries, record.industry.as_deref())
            && match self.date_range {
                None => true,
                Some(range) => record.publication_date.is_some_and(|d| range.contains(d)),
            }
    }
}

/// Empty selection passes everything, including missing values; otherwise
/// the value must be present and selected.
fn member_of(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

/// Return indices of records that pass all active filters, in table order.
pub fn filtered_indices(table: &ReportTable, filters: &FilterState) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// The filtered view: a fresh table with the passing rows, all columns kept.
pub fn apply(table: &ReportTable, filters: &FilterState) -> ReportTable {
    table.select(&filtered_indices(table, filters))
}

// ---------------------------------------------------------------------------
// Filter options offered to the user
// ---------------------------------------------------------------------------

/// Choices for the filter widgets, derived from the full table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Sorted distinct countries (missing values dropped).
    pub countries: Vec<String>,
    /// Sorted distinct industries (missing values dropped).
    pub industries: Vec<String>,
    /// Earliest and latest publication date, if any row has one.
    pub date_span: Option<DateRange>,
}

impl FilterOptions {
    pub fn from_table(table: &ReportTable) -> Self {
        let countries: BTreeSet<&str> = table
            .records
            .iter()
            .filter_map(|r| r.country.as_deref())
            .collect();
        let industries: BTreeSet<&str> = table
            .records
            .iter()
            .filter_map(|r| r.industry.as_deref())
            .collect();
        let dates = table.records.iter().filter_map(|r| r.publication_date);
        let date_span = dates.clone().min().zip(dates.max()).map(|(s, e)| DateRange::new(s, e));

        FilterOptions {
            countries: countries.into_iter().map(String::from).collect(),
            industries: industries.into_iter().map(String::from).collect(),
            date_span,
        }
    }
}
