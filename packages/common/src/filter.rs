//! In-memory filtering of painting records.

use crate::{PaintingRecord, PaintingStatus};

/// Criteria for narrowing a sequence of records.
///
/// Every field is optional; an absent field (or a blank search) imposes no
/// constraint. Present fields are combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub year: Option<i32>,
    pub status: Option<PaintingStatus>,
    /// Case-insensitive substring matched against title, description or artist.
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Returns true if no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.status.is_none() && self.search_term().is_none()
    }

    /// The normalized search needle, or `None` when the search is blank.
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Returns true if `record` satisfies every present criterion.
    pub fn matches(&self, record: &PaintingRecord) -> bool {
        self.matches_with(record, self.search_term().as_deref())
    }

    fn matches_with(&self, record: &PaintingRecord, needle: Option<&str>) -> bool {
        if let Some(year) = self.year
            && record.year != year
        {
            return false;
        }
        if let Some(status) = self.status
            && record.status != status
        {
            return false;
        }
        match needle {
            Some(needle) => {
                record.title.to_lowercase().contains(needle)
                    || record.description.to_lowercase().contains(needle)
                    || record
                        .artist
                        .as_deref()
                        .is_some_and(|artist| artist.to_lowercase().contains(needle))
            }
            None => true,
        }
    }
}

/// Keep the records matching `criteria`, preserving their relative order.
pub fn filter_paintings(records: &[PaintingRecord], criteria: &FilterCriteria) -> Vec<PaintingRecord> {
    if criteria.is_empty() {
        return records.to_vec();
    }
    let needle = criteria.search_term();
    records
        .iter()
        .filter(|record| criteria.matches_with(record, needle.as_deref()))
        .cloned()
        .collect()
}

/// Distinct creation years, newest first.
pub fn distinct_years(records: &[PaintingRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
