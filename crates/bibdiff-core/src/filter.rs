//! Row selection by author, year and completeness.
//!
//! A row survives when:
//! - `differences_only` is off, or the row is missing from some source
//! - some present record satisfies every active needle at once
//!
//! The author needle is a case-insensitive substring of the author list.
//! A year needle that contains a four-digit year must equal the record's
//! normalized year; any other year text is a case-insensitive substring of
//! the display year.

use serde::{Deserialize, Serialize};

use crate::config::FilterDefaults;
use crate::normalization::extract_year;
use crate::record::NormalizedRecord;
use crate::reconcile::ReconciliationRow;

/// User-supplied row filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilter {
    pub author: String,
    pub year: String,
    pub differences_only: bool,
}

impl From<&FilterDefaults> for RowFilter {
    fn from(defaults: &FilterDefaults) -> Self {
        Self {
            author: defaults.author.clone(),
            year: defaults.year.clone(),
            differences_only: defaults.differences_only,
        }
    }
}

/// How a year needle is compared
#[derive(Debug, Clone, PartialEq, Eq)]
enum YearNeedle {
    Exact(String),
    Fragment(String),
}

impl YearNeedle {
    fn parse(needle: &str) -> Option<Self> {
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }
        Some(match extract_year(needle) {
            Some(year) => Self::Exact(year.to_string()),
            None => Self::Fragment(needle.to_lowercase()),
        })
    }

    fn matches(&self, record: &NormalizedRecord) -> bool {
        match self {
            Self::Exact(year) => record.year_normalized == *year,
            Self::Fragment(text) => record.year_display.to_lowercase().contains(text.as_str()),
        }
    }
}

impl RowFilter {
    pub fn new(author: impl Into<String>, year: impl Into<String>, differences_only: bool) -> Self {
        Self {
            author: author.into(),
            year: year.into(),
            differences_only,
        }
    }

    /// Whether this filter keeps every row
    pub fn is_empty(&self) -> bool {
        self.author.trim().is_empty() && self.year.trim().is_empty() && !self.differences_only
    }

    /// Keep matching rows, preserving their order
    pub fn apply<'a>(&self, rows: Vec<ReconciliationRow<'a>>) -> Vec<ReconciliationRow<'a>> {
        let matcher = Matcher::new(self);
        rows.into_iter().filter(|row| matcher.row(row)).collect()
    }

    pub fn matches(&self, row: &ReconciliationRow<'_>) -> bool {
        Matcher::new(self).row(row)
    }
}

/// Needles prepared once per `apply`
struct Matcher {
    author: Option<String>,
    year: Option<YearNeedle>,
    differences_only: bool,
}

impl Matcher {
    fn new(filter: &RowFilter) -> Self {
        let author = filter.author.trim().to_lowercase();
        Self {
            author: (!author.is_empty()).then_some(author),
            year: YearNeedle::parse(&filter.year),
            differences_only: filter.differences_only,
        }
    }

    fn row(&self, row: &ReconciliationRow<'_>) -> bool {
        if self.differences_only && row.is_complete {
            return false;
        }
        if self.author.is_none() && self.year.is_none() {
            return true;
        }
        row.present().any(|record| self.record(record))
    }

    fn record(&self, record: &NormalizedRecord) -> bool {
        let author_ok = self
            .author
            .as_ref()
            .map_or(true, |needle| record.author.to_lowercase().contains(needle.as_str()));
        let year_ok = self.year.as_ref().map_or(true, |needle| needle.matches(record));
        author_ok && year_ok
    }
}
