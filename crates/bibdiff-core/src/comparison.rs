//! Comparison of a fixed, ordered set of sources
//!
//! [`Comparison`] owns the collections and recomputes rows, selections and
//! index sets on demand. Nothing is cached, so the same collections and
//! filter always give the same output.

use bibdiff_bibtex::parse_with_issues;
use serde::Serialize;
use tracing::debug;

use crate::config::{BibdiffConfig, TitlePolicy};
use crate::filter::RowFilter;
use crate::index::FilterIndex;
use crate::loader::load_sources;
use crate::reconcile::{build_indexes, reconcile, ReconciliationRow};
use crate::record::SourceCollection;

/// Parse and normalize one document into a named collection
pub fn parse_collection(name: &str, text: &str, policy: &TitlePolicy) -> SourceCollection {
    let outcome = parse_with_issues(text);
    if !outcome.issues.is_empty() {
        debug!(
            source = name,
            skipped = outcome.issues.len(),
            "skipped malformed record markers"
        );
    }
    SourceCollection::from_raw(name, outcome.records, policy)
}

/// Counts describing one comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    /// `(name, record count)` per source, in source order
    pub sources: Vec<(String, usize)>,
    pub total_records: usize,
    pub rows: usize,
    pub complete_rows: usize,
    pub partial_rows: usize,
    /// Records hidden by an earlier record with the same key in their source
    pub shadowed_records: usize,
}

/// N ordered sources under comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    collections: Vec<SourceCollection>,
}

impl Comparison {
    pub fn new(collections: Vec<SourceCollection>) -> Self {
        Self { collections }
    }

    /// Load every configured source; unavailable sources stay as empty
    /// columns.
    pub fn load(config: &BibdiffConfig) -> Self {
        Self::new(load_sources(config))
    }

    pub fn collections(&self) -> &[SourceCollection] {
        &self.collections
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }

    /// All rows in presentation order
    pub fn rows(&self) -> Vec<ReconciliationRow<'_>> {
        reconcile(&self.collections)
    }

    /// Rows passing `filter`, in presentation order
    pub fn select(&self, filter: &RowFilter) -> Vec<ReconciliationRow<'_>> {
        filter.apply(self.rows())
    }

    pub fn index(&self) -> FilterIndex {
        FilterIndex::build(&self.collections)
    }

    pub fn summary(&self) -> ComparisonSummary {
        let rows = self.rows();
        let complete_rows = rows.iter().filter(|row| row.is_complete).count();
        let shadowed_records = build_indexes(&self.collections)
            .iter()
            .map(|index| index.shadowed().len())
            .sum();

        ComparisonSummary {
            sources: self
                .collections
                .iter()
                .map(|c| (c.name.clone(), c.len()))
                .collect(),
            total_records: self.collections.iter().map(SourceCollection::len).sum(),
            rows: rows.len(),
            complete_rows,
            partial_rows: rows.len() - complete_rows,
            shadowed_records,
        }
    }
}
