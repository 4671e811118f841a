//! Distinct years and author surnames across all sources, for building
//! filter controls.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::normalization::{collation_key, surnames};
use crate::record::SourceCollection;

/// Values a filter control can offer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterIndex {
    pub years: BTreeSet<String>,
    pub surnames: BTreeSet<String>,
}

impl FilterIndex {
    /// Collect from every record of every source
    pub fn build(collections: &[SourceCollection]) -> Self {
        let mut index = Self::default();

        for record in collections.iter().flat_map(|c| c.records.iter()) {
            if !record.year_normalized.is_empty() {
                index.years.insert(record.year_normalized.clone());
            }
            index.surnames.extend(surnames(&record.author));
        }

        index
    }

    /// Newest first
    pub fn years_descending(&self) -> Vec<&str> {
        self.years.iter().rev().map(String::as_str).collect()
    }

    /// Collated, case-insensitive order
    pub fn surnames_sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.surnames.iter().map(String::as_str).collect();
        names.sort_by_cached_key(|name| collation_key(name));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TitlePolicy;
    use crate::record::NormalizedRecord;
    use bibdiff_bibtex::RawRecord;

    fn record(author: &str, year: &str) -> NormalizedRecord {
        let mut raw = RawRecord::new("k", "misc");
        raw.fields.insert("author", author);
        raw.fields.insert("year", year);
        NormalizedRecord::new(raw, &TitlePolicy::default())
    }

    #[test]
    fn test_index_across_sources() {
        let collections = vec![
            SourceCollection::new(
                "a",
                vec![
                    record("Doe, Jane and Émile Zola", "2019"),
                    record("adams, Ann", "n.d."),
                ],
            ),
            SourceCollection::new("b", vec![record("Jane Doe", "2021"), record("", "2019")]),
        ];
        let index = FilterIndex::build(&collections);

        assert_eq!(index.years_descending(), vec!["2021", "2019"]);
        assert_eq!(index.surnames_sorted(), vec!["adams", "Doe", "Zola"]);
    }

    #[test]
    fn test_empty_index() {
        let index = FilterIndex::build(&[SourceCollection::empty("a")]);
        assert!(index.years.is_empty());
        assert!(index.surnames_sorted().is_empty());
    }
}
