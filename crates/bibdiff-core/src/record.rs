//! Normalized records and per-source collections

use bibdiff_bibtex::{KnownField, RawRecord};
use serde::Serialize;

use crate::config::TitlePolicy;
use crate::normalization::{clean_title, matching_key, venue, year_fields};

/// A parsed record plus the values derived from it once at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,
    /// Display title, empty when the record has none
    pub title: String,
    /// Identity key derived from `title`; empty keys never reconcile
    pub matching_key: String,
    /// Author list as written
    pub author: String,
    pub year_display: String,
    /// Four-digit year or empty
    pub year_normalized: String,
    pub venue: String,
}

impl NormalizedRecord {
    pub fn new(raw: RawRecord, policy: &TitlePolicy) -> Self {
        let title = raw
            .field(KnownField::Title)
            .map(|t| clean_title(t, policy))
            .unwrap_or_default();
        let matching_key = matching_key(&title);
        let author = raw.author().unwrap_or_default().to_string();
        let (year_display, year_normalized) = year_fields(&raw.fields);
        let venue = venue(&raw.fields);

        Self {
            raw,
            title,
            matching_key,
            author,
            year_display,
            year_normalized,
            venue,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.raw.identifier
    }

    /// Whether this record takes part in reconciliation
    pub fn is_matchable(&self) -> bool {
        !self.matching_key.is_empty()
    }
}

/// Records of one named source, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCollection {
    pub name: String,
    pub records: Vec<NormalizedRecord>,
}

impl SourceCollection {
    pub fn new(name: impl Into<String>, records: Vec<NormalizedRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// A source that contributed nothing (e.g. failed to load)
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Normalize parsed records into a collection
    pub fn from_raw(name: impl Into<String>, raw: Vec<RawRecord>, policy: &TitlePolicy) -> Self {
        let records = raw
            .into_iter()
            .map(|record| NormalizedRecord::new(record, policy))
            .collect();
        Self::new(name, records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
