//! Cross-source reconciliation
//!
//! Groups records from N ordered sources by matching key. Each source is
//! indexed first-seen-wins: a later record whose key was already seen in the
//! same source is shadowed (kept out of the rows, but reported by
//! [`SourceIndex::shadowed`]). Every distinct key across all sources becomes
//! one [`ReconciliationRow`] holding a slot per source.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::normalization::collation_key;
use crate::record::{NormalizedRecord, SourceCollection};

/// Matching key to first record, for one source
#[derive(Debug, Clone)]
pub struct SourceIndex<'a> {
    name: &'a str,
    by_key: HashMap<&'a str, &'a NormalizedRecord>,
    shadowed: Vec<&'a NormalizedRecord>,
}

impl<'a> SourceIndex<'a> {
    pub fn build(collection: &'a SourceCollection) -> Self {
        let mut by_key: HashMap<&str, &NormalizedRecord> = HashMap::new();
        let mut shadowed = Vec::new();

        for record in collection.records.iter().filter(|r| r.is_matchable()) {
            match by_key.get(record.matching_key.as_str()) {
                Some(first) => {
                    debug!(
                        source = %collection.name,
                        key = %record.matching_key,
                        kept = %first.identifier(),
                        shadowed = %record.identifier(),
                        "duplicate matching key within source"
                    );
                    shadowed.push(record);
                }
                None => {
                    by_key.insert(&record.matching_key, record);
                }
            }
        }

        Self {
            name: &collection.name,
            by_key,
            shadowed,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn get(&self, key: &str) -> Option<&'a NormalizedRecord> {
        self.by_key.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_key.keys().copied()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Records hidden behind an earlier record with the same key
    pub fn shadowed(&self) -> &[&'a NormalizedRecord] {
        &self.shadowed
    }
}

/// One publication across all sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationRow<'a> {
    pub key: &'a str,
    /// One slot per source, in source order
    pub per_source: Vec<Option<&'a NormalizedRecord>>,
    pub present_count: usize,
    pub is_complete: bool,
}

impl<'a> ReconciliationRow<'a> {
    pub fn new(key: &'a str, per_source: Vec<Option<&'a NormalizedRecord>>) -> Self {
        let present_count = per_source.iter().filter(|slot| slot.is_some()).count();
        let is_complete = present_count == per_source.len();
        Self {
            key,
            per_source,
            present_count,
            is_complete,
        }
    }

    /// Records present in this row, in source order
    pub fn present(&self) -> impl Iterator<Item = &'a NormalizedRecord> + '_ {
        self.per_source.iter().flatten().copied()
    }

    /// Title of the first present record, or the key
    pub fn representative_title(&self) -> &'a str {
        self.present()
            .map(|record| record.title.as_str())
            .find(|title| !title.is_empty())
            .unwrap_or(self.key)
    }
}

/// Index every source
pub fn build_indexes(collections: &[SourceCollection]) -> Vec<SourceIndex<'_>> {
    collections
        .iter()
        .map(|collection| {
            let index = SourceIndex::build(collection);
            debug!(
                source = index.name(),
                keys = index.len(),
                shadowed = index.shadowed().len(),
                "indexed source"
            );
            index
        })
        .collect()
}

/// Reconcile all sources into rows, in presentation order.
pub fn reconcile(collections: &[SourceCollection]) -> Vec<ReconciliationRow<'_>> {
    let indexes = build_indexes(collections);
    let mut rows = rows_from_indexes(&indexes);
    sort_rows(&mut rows);
    rows
}

/// One row per distinct key across `indexes`, in key order
pub fn rows_from_indexes<'a>(indexes: &[SourceIndex<'a>]) -> Vec<ReconciliationRow<'a>> {
    let keys: BTreeSet<&'a str> = indexes.iter().flat_map(|index| index.keys()).collect();

    keys.into_iter()
        .map(|key| {
            let per_source = indexes.iter().map(|index| index.get(key)).collect();
            ReconciliationRow::new(key, per_source)
        })
        .collect()
}

/// Presentation order: incomplete rows first, then more sources before
/// fewer, then by representative title (collated), then by key.
pub fn sort_rows(rows: &mut [ReconciliationRow<'_>]) {
    rows.sort_by_cached_key(|row| {
        (
            row.is_complete,
            Reverse(row.present_count),
            collation_key(row.representative_title()),
            row.key,
        )
    });
}
