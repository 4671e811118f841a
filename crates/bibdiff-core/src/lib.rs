//! bibdiff-core: compare bibliography collections across sources
//!
//! Records from N ordered sources are normalized, grouped by a title-derived
//! matching key and reported per publication: which sources hold it and
//! what each source says about it.
//!
//! Parsing, normalization, reconciliation and filtering are pure and never
//! fail. Only configuration and file loading return errors.
//!
//! ```
//! use bibdiff_core::{parse_collection, Comparison, RowFilter, TitlePolicy};
//!
//! let policy = TitlePolicy::default();
//! let comparison = Comparison::new(vec![
//!     parse_collection("ads", "@article{a, title = {Foo Bar}}", &policy),
//!     parse_collection("orcid", "@article{b, title = {FOO bar}}", &policy),
//! ]);
//!
//! let rows = comparison.select(&RowFilter::default());
//! assert_eq!(rows.len(), 1);
//! assert!(rows[0].is_complete);
//! ```

pub mod comparison;
pub mod config;
pub mod error;
pub mod filter;
pub mod index;
pub mod loader;
pub mod normalization;
pub mod reconcile;
pub mod record;

pub use comparison::{parse_collection, Comparison, ComparisonSummary};
pub use config::{BibdiffConfig, FilterDefaults, SourceConfig, TitlePolicy};
pub use error::{BibdiffError, ConfigError, LoadError, Result};
pub use filter::RowFilter;
pub use index::FilterIndex;
pub use loader::{decode_bytes, load_source, load_sources, try_load_source};
pub use normalization::{extract_surname, extract_year, matching_key, split_authors};
pub use reconcile::{reconcile, ReconciliationRow, SourceIndex};
pub use record::{NormalizedRecord, SourceCollection};
