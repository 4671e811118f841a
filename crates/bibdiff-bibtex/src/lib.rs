//! BibTeX record parsing for bibliography comparison
//!
//! This crate turns loosely formatted bibliography documents into structured
//! records without ever failing on malformed input.
//!
//! Features:
//! - Marker scanner with bracket-depth body detection (`{}` and `()`)
//! - Top-level field splitting aware of braces, quotes and escapes
//! - LaTeX escape decoding (literal escapes, named symbols, accents)
//! - Typed field map with well-known field names

mod entry;
mod latex_decoder;
pub mod parser;
mod tokenizer;

pub use entry::{EntryKind, FieldMap, KnownField, RawRecord};
pub use latex_decoder::decode_latex;
pub use parser::{clean_value, parse, parse_with_issues, ParseIssue, ParseOutcome, SkipReason};
pub use tokenizer::{split_assignment, split_top_level};
