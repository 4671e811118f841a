//! Text normalization for cross-source matching
//!
//! Derives display values (cleaned title, year, venue) and the matching key
//! from raw record fields, plus the surname and collation helpers used by
//! the filter index and row ordering.

use bibdiff_bibtex::{decode_latex, FieldMap, KnownField};
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::TitlePolicy;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref LEADING_IN: Regex = Regex::new(r"(?i)^\s*In:\s+").unwrap();
    static ref IN_SEPARATOR: Regex = Regex::new(r"(?i)\s+In:\s+").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(19|20)\d{2}\b").unwrap();
    static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"(?i)\s+and\s+").unwrap();
}

/// Fields searched for a venue, in preference order
pub const VENUE_FIELDS: [KnownField; 5] = [
    KnownField::Journal,
    KnownField::BookTitle,
    KnownField::Publisher,
    KnownField::School,
    KnownField::Institution,
];

/// Display title: escapes decoded, braces removed, whitespace collapsed,
/// then the "In:" clause stripped according to `policy`.
pub fn clean_title(raw: &str, policy: &TitlePolicy) -> String {
    let decoded = decode_latex(raw).replace(['{', '}'], "");
    let collapsed = collapse_whitespace(&decoded);

    if policy.strip_in_clause {
        strip_in_clause(&collapsed, policy.in_clause_min_prefix)
    } else {
        collapsed
    }
}

/// Remove a leading `In:` and an embedded container clause.
///
/// `Evaluating X In: Proceedings of Y` keeps `Evaluating X` when that part
/// has at least `min_prefix` characters once trailing `.`/`:` and spaces are
/// trimmed. A shorter prefix leaves the text unchanged.
pub fn strip_in_clause(title: &str, min_prefix: usize) -> String {
    let title = LEADING_IN.replace(title, "");

    if let Some(separator) = IN_SEPARATOR.find(&title) {
        let prefix = title[..separator.start()].trim_end_matches(['.', ':', ' ']);
        if prefix.chars().count() >= min_prefix {
            return prefix.to_string();
        }
    }

    title.trim().to_string()
}

/// Identity key for a title: decomposed, combining marks dropped, sharp s
/// folded to `ss`, lowercased, reduced to `[a-z0-9]`.
///
/// An empty key means the record cannot be matched.
pub fn matching_key(title: &str) -> String {
    fold_diacritics(title)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// First `19xx`/`20xx` standing on its own in `text`
pub fn extract_year(text: &str) -> Option<&str> {
    YEAR.find(text).map(|m| m.as_str())
}

/// `(display, normalized)` year for a record.
///
/// The display year is the `year` field verbatim, falling back to the year
/// found in `date`. The normalized year is extracted from `year`, or from
/// `date` only when there is no `year` field at all.
pub fn year_fields(fields: &FieldMap) -> (String, String) {
    match fields.get(KnownField::Year) {
        Some(year) => (
            year.to_string(),
            extract_year(year).unwrap_or_default().to_string(),
        ),
        None => {
            let from_date = fields
                .get(KnownField::Date)
                .and_then(extract_year)
                .unwrap_or_default()
                .to_string();
            (from_date.clone(), from_date)
        }
    }
}

/// First populated venue field
pub fn venue(fields: &FieldMap) -> String {
    fields.first_of(&VENUE_FIELDS).unwrap_or_default().to_string()
}

/// Split an author list on `and`, dropping braces and empty names
pub fn split_authors(authors: &str) -> Vec<String> {
    AUTHOR_SEPARATOR
        .split(authors)
        .map(|name| name.replace(['{', '}'], "").trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Surname of one author: text before the first comma (`Last, First`),
/// otherwise the last word (`First Last`).
pub fn extract_surname(author: &str) -> Option<String> {
    let author = author.replace(['{', '}'], "");
    let surname = match author.split_once(',') {
        Some((last, _)) => last.trim(),
        None => author.split_whitespace().last().unwrap_or_default(),
    };

    (!surname.is_empty()).then(|| surname.to_string())
}

/// Surnames of every author in an author list
pub fn surnames(authors: &str) -> Vec<String> {
    split_authors(authors)
        .iter()
        .filter_map(|name| extract_surname(name))
        .collect()
}

/// Sort key for locale-aware, case-insensitive ordering.
///
/// Primary: accents removed, sharp s as `ss`, lowercase. Secondary: the
/// plain lowercase text, so `Muller` and `Müller` still order stably.
pub fn collation_key(text: &str) -> (String, String) {
    (fold_diacritics(text).to_lowercase(), text.to_lowercase())
}

fn fold_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .replace(['ß', 'ẞ'], "ss")
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
