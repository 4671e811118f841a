//! Permissive BibTeX record scanner
//!
//! Finds `@type{...}` / `@type(...)` blocks in arbitrary text and turns each
//! into a [`RawRecord`]. The body is delimited by counting brackets of the
//! opening style, so brace groups inside field values never end a record
//! early.
//!
//! Nothing here fails: a marker without a type tag or bracket, a body that
//! never closes, or a body without a comma is skipped and scanning resumes
//! after the `@`. `@comment`, `@preamble` and `@string` blocks are consumed
//! and dropped.

use lazy_static::lazy_static;
use nom::{
    character::complete::{alpha1, multispace0, one_of},
    IResult,
};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::entry::{EntryKind, RawRecord};
use crate::latex_decoder::decode_latex;
use crate::tokenizer::{split_assignment, split_top_level};

/// Why a record marker produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `@` not directly followed by letters
    MissingTypeTag,
    /// Type tag not followed by `{` or `(`
    MissingOpenBracket,
    /// End of text reached before the body closed
    Unterminated,
    /// Body has no comma separating identifier and fields
    MissingComma,
}

/// A skipped marker and where it sits in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    pub line: u32,
    pub column: u32,
    pub reason: SkipReason,
}

/// Records plus the markers that were skipped along the way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub records: Vec<RawRecord>,
    pub issues: Vec<ParseIssue>,
}

/// Parse every bibliographic record in `text`, in document order.
pub fn parse(text: &str) -> Vec<RawRecord> {
    parse_with_issues(text).records
}

/// Like [`parse`], also reporting each skipped marker.
pub fn parse_with_issues(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let mut position = Position::new(text);
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('@') {
        let at = cursor + offset;
        // Resume point for any malformed marker
        cursor = at + 1;

        let (body_input, tag, open) = match entry_header(&text[cursor..]) {
            Ok((rest, (tag, open))) => (rest, tag, open),
            Err(_) => {
                let reason = if text[cursor..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                    SkipReason::MissingOpenBracket
                } else {
                    SkipReason::MissingTypeTag
                };
                skip(&mut outcome, &mut position, at, reason);
                continue;
            }
        };

        let Some((body, rest)) = scan_body(body_input, open) else {
            skip(&mut outcome, &mut position, at, SkipReason::Unterminated);
            continue;
        };
        cursor = text.len() - rest.len();

        if EntryKind::is_directive(tag) {
            continue;
        }

        match parse_entry_body(body, tag) {
            Some(record) => outcome.records.push(record),
            None => skip(&mut outcome, &mut position, at, SkipReason::MissingComma),
        }
    }

    outcome
}

fn skip(outcome: &mut ParseOutcome, position: &mut Position, at: usize, reason: SkipReason) {
    let (line, column) = position.advance_to(at);
    debug!(line, column, ?reason, "skipping record marker");
    outcome.issues.push(ParseIssue {
        line,
        column,
        reason,
    });
}

/// 1-based line and column of byte offsets, which must be visited in
/// increasing order. Each byte of text is counted once.
struct Position<'a> {
    text: &'a str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Position<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn advance_to(&mut self, offset: usize) -> (u32, u32) {
        let passed = &self.text[self.offset..offset];
        match passed.rfind('\n') {
            Some(last_newline) => {
                self.line += passed.matches('\n').count() as u32;
                self.column = passed[last_newline + 1..].chars().count() as u32 + 1;
            }
            None => self.column += passed.chars().count() as u32,
        }
        self.offset = offset;
        (self.line, self.column)
    }
}

/// `type` then optional whitespace then the opening bracket
fn entry_header(input: &str) -> IResult<&str, (&str, char)> {
    let (rest, tag) = alpha1(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, open) = one_of("{(")(rest)?;
    Ok((rest, (tag, open)))
}

/// Consume up to the bracket that closes `open`.
///
/// Returns `(body, rest after the closing bracket)`, or `None` when the text
/// ends first.
fn scan_body(input: &str, open: char) -> Option<(&str, &str)> {
    let close = if open == '{' { '}' } else { ')' };
    let mut depth = 1usize;

    for (i, c) in input.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some((&input[..i], &input[i + c.len_utf8()..]));
            }
        }
    }

    None
}

/// Split a body into identifier and fields
fn parse_entry_body(body: &str, tag: &str) -> Option<RawRecord> {
    let (identifier, fields_raw) = body.trim().split_once(',')?;
    let mut record = RawRecord::new(identifier.trim(), tag);

    for segment in split_top_level(fields_raw) {
        let Some((name, raw_value)) = split_assignment(&segment) else {
            continue;
        };
        let value = clean_value(raw_value);
        if !value.is_empty() {
            record.fields.insert(name, value);
        }
    }

    Some(record)
}

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    // `{A} # {B}`, `"A" # "B"`, `jan # " 1"`
    static ref CONCATENATION: Regex = Regex::new(r#"["}]?\s+#\s+["{]?"#).unwrap();
    static ref GROUP_OPEN: Regex = Regex::new(r"\{\s*").unwrap();
    static ref GROUP_CLOSE: Regex = Regex::new(r"\s*\}").unwrap();
}

/// Clean a raw field value into its display text.
///
/// Collapses whitespace, drops one layer of enclosing braces and one of
/// enclosing quotes, joins `#` concatenations, decodes LaTeX escapes and
/// removes case-protection braces.
///
/// Escapes are decoded while the braces are still in place: `{\'\i}a`
/// must not become the control word `\ia`.
pub fn clean_value(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw, " ");
    let mut value = collapsed.trim();
    value = value.strip_prefix('{').unwrap_or(value);
    value = value.strip_suffix('}').unwrap_or(value);
    value = value.strip_prefix('"').unwrap_or(value);
    value = value.strip_suffix('"').unwrap_or(value);

    let joined = CONCATENATION.replace_all(value, "");
    let decoded = decode_latex(&joined);
    let opened = GROUP_OPEN.replace_all(&decoded, "");
    let unbraced = GROUP_CLOSE.replace_all(&opened, "");

    WHITESPACE.replace_all(unbraced.trim(), " ").into_owned()
}
