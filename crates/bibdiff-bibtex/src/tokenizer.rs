//! Top-level field splitting for a record body.
//!
//! Splits `title = {A, B}, author = "C, D", year = 2020` into one segment per
//! field. Commas only separate fields at brace depth zero and outside a
//! quoted span. A backslash escapes the following character, so `\"` and
//! `\{` never change the nesting state.

/// Scanner state while walking a body
#[derive(Debug, Default)]
struct SplitState {
    depth: i32,
    in_quotes: bool,
    escaped: bool,
}

impl SplitState {
    /// Feed one character; returns true when it is a top-level separator
    fn advance(&mut self, c: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        match c {
            '\\' => self.escaped = true,
            '"' if self.depth == 0 => self.in_quotes = !self.in_quotes,
            '{' if !self.in_quotes => self.depth += 1,
            '}' if !self.in_quotes => self.depth -= 1,
            ',' => return self.depth == 0 && !self.in_quotes,
            _ => {}
        }
        false
    }
}

/// Split a record body (without its identifier) into trimmed, non-empty
/// field segments.
pub fn split_top_level(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut state = SplitState::default();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if state.advance(c) {
            push_segment(&mut parts, &text[start..i]);
            start = i + c.len_utf8();
        }
    }
    push_segment(&mut parts, &text[start..]);

    parts
}

fn push_segment(parts: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
}

/// Split a segment into `(name, raw value)` at the first `=`.
///
/// Segments without `=` are not assignments and yield `None`.
pub fn split_assignment(segment: &str) -> Option<(&str, &str)> {
    let (name, value) = segment.split_once('=')?;
    Some((name.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_split() {
        let parts = split_top_level(" title = {A}, year = 2020 ,");
        assert_eq!(parts, vec!["title = {A}", "year = 2020"]);
    }

    #[test]
    fn test_commas_in_braces_do_not_split() {
        let parts = split_top_level("author = {Doe, Jane and Roe, Rick}, year = {2020}");
        assert_eq!(parts, vec!["author = {Doe, Jane and Roe, Rick}", "year = {2020}"]);
    }

    #[test]
    fn test_commas_in_quotes_do_not_split() {
        let parts = split_top_level(r#"title = "One, Two", note = x"#);
        assert_eq!(parts, vec![r#"title = "One, Two""#, "note = x"]);
    }

    #[test]
    fn test_nested_braces() {
        let parts = split_top_level("title = {A {B, {C}} D}, x = y");
        assert_eq!(parts, vec!["title = {A {B, {C}} D}", "x = y"]);
    }

    #[test]
    fn test_escaped_quote_does_not_open_span() {
        let parts = split_top_level(r#"title = {Size 5\" disk}, year = 1990"#);
        assert_eq!(parts.len(), 2);

        let parts = split_top_level(r#"note = 5\", year = 1990"#);
        assert_eq!(parts, vec![r#"note = 5\""#, "year = 1990"]);
    }

    #[test]
    fn test_escaped_brace_does_not_nest() {
        let parts = split_top_level(r"title = set \{a\}, year = 2001");
        assert_eq!(parts, vec![r"title = set \{a\}", "year = 2001"]);
    }

    #[test]
    fn test_quote_inside_braces_is_literal() {
        let parts = split_top_level(r#"title = {The "best", maybe}, year = 2001"#);
        assert_eq!(parts, vec![r#"title = {The "best", maybe}"#, "year = 2001"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_top_level("").is_empty());
        assert!(split_top_level(" , ,").is_empty());
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("Title = {A = B}"), Some(("Title", "{A = B}")));
        assert_eq!(split_assignment("dangling"), None);
    }
}
