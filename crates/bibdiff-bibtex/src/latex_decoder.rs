//! LaTeX escape decoding
//!
//! Decodes the escapes found in bibliography field values to Unicode:
//!
//! 1. Escaped punctuation (`\&`, `\%`, `\_`, `\#`, `\$`) becomes the bare
//!    character; an unescaped `~` becomes a plain space.
//! 2. Named symbols (`\ss`, `\ae`, `\o`, `\l`, `\th`, ...) become their
//!    precomposed character. Matching is per whole control word, so `\oe`
//!    never decodes as `\o` followed by `e`.
//! 3. Accent commands (`\"o`, `\'{e}`, `\c c`, `\v{s}`, ...) compose the
//!    letter with the matching combining mark and NFC-normalize.
//! 4. Runs of two or more whitespace characters collapse to one space.
//!
//! Anything else is left as literal text.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

/// Decode LaTeX escapes in `input`.
pub fn decode_latex(input: &str) -> String {
    let mut result = replace_literal_escapes(input);
    result = replace_named_symbols(&result);
    result = compose_accents(&result);
    WHITESPACE_RUN.replace_all(&result, " ").into_owned()
}

// ===== Literal escapes =====

const LITERAL_ESCAPES: [char; 5] = ['&', '%', '_', '#', '$'];

/// Unescapes `\&`, `\%`, `\_`, `\#` and `\$`, and turns a bare `~` tie into
/// a space. After `\` the tilde selects the accent instead. A backslash
/// that is itself escaped (`\\`) escapes nothing.
fn replace_literal_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut escaping = false;
    for c in input.chars() {
        if escaping && LITERAL_ESCAPES.contains(&c) {
            out.pop();
            out.push(c);
            escaping = false;
            continue;
        }
        if c == '~' && !escaping {
            out.push(' ');
        } else {
            out.push(c);
        }
        escaping = c == '\\' && !escaping;
    }
    out
}

// ===== Named symbols =====

lazy_static! {
    static ref NAMED_SYMBOLS: HashMap<&'static str, &'static str> = HashMap::from([
        // Ligatures
        ("ss", "ß"),
        ("ae", "æ"), ("AE", "Æ"),
        ("oe", "œ"), ("OE", "Œ"),
        // Ring
        ("aa", "å"), ("AA", "Å"),
        // Stroke
        ("o", "ø"), ("O", "Ø"),
        ("l", "ł"), ("L", "Ł"),
        // Eth and thorn
        ("dh", "ð"), ("DH", "Ð"),
        ("th", "þ"), ("TH", "Þ"),
        // Dotless i/j decode to the plain letter so an accent can attach
        ("i", "i"),
        ("j", "j"),
    ]);

    static ref CONTROL_WORD: Regex = Regex::new(r"\\([A-Za-z]+)").unwrap();
}

fn replace_named_symbols(input: &str) -> String {
    CONTROL_WORD
        .replace_all(input, |caps: &Captures| match NAMED_SYMBOLS.get(&caps[1]) {
            Some(symbol) => (*symbol).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

// ===== Accents =====

lazy_static! {
    // Whitespace after the letter is only consumed together with a `}`
    static ref ACCENT_COMMAND: Regex =
        Regex::new(r#"\\(["'`^~=.uvHrck])\s*\{?\s*([A-Za-z])(?:\s*\})?"#).unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Combining mark for an accent selector
fn combining_mark(selector: char) -> Option<char> {
    let mark = match selector {
        '"' => '\u{0308}', // diaeresis
        '\'' => '\u{0301}', // acute
        '`' => '\u{0300}', // grave
        '^' => '\u{0302}', // circumflex
        '~' => '\u{0303}', // tilde
        '=' => '\u{0304}', // macron
        '.' => '\u{0307}', // dot above
        'u' => '\u{0306}', // breve
        'v' => '\u{030C}', // caron
        'H' => '\u{030B}', // double acute
        'r' => '\u{030A}', // ring
        'c' => '\u{0327}', // cedilla
        'k' => '\u{0328}', // ogonek
        _ => return None,
    };
    Some(mark)
}

fn compose_accents(input: &str) -> String {
    ACCENT_COMMAND
        .replace_all(input, |caps: &Captures| {
            let letter = &caps[2];
            let selector = caps[1].chars().next();
            match selector.and_then(combining_mark) {
                Some(mark) => format!("{letter}{mark}").nfc().collect::<String>(),
                None => letter.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"M\"uller"#, "Müller")]
    #[case(r#"M\"{u}ller"#, "Müller")]
    #[case(r"caf\'e", "café")]
    #[case(r"caf\'{e}", "café")]
    #[case(r"\`a la carte", "à la carte")]
    #[case(r"h\^otel", "hôtel")]
    #[case(r"ma\~nana", "mañana")]
    #[case(r"ma\~{n}ana", "mañana")]
    #[case(r"gar\c con", "garçon")]
    #[case(r"gar\c{c}on", "garçon")]
    #[case(r"\v{S}koda", "Škoda")]
    #[case(r"Erd\H{o}s", "Erdős")]
    #[case(r#"\r{A}ngstr\"om"#, "Ångström")]
    #[case(r"\k{e}", "ę")]
    #[case(r"\={o}", "ō")]
    #[case(r"\.{z}", "ż")]
    #[case(r"\u{a}", "ă")]
    fn test_accent_composition(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode_latex(input), expected);
    }

    #[rstest]
    #[case(r"Gro\ss", "Groß")]
    #[case(r"\AE", "Æ")]
    #[case(r"\o", "ø")]
    #[case(r"\L{}\'od\'z", "Ł{}ódź")]
    #[case(r"\TH", "Þ")]
    #[case(r"\dh", "ð")]
    fn test_named_symbols(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode_latex(input), expected);
    }

    #[test]
    fn test_space_after_accented_letter_is_kept() {
        assert_eq!(decode_latex(r"caf\'e au lait"), "café au lait");
        assert_eq!(decode_latex(r"\'{E} cole"), "É cole");
    }

    #[test]
    fn test_named_symbols_match_whole_words() {
        assert_eq!(decode_latex(r"\oe uvre"), "œ uvre");
        // Unknown control words stay literal
        assert_eq!(decode_latex(r"\overline{x}"), r"\overline{x}");
    }

    #[test]
    fn test_dotless_i_takes_accent() {
        assert_eq!(decode_latex(r"Garc\'{\i}a"), "García");
        assert_eq!(decode_latex(r"\'\i"), "í");
    }

    #[test]
    fn test_literal_escapes() {
        assert_eq!(decode_latex(r"10\% off"), "10% off");
        assert_eq!(decode_latex(r"Smith \& Jones"), "Smith & Jones");
        assert_eq!(decode_latex(r"snake\_case \#1 \$5"), "snake_case #1 $5");
    }

    #[test]
    fn test_escaped_backslash_does_not_escape() {
        assert_eq!(decode_latex(r"a\\&b"), r"a\\&b");
        assert_eq!(decode_latex(r"a\\\&b"), r"a\\&b");
        assert_eq!(decode_latex(r"x\\~y"), r"x\\ y");

        let once = decode_latex(r"a\\&b");
        assert_eq!(decode_latex(&once), once);
    }

    #[test]
    fn test_tilde_is_space() {
        assert_eq!(decode_latex("Fig.~1"), "Fig. 1");
        assert_eq!(decode_latex("a~~b"), "a b");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(decode_latex("A  \n\t study"), "A study");
        assert_eq!(decode_latex("one space"), "one space");
    }

    #[test]
    fn test_unknown_escapes_left_alone() {
        assert_eq!(decode_latex(r"\foo bar"), r"\foo bar");
        assert_eq!(decode_latex(r"\'1"), r"\'1");
    }

    #[test]
    fn test_complex_example() {
        let input = r#"M\"uller, J. and Garc\'{\i}a, M."#;
        assert_eq!(decode_latex(input), "Müller, J. and García, M.");
    }

    #[test]
    fn test_decoding_decoded_text_is_stable() {
        let once = decode_latex(r#"Sch\"on \& Gro\ss~im  Caf\'{e}"#);
        assert_eq!(decode_latex(&once), once);
    }
}
