//! Property tests for escape decoding and field splitting

use bibdiff_bibtex::{decode_latex, parse, split_top_level};
use proptest::prelude::*;

const TOKENS: [&str; 13] = [
    "a", "B", " ", "  ", "\\'e", "\\\"{o}", "\\ss", "\\&", "~", "Foo", "\\c{c}", "\\v s",
    "\\\\",
];

fn latex_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(TOKENS.to_vec()), 0..12)
        .prop_map(|tokens| tokens.concat())
}

proptest! {
    #[test]
    fn test_decoding_is_idempotent(text in latex_text()) {
        let once = decode_latex(&text);
        prop_assert_eq!(decode_latex(&once), once);
    }

    #[test]
    fn test_decoded_text_has_no_double_spaces(text in latex_text()) {
        prop_assert!(!decode_latex(&text).contains("  "));
    }

    #[test]
    fn test_decoding_arbitrary_text_does_not_panic(text in "\\PC{0,60}") {
        let _ = decode_latex(&text);
    }

    #[test]
    fn test_split_never_yields_blank_segments(text in "[a-z={}\",\\\\ ]{0,40}") {
        prop_assert!(split_top_level(&text).iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn test_parse_arbitrary_text_does_not_panic(text in "[@a-z{}(),=\" \n]{0,80}") {
        let records = parse(&text);
        prop_assert!(records.iter().all(|r| !r.entry_type.is_empty()));
    }
}
