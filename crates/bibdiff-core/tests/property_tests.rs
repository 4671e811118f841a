//! Property tests for normalization, reconciliation and filtering

use std::collections::BTreeSet;

use bibdiff_bibtex::RawRecord;
use bibdiff_core::{
    matching_key, reconcile, NormalizedRecord, RowFilter, SourceCollection, TitlePolicy,
};
use proptest::prelude::*;

const TITLES: [&str; 6] = [
    "Alpha Study",
    "alpha  study",
    "Beta Report",
    "Über Maße",
    "uber masse",
    "",
];
const AUTHORS: [&str; 4] = ["Doe, Jane", "Roe, Rick and Ann Smith", "Müller, Hans", ""];
const YEARS: [&str; 4] = ["2019", "2020", "in press", ""];

/// Record shape: indexes into the pools above
type Shape = (usize, usize, usize);

fn shape() -> impl Strategy<Value = Shape> {
    (0..TITLES.len(), 0..AUTHORS.len(), 0..YEARS.len())
}

fn sources() -> impl Strategy<Value = Vec<Vec<Shape>>> {
    prop::collection::vec(prop::collection::vec(shape(), 0..6), 1..5)
}

fn build(sources: &[Vec<Shape>]) -> Vec<SourceCollection> {
    sources
        .iter()
        .enumerate()
        .map(|(n, shapes)| {
            let records = shapes
                .iter()
                .enumerate()
                .map(|(i, &(t, a, y))| {
                    let mut raw = RawRecord::new(format!("s{n}r{i}"), "misc");
                    raw.fields.insert("title", TITLES[t]);
                    raw.fields.insert("author", AUTHORS[a]);
                    raw.fields.insert("year", YEARS[y]);
                    NormalizedRecord::new(raw, &TitlePolicy::default())
                })
                .collect();
            SourceCollection::new(format!("source{n}"), records)
        })
        .collect()
}

fn accent(title: &str) -> String {
    title
        .replace("ss", "ß")
        .chars()
        .map(|c| match c {
            'a' => 'ä',
            'e' => 'é',
            'o' => 'ô',
            'U' => 'Ü',
            other => other,
        })
        .collect()
}

proptest! {
    #[test]
    fn test_key_ignores_case_and_accents(title in "[a-zA-Z ]{1,30}") {
        let key = matching_key(&title);
        prop_assert_eq!(&matching_key(&title.to_uppercase()), &key);
        prop_assert_eq!(&matching_key(&title.to_lowercase()), &key);
        prop_assert_eq!(&matching_key(&accent(&title)), &key);
    }

    #[test]
    fn test_key_is_ascii_alphanumeric(title in "\\PC{0,40}") {
        let key = matching_key(&title);
        prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_row_counts_are_consistent(shapes in sources()) {
        let collections = build(&shapes);
        for row in reconcile(&collections) {
            prop_assert_eq!(row.per_source.len(), collections.len());
            let present = row.per_source.iter().filter(|slot| slot.is_some()).count();
            prop_assert_eq!(row.present_count, present);
            prop_assert!(row.present_count >= 1);
            prop_assert_eq!(row.is_complete, row.present_count == collections.len());
        }
    }

    #[test]
    fn test_every_matchable_key_gets_a_row(shapes in sources()) {
        let collections = build(&shapes);
        let expected: BTreeSet<String> = collections
            .iter()
            .flat_map(|c| c.records.iter())
            .filter(|r| r.is_matchable())
            .map(|r| r.matching_key.clone())
            .collect();
        let actual: BTreeSet<String> = reconcile(&collections)
            .iter()
            .map(|row| row.key.to_string())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_record_order_does_not_change_keys(
        (original, shuffled) in prop::collection::vec(shape(), 0..8)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a = build(&[original]);
        let b = build(&[shuffled]);
        let keys_a: Vec<&str> = reconcile(&a).iter().map(|row| row.key).collect();
        let keys_b: Vec<&str> = reconcile(&b).iter().map(|row| row.key).collect();
        prop_assert_eq!(keys_a, keys_b);
    }

    #[test]
    fn test_reconcile_is_deterministic(shapes in sources()) {
        let collections = build(&shapes);
        prop_assert_eq!(reconcile(&collections), reconcile(&collections));
    }

    #[test]
    fn test_differences_only_never_adds_rows(
        shapes in sources(),
        author in "[a-z]{0,3}",
        year in "[0-9]{0,4}",
    ) {
        let collections = build(&shapes);
        let loose = RowFilter::new(author.clone(), year.clone(), false)
            .apply(reconcile(&collections));
        let strict = RowFilter::new(author, year, true).apply(reconcile(&collections));
        prop_assert!(strict.len() <= loose.len());
    }

    #[test]
    fn test_longer_author_needle_never_adds_rows(
        shapes in sources(),
        needle in "[a-z]{0,3}",
        extra in "[a-z]",
        differences_only in any::<bool>(),
    ) {
        let collections = build(&shapes);
        let short = RowFilter::new(needle.clone(), "", differences_only)
            .apply(reconcile(&collections));
        let long = RowFilter::new(format!("{needle}{extra}"), "", differences_only)
            .apply(reconcile(&collections));
        prop_assert!(long.len() <= short.len());
    }
}
