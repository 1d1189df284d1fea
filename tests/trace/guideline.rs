//! Integration tests for guideline lookup

use guidelog_foundation::ClauseId;
use guidelog_trace::GuidelineLookup;

const GUIDELINE: &str = "\
1 Recommendations
1.1 Recognition
1.1.1 Refer people using a suspected cancer pathway
referral if they are aged 40 and over.

1.1.2 - Consider an urgent chest X-ray
for people aged 40 and over.
";

#[test]
fn continuation_lines_join_the_clause() {
    let lookup = GuidelineLookup::parse(GUIDELINE);
    assert_eq!(
        lookup.get("1.1.1"),
        Some("Refer people using a suspected cancer pathway referral if they are aged 40 and over.")
    );
    assert_eq!(
        lookup.get("1.1.2"),
        Some("Consider an urgent chest X-ray for people aged 40 and over.")
    );
    assert_eq!(lookup.get("1"), Some("Recommendations"));
    assert_eq!(lookup.get("9.9.9"), None);
}

#[test]
fn only_deep_clauses_are_leaves() {
    let lookup = GuidelineLookup::parse(GUIDELINE);
    let leaves = lookup.leaf_clauses();
    assert_eq!(
        leaves,
        vec![ClauseId::parse("1.1.1").unwrap(), ClauseId::parse("1.1.2").unwrap()]
    );
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("guideline.txt");
    assert!(GuidelineLookup::from_file(&missing).is_err());
}
