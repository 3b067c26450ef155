use super::*;
use crate::{CmpOp, Field, Predicate};

fn gazette() -> Document {
    Document::new("1895-18")
        .with_description("Land Acquisition Notice")
        .with_date("2015-01-01")
        .with_type("ORGANISATIONAL")
        .with_availability("Available")
}

fn leaf(p: Predicate) -> FilterNode {
    FilterNode::Leaf(p)
}

#[test]
fn empty_combinators() {
    let doc = gazette();
    assert!(matches(&doc, &FilterNode::And(Vec::new())));
    assert!(!matches(&doc, &FilterNode::Or(Vec::new())));
    assert!(matches(&doc, &FilterNode::match_all()));
}

#[test]
fn equality_and_negation() {
    let doc = gazette();
    assert!(matches(&doc, &leaf(Predicate::eq(Field::Availability, "Available"))));
    assert!(!matches(&doc, &leaf(Predicate::eq(Field::Availability, "available"))));
    assert!(!matches(&doc, &leaf(Predicate::ne(Field::Availability, "Available"))));
}

#[test]
fn missing_field_is_unequal_and_satisfies_ne() {
    let doc = Document::new("2056-34").with_date("2018-02-01");
    assert!(!matches(&doc, &leaf(Predicate::eq(Field::Availability, "Available"))));
    assert!(matches(&doc, &leaf(Predicate::ne(Field::Availability, "Available"))));
}

#[test]
fn regex_is_a_search_not_a_full_match() {
    let doc = gazette();
    assert!(matches(&doc, &leaf(Predicate::regex(Field::Description, "acquisition", true))));
    assert!(!matches(&doc, &leaf(Predicate::regex(Field::Description, "acquisition", false))));
    assert!(matches(&doc, &leaf(Predicate::regex(Field::DocumentDate, "^2015", true))));
    assert!(!matches(&doc, &leaf(Predicate::regex(Field::DocumentDate, "^2016", true))));
}

#[test]
fn regex_on_missing_field_matches_empty_string() {
    let doc = gazette();
    assert!(matches(&doc, &leaf(Predicate::regex(Field::Source, "^$", false))));
    assert!(!matches(&doc, &leaf(Predicate::regex(Field::Source, "gov", true))));
}

#[test]
fn invalid_pattern_is_matched_literally() {
    let doc = Document::new("x").with_description("Section (3 amended");
    assert!(matches(&doc, &leaf(Predicate::regex(Field::Description, "(3", true))));
    assert!(!matches(&doc, &leaf(Predicate::regex(Field::Description, "(4", true))));
}

#[test]
fn ordering_comparisons_are_lexicographic() {
    let doc = gazette();
    let cases: &[(CmpOp, &str, bool)] = &[
        (CmpOp::Gt, "2014-12-31", true),
        (CmpOp::Gt, "2015-01-01", false),
        (CmpOp::Ge, "2015-01-01", true),
        (CmpOp::Lt, "2015-01-02", true),
        (CmpOp::Lt, "2015-01-01", false),
        (CmpOp::Le, "2015-01-01", true),
        (CmpOp::Le, "2014", false),
    ];

    for (op, value, expected) in cases {
        let node = leaf(Predicate::compare(Field::DocumentDate, *op, *value));
        assert_eq!(matches(&doc, &node), *expected, "{:?} {}", op, value);
    }
}

#[test]
fn ordering_on_missing_field_always_fails() {
    let doc = Document::new("no-date");
    for op in [CmpOp::Gt, CmpOp::Ge, CmpOp::Lt, CmpOp::Le] {
        let node = leaf(Predicate::compare(Field::DocumentDate, op, "2015-01-01"));
        assert!(!matches(&doc, &node), "{:?}", op);
    }
}

#[test]
fn nested_combinators() {
    let doc = gazette();
    let node = FilterNode::And(vec![
        leaf(Predicate::eq(Field::Availability, "Available")),
        FilterNode::Or(vec![
            leaf(Predicate::regex(Field::DocumentType, "legal", true)),
            leaf(Predicate::regex(Field::DocumentId, "1895", true)),
        ]),
    ]);
    assert!(matches(&doc, &node));

    let node = FilterNode::And(vec![
        leaf(Predicate::eq(Field::Availability, "Available")),
        FilterNode::Or(vec![leaf(Predicate::regex(Field::DocumentType, "legal", true))]),
    ]);
    assert!(!matches(&doc, &node));
}

#[test]
fn compare_with_regex_op_builds_pattern() {
    let doc = gazette();
    let node = leaf(Predicate::compare(Field::DocumentType, CmpOp::Regex, "ORGAN"));
    assert!(matches(&doc, &node));
}

#[test]
fn source_pattern_matches_present_field() {
    let doc = gazette().with_source("https://gazettes.gov.lk/2015/1895-18.pdf");
    assert!(matches(&doc, &leaf(Predicate::regex(Field::Source, "GOV\\.LK", true))));
    assert!(!matches(&doc, &leaf(Predicate::regex(Field::Source, "^$", false))));
}
