use super::*;
use crate::dsl::ast::CmpOp;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")
}

fn parse(input: &str) -> ParsedQuery {
    parse_query_at(input, today())
}

fn predicate_for(parsed: &ParsedQuery, field: Field) -> &Predicate {
    match parsed.filters.get(field) {
        Some(FilterNode::Leaf(p)) => p,
        other => panic!("expected leaf for {field}, got {:?}", other),
    }
}

#[test]
fn empty_input_is_default_query() {
    for input in ["", "   ", "\t"] {
        assert_eq!(parse(input), ParsedQuery::default(), "input: {:?}", input);
    }
}

#[test]
fn plain_text_is_free_text_only() {
    let q = parse("  Test   Doc 1 ");
    assert!(q.filters.is_empty());
    assert!(q.date_hints.is_empty());
    assert_eq!(q.free_text, "Test Doc 1");
    assert!(q.has_free_text());
}

#[test]
fn pattern_keys_map_to_case_insensitive_regex() {
    let cases: &[(&str, Field, &str)] = &[
        ("type:LEGAL_REGULATORY", Field::DocumentType, "LEGAL_REGULATORY"),
        ("id:1895", Field::DocumentId, "1895"),
        ("source:gov", Field::Source, "gov"),
        ("status:avail", Field::Availability, "avail"),
        ("TYPE:legal", Field::DocumentType, "legal"),
    ];

    for (input, field, value) in cases {
        let q = parse(input);
        let p = predicate_for(&q, *field);
        assert_eq!(p.op, CmpOp::Regex, "input: {:?}", input);
        assert_eq!(p.value, *value, "input: {:?}", input);
        assert!(p.case_insensitive, "input: {:?}", input);
        assert_eq!(q.free_text, "", "input: {:?}", input);
    }
}

#[test]
fn available_values() {
    for value in ["yes", "true", "available", "YES"] {
        let q = parse(&format!("available:{value}"));
        let p = predicate_for(&q, Field::Availability);
        assert_eq!((p.op, p.value.as_str()), (CmpOp::Eq, "Available"), "value: {value}");
    }

    for value in ["no", "false", "unavailable", "No"] {
        let q = parse(&format!("available:{value}"));
        let p = predicate_for(&q, Field::Availability);
        assert_eq!((p.op, p.value.as_str()), (CmpOp::Ne, "Available"), "value: {value}");
    }
}

#[test]
fn other_available_values_are_silently_ignored() {
    let q = parse("available:maybe notice");
    assert!(q.filters.is_empty());
    assert_eq!(q.free_text, "notice");
}

#[test]
fn date_key_adds_predicate_and_partition_hint() {
    let q = parse("date:2015 land");
    let p = predicate_for(&q, Field::DocumentDate);
    assert_eq!(p.value, "^2015");
    assert_eq!(q.date_hints, vec!["gazettes_2015"]);
    assert_eq!(q.free_text, "land");
}

#[test]
fn malformed_date_contributes_nothing() {
    let q = parse("date:last-x-days");
    assert!(q.filters.is_empty());
    assert!(q.date_hints.is_empty());
    assert_eq!(q.free_text, "");
}

#[test]
fn unrecognised_key_is_discarded_not_searched() {
    // The token is removed from the text and does not become a filter.
    let q = parse("foo:bar important");
    assert!(q.filters.is_empty());
    assert_eq!(q.free_text, "important");
}

#[test]
fn later_filter_on_same_field_wins() {
    let q = parse("available:yes type:a status:pending");
    assert_eq!(q.filters.len(), 2);
    let p = predicate_for(&q, Field::Availability);
    assert_eq!((p.op, p.value.as_str()), (CmpOp::Regex, "pending"));

    // First insertion position is kept.
    let fields: Vec<Field> = q.filters.iter().map(|(f, _)| f).collect();
    assert_eq!(fields, vec![Field::Availability, Field::DocumentType]);
}

#[test]
fn repeated_date_hints_are_deduplicated() {
    let q = parse("date:2015 date:2015-02");
    assert_eq!(q.date_hints, vec!["gazettes_2015"]);
    assert_eq!(predicate_for(&q, Field::DocumentDate).value, "^2015-02");
}

#[test]
fn combined_query() {
    let q = parse("type:legal date:last-7-days available:no  gazette  notice");
    assert_eq!(q.filters.len(), 3);
    assert_eq!(q.date_hints, vec!["gazettes_2026"]);
    assert_eq!(q.free_text, "gazette notice");
    assert!(matches!(
        q.filters.get(Field::DocumentDate),
        Some(FilterNode::And(parts)) if parts.len() == 2
    ));
}
