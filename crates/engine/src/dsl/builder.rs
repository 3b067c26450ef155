use crate::{
    document::Field,
    dsl::{
        ast::{FilterNode, Predicate},
        parser::{ParsedQuery, StructuredFilters},
    },
};

/// Combine structured filters and free text into one filter tree.
///
/// Zero parts yield the match-all filter, a single part is returned as-is,
/// anything more is wrapped in an AND.
pub fn build_filter(filters: &StructuredFilters, free_text: &str) -> FilterNode {
    let mut parts: Vec<FilterNode> = filters.iter().map(|(_, node)| node.clone()).collect();

    if !free_text.is_empty() {
        parts.push(free_text_filter(free_text));
    }

    match parts.len() {
        0 => FilterNode::match_all(),
        1 => parts.pop().unwrap_or_else(FilterNode::match_all),
        _ => FilterNode::And(parts),
    }
}

/// Convenience wrapper for a parsed query.
pub fn build_query_filter(parsed: &ParsedQuery) -> FilterNode {
    build_filter(&parsed.filters, &parsed.free_text)
}

/// Free text matches type, description or id as a pattern, or the date
/// exactly. Date-like text (digits and dashes, four or more characters) also
/// matches as a date prefix, so `2015` or `2015-03` work without `date:`.
fn free_text_filter(text: &str) -> FilterNode {
    let mut alternatives: Vec<FilterNode> = vec![
        Predicate::regex(Field::DocumentType, text, true).into(),
        Predicate::regex(Field::Description, text, true).into(),
        Predicate::regex(Field::DocumentId, text, true).into(),
        Predicate::eq(Field::DocumentDate, text).into(),
    ];

    if looks_like_date_fragment(text) {
        alternatives.push(Predicate::regex(Field::DocumentDate, format!("^{text}"), true).into());
    }

    FilterNode::Or(alternatives)
}

fn looks_like_date_fragment(text: &str) -> bool {
    text.chars().count() >= 4
        && text.chars().all(|c| c.is_ascii_digit() || c == '-')
        && text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
