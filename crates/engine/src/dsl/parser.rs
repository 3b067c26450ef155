use chrono::{Local, NaiveDate};

use crate::{
    document::{AVAILABLE, Field},
    dsl::{
        ast::{FilterNode, Predicate},
        dates::translate_date,
        lexer::{FieldToken, scan},
    },
};

/// Structured filters keyed by document field.
///
/// Inserting a second filter for the same field replaces the first one but
/// keeps its original position, so `available:yes status:x` ends up with
/// only the `status` condition on `availability`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredFilters {
    entries: Vec<(Field, FilterNode)>,
}

impl StructuredFilters {
    pub fn insert(&mut self, field: Field, node: FilterNode) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = node,
            None => self.entries.push((field, node)),
        }
    }

    pub fn get(&self, field: Field) -> Option<&FilterNode> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FilterNode)> {
        self.entries.iter().map(|(f, node)| (*f, node))
    }
}

/// A search string split into structured filters and free text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub filters: StructuredFilters,
    /// Partitions named by `date:` tokens, in order of appearance.
    pub date_hints: Vec<String>,
    pub free_text: String,
}

impl ParsedQuery {
    pub fn has_free_text(&self) -> bool {
        !self.free_text.is_empty()
    }
}

/// Parse a raw search string relative to the local calendar date.
pub fn parse_query(raw: &str) -> ParsedQuery {
    parse_query_at(raw, Local::now().date_naive())
}

/// Parse a raw search string; relative date tokens resolve against `today`.
pub fn parse_query_at(raw: &str, today: NaiveDate) -> ParsedQuery {
    if raw.trim().is_empty() {
        return ParsedQuery::default();
    }

    let scanned = scan(raw);
    let mut parsed = ParsedQuery {
        free_text: scanned.free_text,
        ..ParsedQuery::default()
    };

    for tok in &scanned.fields {
        apply_field_token(&mut parsed, tok, today);
    }

    parsed
}

fn apply_field_token(parsed: &mut ParsedQuery, tok: &FieldToken<'_>, today: NaiveDate) {
    let key = tok.key.to_lowercase();
    let value = tok.value;

    match key.as_str() {
        "date" => {
            let date = translate_date(value, today);
            for hint in date.partition_hints {
                if !parsed.date_hints.contains(&hint) {
                    parsed.date_hints.push(hint);
                }
            }
            match date.predicate {
                Some(node) => parsed.filters.insert(Field::DocumentDate, node),
                None => log::debug!("date:{value} contributes no filter"),
            }
        }
        "type" => insert_pattern(parsed, Field::DocumentType, value),
        "id" => insert_pattern(parsed, Field::DocumentId, value),
        "source" => insert_pattern(parsed, Field::Source, value),
        "status" => insert_pattern(parsed, Field::Availability, value),
        "available" => match availability_filter(value) {
            Some(node) => parsed.filters.insert(Field::Availability, node),
            None => log::debug!("available:{value} is not a yes/no value; ignored"),
        },
        _ => log::debug!("discarding unrecognised filter {}:{}", tok.key, value),
    }
}

fn insert_pattern(parsed: &mut ParsedQuery, field: Field, value: &str) {
    parsed
        .filters
        .insert(field, Predicate::regex(field, value, true).into());
}

fn availability_filter(value: &str) -> Option<FilterNode> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "available" => Some(Predicate::eq(Field::Availability, AVAILABLE).into()),
        "no" | "false" | "unavailable" => Some(Predicate::ne(Field::Availability, AVAILABLE).into()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
