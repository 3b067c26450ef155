use chrono::{Datelike, Days, NaiveDate};
use gazette_runtime::PARTITION_PREFIX;

use crate::{
    document::Field,
    dsl::ast::{CmpOp, FilterNode, Predicate},
};

/// Outcome of translating one `date:` value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateFilter {
    /// Year partitions that can hold matching documents.
    pub partition_hints: Vec<String>,
    pub predicate: Option<FilterNode>,
}

impl DateFilter {
    fn none() -> Self {
        Self::default()
    }

    fn for_year(year: i32, predicate: FilterNode) -> Self {
        Self {
            partition_hints: vec![year_partition(year)],
            predicate: Some(predicate),
        }
    }
}

pub fn year_partition(year: i32) -> String {
    format!("{PARTITION_PREFIX}{year}")
}

/// Translate a date shorthand into a `document_date` predicate.
///
/// Unrecognised or malformed tokens translate to no filter at all.
pub fn translate_date(token: &str, today: NaiveDate) -> DateFilter {
    let token = token.trim();
    let lower = token.to_ascii_lowercase();
    let year = today.year();

    if lower == "this-year" {
        return DateFilter::for_year(year, year_prefix(&year.to_string()));
    }
    if lower == "last-year" {
        return DateFilter::for_year(year - 1, year_prefix(&(year - 1).to_string()));
    }
    if lower.starts_with("last-") && lower.ends_with("-days") {
        return last_n_days(&lower, today);
    }

    if has_shape(token, "dddd") {
        let y = parse_year(token);
        return DateFilter::for_year(y, year_prefix(token));
    }
    if has_shape(token, "dddd-dd") {
        let y = parse_year(token);
        return DateFilter::for_year(y, year_prefix(token));
    }
    if has_shape(token, "dddd-dd-dd") {
        let y = parse_year(token);
        return DateFilter::for_year(y, Predicate::eq(Field::DocumentDate, token).into());
    }

    DateFilter::none()
}

fn year_prefix(prefix: &str) -> FilterNode {
    Predicate::regex(Field::DocumentDate, format!("^{prefix}"), true).into()
}

fn last_n_days(lower: &str, today: NaiveDate) -> DateFilter {
    let n = lower
        .strip_prefix("last-")
        .and_then(|rest| rest.strip_suffix("-days"))
        .and_then(|n| n.parse::<u64>().ok());

    let Some(n) = n else {
        log::debug!("ignoring malformed relative date {lower:?}");
        return DateFilter::none();
    };
    let Some(start) = today.checked_sub_days(Days::new(n)) else {
        log::debug!("relative date {lower:?} is out of range");
        return DateFilter::none();
    };

    let predicate = FilterNode::And(vec![
        Predicate::compare(Field::DocumentDate, CmpOp::Ge, iso(start)).into(),
        Predicate::compare(Field::DocumentDate, CmpOp::Le, iso(today)).into(),
    ]);

    DateFilter {
        partition_hints: (start.year()..=today.year()).map(year_partition).collect(),
        predicate: Some(predicate),
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `shape` uses `d` for an ASCII digit; every other byte must match literally.
fn has_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}

// Callers have checked the leading four digits.
fn parse_year(s: &str) -> i32 {
    s[..4].parse().unwrap_or_default()
}

#[cfg(test)]
#[path = "dates_tests.rs"]
mod tests;
