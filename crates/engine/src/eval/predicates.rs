use std::cmp::Ordering;

use crate::{CmpOp, Document, Predicate};

pub fn eval_predicate(doc: &Document, pred: &Predicate) -> bool {
    let actual = doc.field(pred.field);

    match pred.op {
        CmpOp::Eq => actual == Some(pred.value.as_str()),
        CmpOp::Ne => actual != Some(pred.value.as_str()),
        CmpOp::Regex => eval_regex(actual, pred),
        CmpOp::Gt | CmpOp::Ge | CmpOp::Lt | CmpOp::Le => match actual {
            Some(value) => cmp_str(value, &pred.value, pred.op),
            None => false,
        },
    }
}

/// Missing fields are searched as the empty string.
fn eval_regex(actual: Option<&str>, pred: &Predicate) -> bool {
    let text = actual.unwrap_or("");
    match pred.pattern() {
        Some(re) => re.is_match(text),
        None => false,
    }
}

/// Lexicographic comparison; ISO dates compare chronologically this way.
#[inline]
fn cmp_str(actual: &str, wanted: &str, op: CmpOp) -> bool {
    let ord = actual.cmp(wanted);
    match op {
        CmpOp::Gt => ord == Ordering::Greater,
        CmpOp::Ge => ord != Ordering::Less,
        CmpOp::Lt => ord == Ordering::Less,
        CmpOp::Le => ord != Ordering::Greater,
        CmpOp::Eq => ord == Ordering::Equal,
        CmpOp::Ne => ord != Ordering::Equal,
        CmpOp::Regex => false,
    }
}
