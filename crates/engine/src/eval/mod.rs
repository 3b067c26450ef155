mod predicates;

pub use predicates::eval_predicate;

use crate::{Document, FilterNode};

/// Evaluate a filter tree against one document.
///
/// AND stops at the first failing child, OR at the first matching one. An
/// empty AND matches everything, an empty OR matches nothing.
pub fn matches(doc: &Document, node: &FilterNode) -> bool {
    match node {
        FilterNode::And(children) => children.iter().all(|child| matches(doc, child)),
        FilterNode::Or(children) => children.iter().any(|child| matches(doc, child)),
        FilterNode::Leaf(pred) => eval_predicate(doc, pred),
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
