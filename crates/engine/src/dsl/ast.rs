use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::document::Field;

/// Comparison operator of a leaf predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    /// Pattern search (not a full match).
    Regex,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::Regex => "~",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        }
    }
}

/// Leaf of the filter tree: `field op value`.
///
/// Regex leaves carry their compiled pattern. A pattern that does not compile
/// is matched literally instead.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub field: Field,
    pub op: CmpOp,
    pub value: String,
    pub case_insensitive: bool,
    pattern: Option<Regex>,
}

impl Predicate {
    pub fn eq(field: Field, value: impl Into<String>) -> Self {
        Self::compare(field, CmpOp::Eq, value)
    }

    pub fn ne(field: Field, value: impl Into<String>) -> Self {
        Self::compare(field, CmpOp::Ne, value)
    }

    pub fn regex(field: Field, pattern: impl Into<String>, case_insensitive: bool) -> Self {
        let value = pattern.into();
        let pattern = compile_pattern(&value, case_insensitive);
        Self {
            field,
            op: CmpOp::Regex,
            value,
            case_insensitive,
            pattern,
        }
    }

    pub fn compare(field: Field, op: CmpOp, value: impl Into<String>) -> Self {
        if op == CmpOp::Regex {
            return Self::regex(field, value, false);
        }
        Self {
            field,
            op,
            value: value.into(),
            case_insensitive: false,
            pattern: None,
        }
    }

    pub(crate) fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }
}

// The compiled pattern is derived from `value` and `case_insensitive`.
impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.op == other.op
            && self.value == other.value
            && self.case_insensitive == other.case_insensitive
    }
}

fn compile_pattern(pattern: &str, case_insensitive: bool) -> Option<Regex> {
    let build = |p: &str| {
        RegexBuilder::new(p)
            .case_insensitive(case_insensitive)
            .build()
    };

    match build(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            log::debug!("pattern {pattern:?} is not a valid regex ({err}); matching literally");
            build(&regex::escape(pattern)).ok()
        }
    }
}

/// Boolean filter tree evaluated against one document at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Leaf(Predicate),
}

impl FilterNode {
    /// Neutral filter: an empty AND, matches every document.
    pub fn match_all() -> Self {
        FilterNode::And(Vec::new())
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, FilterNode::And(children) if children.is_empty())
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().map(FilterNode::leaf_count).sum()
            }
            FilterNode::Leaf(_) => 1,
        }
    }
}

impl From<Predicate> for FilterNode {
    fn from(pred: Predicate) -> Self {
        FilterNode::Leaf(pred)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.case_insensitive { "*" } else { "" };
        write!(f, "{} {}{} {:?}", self.field, self.op.symbol(), flag, self.value)
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, joiner) = match self {
            FilterNode::Leaf(pred) => return pred.fmt(f),
            FilterNode::And(children) if children.is_empty() => return f.write_str("*"),
            FilterNode::Or(children) if children.is_empty() => return f.write_str("!*"),
            FilterNode::And(children) => (children, " AND "),
            FilterNode::Or(children) => (children, " OR "),
        };

        f.write_str("(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(joiner)?;
            }
            child.fmt(f)?;
        }
        f.write_str(")")
    }
}
