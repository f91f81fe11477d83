//! Operators used by predicate nodes.
//!
//! [`CompareOp`] covers relational comparisons, [`TextOp`] the substring
//! family of string operators, and [`SetOp`] the two ways a record
//! collection can be tested against a set of values.

use std::cmp::Ordering;
use std::fmt;

/// Relational comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal (exact match).
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl CompareOp {
    /// Evaluates the operator given the ordering of the record value
    /// relative to the operand.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }

    /// Returns `true` for operators that need a total order, not just equality.
    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String matching operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOp {
    StartsWith,
    EndsWith,
    Contains,
}

impl TextOp {
    pub fn eval(self, haystack: &str, needle: &str) -> bool {
        match self {
            TextOp::StartsWith => haystack.starts_with(needle),
            TextOp::EndsWith => haystack.ends_with(needle),
            TextOp::Contains => haystack.contains(needle),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextOp::StartsWith => "startswith",
            TextOp::EndsWith => "endswith",
            TextOp::Contains => "contains",
        }
    }
}

impl fmt::Display for TextOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record collection is tested against a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    /// The record collection holds at least one value of the set.
    Any,
    /// Every value of the set is present in the record collection.
    ///
    /// This is "set is a subset of the record collection", not the reverse.
    All,
}

impl SetOp {
    pub fn as_str(self) -> &'static str {
        match self {
            SetOp::Any => "any",
            SetOp::All => "all",
        }
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_eval_ordering() {
        assert!(CompareOp::Eq.eval_ordering(Ordering::Equal));
        assert!(!CompareOp::Eq.eval_ordering(Ordering::Less));

        assert!(CompareOp::Ne.eval_ordering(Ordering::Greater));
        assert!(!CompareOp::Ne.eval_ordering(Ordering::Equal));

        assert!(CompareOp::Gt.eval_ordering(Ordering::Greater));
        assert!(!CompareOp::Gt.eval_ordering(Ordering::Equal));

        assert!(CompareOp::Gte.eval_ordering(Ordering::Equal));
        assert!(!CompareOp::Gte.eval_ordering(Ordering::Less));

        assert!(CompareOp::Lt.eval_ordering(Ordering::Less));
        assert!(!CompareOp::Lt.eval_ordering(Ordering::Equal));

        assert!(CompareOp::Lte.eval_ordering(Ordering::Equal));
        assert!(!CompareOp::Lte.eval_ordering(Ordering::Greater));
    }

    #[test]
    fn text_eval() {
        assert!(TextOp::StartsWith.eval("Johnny", "John"));
        assert!(!TextOp::StartsWith.eval("Jane", "John"));
        assert!(TextOp::EndsWith.eval("John Doe", "Doe"));
        assert!(TextOp::Contains.eval("John Doe", "n D"));
        assert!(!TextOp::Contains.eval("John", "john"));
    }

    #[test]
    fn display() {
        assert_eq!(CompareOp::Gte.to_string(), "gte");
        assert_eq!(TextOp::StartsWith.to_string(), "startswith");
        assert_eq!(SetOp::All.to_string(), "all");
    }
}
