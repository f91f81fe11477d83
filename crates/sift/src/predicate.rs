//! Predicate tree built by filters and interpreted against records.
//!
//! A [`Predicate`] is a small tagged union: leaf nodes test one record field,
//! `And` / `Or` / `Not` compose them. Trees are plain data, so a backend
//! other than the in-memory evaluator can walk them and translate them into
//! its own query language.
//!
//! Combination goes through [`Predicate::all`], [`Predicate::any`] and
//! [`ApplyType::combine`], which return `None` for an empty input. An empty
//! conjunction or disjunction is therefore never constructed.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use regex::Regex;

use crate::op::{CompareOp, SetOp, TextOp};
use crate::traits::Searchable;
use crate::value::{Scalar, Value};

/// A boolean function of one record.
///
/// ```
/// use sift::{CompareOp, Predicate, Scalar, Number};
///
/// let adult = Predicate::compare("age", CompareOp::Gte, Scalar::Number(Number::I64(18)));
/// let named = Predicate::text("name", sift::TextOp::StartsWith, "J");
/// let both = Predicate::all([adult, named]).unwrap();
/// assert_eq!(both.fields(), vec!["age", "name"]);
/// ```
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Relational comparison of a field against a scalar.
    Compare {
        field: String,
        op: CompareOp,
        value: Scalar,
    },
    /// Prefix, suffix, or substring test on a string field.
    Text {
        field: String,
        op: TextOp,
        value: String,
    },
    /// Regular-expression test on a string field.
    Regex { field: String, regex: Regex },
    /// True when a string field is missing or empty.
    NullOrEmpty { field: String },
    /// Set test on a collection field.
    Contains {
        field: String,
        mode: SetOp,
        set: Vec<Scalar>,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: Scalar) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn text(field: impl Into<String>, op: TextOp, value: impl Into<String>) -> Self {
        Predicate::Text {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn regex(field: impl Into<String>, regex: Regex) -> Self {
        Predicate::Regex {
            field: field.into(),
            regex,
        }
    }

    pub fn null_or_empty(field: impl Into<String>) -> Self {
        Predicate::NullOrEmpty {
            field: field.into(),
        }
    }

    pub fn contains(field: impl Into<String>, mode: SetOp, set: Vec<Scalar>) -> Self {
        Predicate::Contains {
            field: field.into(),
            mode,
            set,
        }
    }

    /// Logical negation.
    pub fn negate(self) -> Self {
        match self {
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }

    /// Conjunction of the given predicates.
    ///
    /// Returns `None` when the input is empty and the predicate itself when
    /// there is only one.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        Self::fold(predicates, Predicate::And)
    }

    /// Disjunction of the given predicates.
    ///
    /// Returns `None` when the input is empty and the predicate itself when
    /// there is only one.
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        Self::fold(predicates, Predicate::Or)
    }

    fn fold(
        predicates: impl IntoIterator<Item = Predicate>,
        group: fn(Vec<Predicate>) -> Predicate,
    ) -> Option<Self> {
        let mut predicates: Vec<Predicate> = predicates.into_iter().collect();
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(group(predicates)),
        }
    }

    /// Evaluates this predicate against a record.
    pub fn evaluate<R: Searchable>(&self, record: &R) -> bool {
        match self {
            Predicate::Compare { field, op, value } => {
                compare(&record.field_value(field), *op, value)
            }
            Predicate::Text { field, op, value } => match record.field_value(field) {
                Value::String(s) => op.eval(s, value),
                _ => false,
            },
            Predicate::Regex { field, regex } => match record.field_value(field) {
                Value::String(s) => regex.is_match(s),
                _ => false,
            },
            Predicate::NullOrEmpty { field } => match record.field_value(field) {
                Value::None => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            },
            Predicate::Contains { field, mode, set } => match record.field_value(field) {
                Value::List(items) => match mode {
                    SetOp::Any => items.iter().any(|item| set.iter().any(|s| s.matches(item))),
                    SetOp::All => set.iter().all(|s| items.iter().any(|item| s.matches(item))),
                },
                _ => false,
            },
            Predicate::And(children) => children.iter().all(|p| p.evaluate(record)),
            Predicate::Or(children) => children.iter().any(|p| p.evaluate(record)),
            Predicate::Not(inner) => !inner.evaluate(record),
        }
    }

    /// Record fields referenced anywhere in the tree, sorted and deduplicated.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields.into_iter().collect()
    }

    fn collect_fields<'a>(&'a self, fields: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::Compare { field, .. }
            | Predicate::Text { field, .. }
            | Predicate::Regex { field, .. }
            | Predicate::NullOrEmpty { field }
            | Predicate::Contains { field, .. } => {
                fields.insert(field.as_str());
            }
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.collect_fields(fields);
                }
            }
            Predicate::Not(inner) => inner.collect_fields(fields),
        }
    }
}

// A missing value is unequal to everything and unordered.
fn compare(field: &Value<'_>, op: CompareOp, operand: &Scalar) -> bool {
    match operand.compare_value(field) {
        Some(ordering) => {
            if op.is_ordering() && !orderable(operand) {
                return match op {
                    CompareOp::Gte | CompareOp::Lte => ordering == Ordering::Equal,
                    _ => false,
                };
            }
            op.eval_ordering(ordering)
        }
        None => op == CompareOp::Ne && field.is_none(),
    }
}

fn orderable(operand: &Scalar) -> bool {
    !matches!(operand, Scalar::Enum(_) | Scalar::Bool(_))
}

/// How several predicates over one filter are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplyType {
    /// Every predicate must hold.
    #[default]
    And,
    /// At least one predicate must hold.
    Or,
}

impl ApplyType {
    /// Combines predicates with this mode; `None` for an empty input.
    pub fn combine(self, predicates: impl IntoIterator<Item = Predicate>) -> Option<Predicate> {
        match self {
            ApplyType::And => Predicate::all(predicates),
            ApplyType::Or => Predicate::any(predicates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldKind, Number};

    struct Project {
        name: Option<String>,
        stars: i64,
        tags: Vec<String>,
    }

    impl Searchable for Project {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => match &self.name {
                    Some(name) => Value::String(name),
                    None => Value::None,
                },
                "stars" => Value::Number(Number::I64(self.stars)),
                "tags" => Value::List(self.tags.iter().map(|t| Value::String(t)).collect()),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "name" => Some(FieldKind::String),
                "stars" => Some(FieldKind::Number),
                "tags" => Some(FieldKind::List),
                _ => None,
            }
        }
    }

    fn project(name: Option<&str>, stars: i64, tags: &[&str]) -> Project {
        Project {
            name: name.map(str::to_string),
            stars,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn tags(values: &[&str]) -> Vec<Scalar> {
        values.iter().map(|v| Scalar::String(v.to_string())).collect()
    }

    #[test]
    fn compare_numbers() {
        let p = project(Some("a"), 20, &[]);
        let gt = Predicate::compare("stars", CompareOp::Gt, Scalar::Number(Number::I64(10)));
        let lt = Predicate::compare("stars", CompareOp::Lt, Scalar::Number(Number::I64(10)));
        assert!(gt.evaluate(&p));
        assert!(!lt.evaluate(&p));
    }

    #[test]
    fn missing_value_is_only_unequal() {
        let p = project(None, 0, &[]);
        let eq = Predicate::compare("name", CompareOp::Eq, Scalar::String("x".into()));
        let ne = Predicate::compare("name", CompareOp::Ne, Scalar::String("x".into()));
        let starts = Predicate::text("name", TextOp::StartsWith, "x");
        assert!(!eq.evaluate(&p));
        assert!(ne.evaluate(&p));
        assert!(!starts.evaluate(&p));
        assert!(starts.negate().evaluate(&p));
    }

    #[test]
    fn null_or_empty() {
        let pred = Predicate::null_or_empty("name");
        assert!(pred.evaluate(&project(None, 0, &[])));
        assert!(pred.evaluate(&project(Some(""), 0, &[])));
        assert!(!pred.evaluate(&project(Some("x"), 0, &[])));
    }

    #[test]
    fn contains_any_and_all() {
        let p = project(Some("b"), 0, &["Java", "Spring Boot"]);
        let any = Predicate::contains("tags", SetOp::Any, tags(&["Java", "Go"]));
        let all = Predicate::contains("tags", SetOp::All, tags(&["Java", "Spring Boot"]));
        let all_missing = Predicate::contains("tags", SetOp::All, tags(&["Java", "Kotlin"]));
        assert!(any.evaluate(&p));
        assert!(all.evaluate(&p));
        assert!(!all_missing.evaluate(&p));
    }

    #[test]
    fn contains_all_is_filter_subset_of_record() {
        // record has more tags than the filter set: still a match
        let p = project(Some("b"), 0, &["Java", "Spring Boot", "Maven"]);
        let all = Predicate::contains("tags", SetOp::All, tags(&["Java"]));
        assert!(all.evaluate(&p));

        // record is a subset of the filter set: not a match
        let q = project(Some("c"), 0, &["Java"]);
        let wide = Predicate::contains("tags", SetOp::All, tags(&["Java", "Maven"]));
        assert!(!wide.evaluate(&q));
    }

    #[test]
    fn combine_empty_is_none() {
        assert!(Predicate::all(Vec::new()).is_none());
        assert!(Predicate::any(Vec::new()).is_none());
        assert!(ApplyType::Or.combine(Vec::new()).is_none());
    }

    #[test]
    fn combine_single_is_unwrapped() {
        let single = Predicate::all([Predicate::null_or_empty("name")]);
        assert!(matches!(single, Some(Predicate::NullOrEmpty { .. })));
    }

    #[test]
    fn and_or_semantics() {
        let p = project(Some("Sally"), 3, &[]);
        let yes = Predicate::text("name", TextOp::StartsWith, "S");
        let no = Predicate::text("name", TextOp::EndsWith, "x");

        let and = ApplyType::And.combine([yes.clone(), no.clone()]).unwrap();
        let or = ApplyType::Or.combine([yes, no]).unwrap();
        assert!(!and.evaluate(&p));
        assert!(or.evaluate(&p));
    }

    #[test]
    fn double_negation_collapses() {
        let pred = Predicate::null_or_empty("name").negate().negate();
        assert!(matches!(pred, Predicate::NullOrEmpty { .. }));
    }

    #[test]
    fn enum_ordering_operators_do_not_order() {
        struct Flag(u32);
        impl Searchable for Flag {
            fn field_value(&self, _field: &str) -> Value<'_> {
                Value::Enum(self.0)
            }
            fn field_kind(_field: &str) -> Option<FieldKind> {
                Some(FieldKind::Enum)
            }
        }
        let gt = Predicate::compare("f", CompareOp::Gt, Scalar::Enum(1));
        let gte = Predicate::compare("f", CompareOp::Gte, Scalar::Enum(1));
        assert!(!gt.evaluate(&Flag(2)));
        assert!(gte.evaluate(&Flag(1)));
        assert!(!gte.evaluate(&Flag(2)));
    }

    #[test]
    fn fields_are_collected() {
        let pred = Predicate::all([
            Predicate::text("name", TextOp::Contains, "a"),
            Predicate::any([
                Predicate::null_or_empty("name"),
                Predicate::contains("tags", SetOp::Any, tags(&["x"])),
            ])
            .unwrap()
            .negate(),
        ])
        .unwrap();
        assert_eq!(pred.fields(), vec!["name", "tags"]);
    }
}
