use super::Filter;
use crate::op::CompareOp;
use crate::predicate::Predicate;
use crate::traits::SearchEnum;
use crate::value::{FieldKind, Scalar};

/// Membership and equality constraints on an enum field.
///
/// ```
/// use sift::{EnumFilter, Filter, SearchEnum};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Status { Open, Closed, Archived }
///
/// impl SearchEnum for Status {
///     fn discriminant(&self) -> u32 {
///         *self as u32
///     }
/// }
///
/// let filter = EnumFilter::new().is_in([Status::Open, Status::Closed]);
/// assert!(filter.has_active_constraint());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnumFilter<E> {
    pub equal: Option<E>,
    pub not_equal: Option<E>,
    pub is_in: Vec<E>,
    pub not_in: Vec<E>,
}

impl<E> Default for EnumFilter<E> {
    fn default() -> Self {
        EnumFilter {
            equal: None,
            not_equal: None,
            is_in: Vec::new(),
            not_in: Vec::new(),
        }
    }
}

impl<E> EnumFilter<E> {
    pub fn new() -> Self {
        EnumFilter::default()
    }

    pub fn equal(mut self, value: E) -> Self {
        self.equal = Some(value);
        self
    }

    pub fn not_equal(mut self, value: E) -> Self {
        self.not_equal = Some(value);
        self
    }

    pub fn is_in(mut self, values: impl IntoIterator<Item = E>) -> Self {
        self.is_in.extend(values);
        self
    }

    pub fn not_in(mut self, values: impl IntoIterator<Item = E>) -> Self {
        self.not_in.extend(values);
        self
    }
}

fn discriminant<E: SearchEnum>(field: &str, op: CompareOp, value: &E) -> Predicate {
    Predicate::compare(field, op, Scalar::Enum(value.discriminant()))
}

impl<E: SearchEnum> Filter for EnumFilter<E> {
    fn has_active_constraint(&self) -> bool {
        self.equal.is_some()
            || self.not_equal.is_some()
            || !self.is_in.is_empty()
            || !self.not_in.is_empty()
    }

    fn build_predicate(&self, field: &str) -> Option<Predicate> {
        let mut clauses = Vec::new();

        if let Some(v) = &self.equal {
            clauses.push(discriminant(field, CompareOp::Eq, v));
        }
        if let Some(v) = &self.not_equal {
            clauses.push(discriminant(field, CompareOp::Ne, v));
        }
        clauses.extend(Predicate::any(
            self.is_in.iter().map(|v| discriminant(field, CompareOp::Eq, v)),
        ));
        clauses.extend(Predicate::all(
            self.not_in.iter().map(|v| discriminant(field, CompareOp::Ne, v)),
        ));

        Predicate::all(clauses)
    }

    fn target_kind(&self) -> FieldKind {
        FieldKind::Enum
    }
}
