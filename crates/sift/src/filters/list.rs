use super::Filter;
use crate::op::SetOp;
use crate::predicate::Predicate;
use crate::value::{FieldKind, Scalar, ToScalar};

/// Set constraints on a collection field.
///
/// `contains_all` holds when every value of the set appears in the record's
/// collection; extra record elements do not matter. Empty sets are unset.
///
/// ```
/// use sift::{Filter, ListFilter};
///
/// let filter = ListFilter::<String>::new()
///     .contains_any(["Java", "Python"])
///     .does_not_contain_all(["C#", "ASP.NET"]);
/// assert!(filter.has_active_constraint());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter<T> {
    pub contains_any: Vec<T>,
    pub contains_all: Vec<T>,
    pub does_not_contain_any: Vec<T>,
    pub does_not_contain_all: Vec<T>,
}

impl<T> Default for ListFilter<T> {
    fn default() -> Self {
        ListFilter {
            contains_any: Vec::new(),
            contains_all: Vec::new(),
            does_not_contain_any: Vec::new(),
            does_not_contain_all: Vec::new(),
        }
    }
}

impl<T> ListFilter<T> {
    pub fn new() -> Self {
        ListFilter::default()
    }

    pub fn contains_any<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.contains_any.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn contains_all<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.contains_all.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn does_not_contain_any<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.does_not_contain_any
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn does_not_contain_all<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.does_not_contain_all
            .extend(values.into_iter().map(Into::into));
        self
    }

    fn operands(&self) -> [(&[T], SetOp, bool); 4] {
        [
            (self.contains_any.as_slice(), SetOp::Any, false),
            (self.contains_all.as_slice(), SetOp::All, false),
            (self.does_not_contain_any.as_slice(), SetOp::Any, true),
            (self.does_not_contain_all.as_slice(), SetOp::All, true),
        ]
    }
}

impl<T: ToScalar> Filter for ListFilter<T> {
    fn has_active_constraint(&self) -> bool {
        self.operands().iter().any(|(set, _, _)| !set.is_empty())
    }

    fn build_predicate(&self, field: &str) -> Option<Predicate> {
        let clauses = self
            .operands()
            .into_iter()
            .filter(|(set, _, _)| !set.is_empty())
            .map(|(set, mode, negated)| {
                let set: Vec<Scalar> = set.iter().filter_map(ToScalar::to_scalar).collect();
                let clause = Predicate::contains(field, mode, set);
                if negated {
                    clause.negate()
                } else {
                    clause
                }
            });
        Predicate::all(clauses)
    }

    fn target_kind(&self) -> FieldKind {
        FieldKind::List
    }

    fn element_kind(&self) -> Option<FieldKind> {
        Some(T::KIND)
    }
}
