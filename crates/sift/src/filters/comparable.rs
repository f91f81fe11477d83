use super::Filter;
use crate::op::CompareOp;
use crate::predicate::Predicate;
use crate::value::{FieldKind, Timestamp, ToScalar};

/// Relational constraints on an ordered field.
///
/// `T` is any scalar with a total order: integers, floats, [`Timestamp`],
/// or `String` for lexical ranges.
///
/// ```
/// use sift::{ComparableFilter, Filter};
///
/// let in_stock = ComparableFilter::<i32>::new().greater_than(10).less_than_or_equal(50);
/// assert!(in_stock.has_active_constraint());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ComparableFilter<T> {
    pub equal: Option<T>,
    pub not_equal: Option<T>,
    pub greater_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than: Option<T>,
    pub less_than_or_equal: Option<T>,
}

/// `i32` range filter.
pub type IntegerFilter = ComparableFilter<i32>;
/// `i64` range filter.
pub type LongFilter = ComparableFilter<i64>;
/// `i16` range filter.
pub type ShortFilter = ComparableFilter<i16>;
/// `f32` range filter.
pub type FloatFilter = ComparableFilter<f32>;
/// `f64` range filter.
pub type DoubleFilter = ComparableFilter<f64>;
/// Date and time range filter.
pub type DateTimeFilter = ComparableFilter<Timestamp>;

impl<T> Default for ComparableFilter<T> {
    fn default() -> Self {
        ComparableFilter {
            equal: None,
            not_equal: None,
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T> ComparableFilter<T> {
    pub fn new() -> Self {
        ComparableFilter::default()
    }

    pub fn equal(mut self, value: T) -> Self {
        self.equal = Some(value);
        self
    }

    pub fn not_equal(mut self, value: T) -> Self {
        self.not_equal = Some(value);
        self
    }

    pub fn greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    pub fn greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    pub fn less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    pub fn less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }

    /// Inclusive range `low..=high`.
    pub fn between(self, low: T, high: T) -> Self {
        self.greater_than_or_equal(low).less_than_or_equal(high)
    }

    fn operands(&self) -> [(&Option<T>, CompareOp); 6] {
        [
            (&self.equal, CompareOp::Eq),
            (&self.not_equal, CompareOp::Ne),
            (&self.greater_than, CompareOp::Gt),
            (&self.greater_than_or_equal, CompareOp::Gte),
            (&self.less_than, CompareOp::Lt),
            (&self.less_than_or_equal, CompareOp::Lte),
        ]
    }
}

impl<T: ToScalar> Filter for ComparableFilter<T> {
    fn has_active_constraint(&self) -> bool {
        self.operands().iter().any(|(v, _)| v.is_some())
    }

    fn build_predicate(&self, field: &str) -> Option<Predicate> {
        let clauses = self.operands().into_iter().filter_map(|(operand, op)| {
            operand
                .as_ref()
                .and_then(ToScalar::to_scalar)
                .map(|value| Predicate::compare(field, op, value))
        });
        Predicate::all(clauses)
    }

    fn target_kind(&self) -> FieldKind {
        T::KIND
    }
}
