use super::Filter;
use crate::op::CompareOp;
use crate::predicate::Predicate;
use crate::value::{FieldKind, Scalar};

/// Equality constraints on a boolean field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanFilter {
    pub equal: Option<bool>,
    pub not_equal: Option<bool>,
}

impl BooleanFilter {
    pub fn new() -> Self {
        BooleanFilter::default()
    }

    pub fn equal(mut self, value: bool) -> Self {
        self.equal = Some(value);
        self
    }

    pub fn not_equal(mut self, value: bool) -> Self {
        self.not_equal = Some(value);
        self
    }
}

impl Filter for BooleanFilter {
    fn has_active_constraint(&self) -> bool {
        self.equal.is_some() || self.not_equal.is_some()
    }

    fn build_predicate(&self, field: &str) -> Option<Predicate> {
        let eq = self
            .equal
            .map(|v| Predicate::compare(field, CompareOp::Eq, Scalar::Bool(v)));
        let ne = self
            .not_equal
            .map(|v| Predicate::compare(field, CompareOp::Ne, Scalar::Bool(v)));
        Predicate::all(eq.into_iter().chain(ne))
    }

    fn target_kind(&self) -> FieldKind {
        FieldKind::Bool
    }
}
