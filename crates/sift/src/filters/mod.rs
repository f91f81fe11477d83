//! Leaf filter kinds.
//!
//! A leaf filter is a self-contained set of constraints on one record field.
//! Every kind reports whether any constraint is set and, if so, builds the
//! predicate for a named target field. Set constraints within one filter
//! always combine with AND.
//!
//! | Filter | Target field | Constraints |
//! |--------|--------------|-------------|
//! | [`StringFilter`] | String | equal, starts/ends with, contains, their negations, null-or-empty, regex |
//! | [`ComparableFilter`] | Number / Timestamp | equal, not equal, gt, gte, lt, lte |
//! | [`BooleanFilter`] | Bool | equal, not equal |
//! | [`EnumFilter`] | Enum | equal, not equal, in, not in |
//! | [`ListFilter`] | List | contains any/all, does not contain any/all |

mod boolean;
mod comparable;
mod enumeration;
mod list;
mod string;

pub use boolean::BooleanFilter;
pub use comparable::{
    ComparableFilter, DateTimeFilter, DoubleFilter, FloatFilter, IntegerFilter, LongFilter,
    ShortFilter,
};
pub use enumeration::EnumFilter;
pub use list::ListFilter;
pub use string::StringFilter;

use crate::predicate::Predicate;
use crate::value::FieldKind;

/// The leaf-filter capability.
///
/// Implement this for custom filter types and mark the specification field
/// with `#[spec(filter)]` so the derive classifies it as a Filter field.
pub trait Filter {
    /// Returns `true` if at least one constraint is set.
    ///
    /// Inactive filters are skipped entirely by the search pipeline.
    fn has_active_constraint(&self) -> bool;

    /// Builds the predicate for the given record field.
    ///
    /// Returns `None` when no constraint is set, so callers never end up
    /// with an empty conjunction.
    fn build_predicate(&self, field: &str) -> Option<Predicate>;

    /// The record field kind this filter is written against.
    fn target_kind(&self) -> FieldKind;

    /// Element kind for filters over collection fields.
    fn element_kind(&self) -> Option<FieldKind> {
        None
    }

    /// Returns `true` if this filter can be applied to a field of `kind`.
    fn accepts(&self, kind: FieldKind) -> bool {
        kind == self.target_kind()
    }
}

/// A string operand; blank strings count as unset.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
