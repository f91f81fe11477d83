//! One filter applied across several record fields.

use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::filters::Filter;
use crate::predicate::{ApplyType, Predicate};
use crate::search::check_selector;
use crate::source::Source;

/// Starts a multi-field search for `filter` with the given combination mode.
///
/// ```
/// use sift::{ApplyType, Records, Searchable, StringFilter};
///
/// #[derive(Searchable)]
/// struct Employee {
///     #[search(String)]
///     name: String,
///     #[search(String)]
///     title: String,
/// }
///
/// let staff = vec![
///     Employee { name: "Sally".into(), title: "HR".into() },
///     Employee { name: "Sam".into(), title: "Software Engineer".into() },
///     Employee { name: "Dave".into(), title: "Developer".into() },
/// ];
/// let filter = StringFilter::new().starts_with("S");
///
/// let any = sift::search_multi_field(Records::new(&staff), &filter, ApplyType::Or)
///     .on(Employee::NAME).unwrap()
///     .on(Employee::TITLE).unwrap()
///     .apply();
/// assert_eq!(any.count(), 2);
///
/// let all = sift::search_multi_field(Records::new(&staff), &filter, ApplyType::And)
///     .on(Employee::NAME).unwrap()
///     .on(Employee::TITLE).unwrap()
///     .apply();
/// assert_eq!(all.count(), 1);
/// ```
pub fn search_multi_field<'f, Src, F>(
    source: Src,
    filter: &'f F,
    apply_type: ApplyType,
) -> MultiSearch<'f, Src>
where
    Src: Source,
    F: Filter,
{
    MultiSearch::new(source, filter, apply_type)
}

/// Accumulates one predicate per target field and combines them when applied.
pub struct MultiSearch<'f, Src> {
    source: Src,
    filter: &'f dyn Filter,
    apply_type: ApplyType,
    predicates: Vec<Predicate>,
}

impl<'f, Src: Source> MultiSearch<'f, Src> {
    pub fn new(source: Src, filter: &'f dyn Filter, apply_type: ApplyType) -> Self {
        MultiSearch {
            source,
            filter,
            apply_type,
            predicates: Vec::new(),
        }
    }

    pub fn apply_type(&self) -> ApplyType {
        self.apply_type
    }

    /// Predicates collected so far, one per target field.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Adds a target record field.
    ///
    /// An inactive filter makes this a no-op that accepts any selector.
    /// Otherwise fails with `InvalidFieldSelector` if the record has no such
    /// field or the filter cannot target its kind.
    pub fn on(mut self, field: &str) -> Result<Self> {
        if !self.filter.has_active_constraint() {
            return Ok(self);
        }
        check_selector::<Src::Record>(field, self.filter)?;
        self.predicates.extend(self.filter.build_predicate(field));
        Ok(self)
    }

    /// The combined predicate, or `None` when no field was added.
    pub fn predicate(&self) -> Option<Predicate> {
        self.apply_type.combine(self.predicates.iter().cloned())
    }

    /// Applies the combined predicate once and returns the source.
    pub fn apply(self) -> Src {
        match self.apply_type.combine(self.predicates) {
            Some(predicate) => {
                debug!(mode = ?self.apply_type, fields = ?predicate.fields(), "multi-field filter applied");
                self.source.filter_by(predicate)
            }
            None => self.source,
        }
    }
}

impl<Src: Clone> Clone for MultiSearch<'_, Src> {
    fn clone(&self) -> Self {
        MultiSearch {
            source: self.source.clone(),
            filter: self.filter,
            apply_type: self.apply_type,
            predicates: self.predicates.clone(),
        }
    }
}

impl<Src: fmt::Debug> fmt::Debug for MultiSearch<'_, Src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSearch")
            .field("source", &self.source)
            .field("apply_type", &self.apply_type)
            .field("predicates", &self.predicates)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::filters::{BooleanFilter, StringFilter};
    use crate::source::Plan;
    use crate::traits::Searchable;
    use crate::value::{FieldKind, Value};

    struct Staff;

    impl Searchable for Staff {
        fn field_value(&self, _field: &str) -> Value<'_> {
            Value::None
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "name" | "title" | "specialty" => Some(FieldKind::String),
                "remote" => Some(FieldKind::Bool),
                _ => None,
            }
        }
    }

    #[test]
    fn appends_one_predicate_per_field() {
        let filter = StringFilter::new().starts_with("S");
        let multi = search_multi_field(Plan::<Staff>::new(), &filter, ApplyType::Or)
            .on("name")
            .unwrap()
            .on("title")
            .unwrap()
            .on("specialty")
            .unwrap();
        assert_eq!(multi.predicates().len(), 3);
        assert_eq!(
            multi.predicate().unwrap().fields(),
            vec!["name", "specialty", "title"]
        );

        let plan = multi.apply();
        assert_eq!(plan.steps().len(), 1);
    }

    #[test]
    fn inactive_filter_is_a_no_op() {
        let filter = StringFilter::new();
        let multi = search_multi_field(Plan::<Staff>::new(), &filter, ApplyType::And)
            .on("name")
            .unwrap()
            .on("no_such_field")
            .unwrap();
        assert!(multi.predicates().is_empty());
        assert!(multi.apply().is_empty());
    }

    #[test]
    fn no_fields_leaves_source_unchanged() {
        let filter = StringFilter::new().contains("x");
        let plan = search_multi_field(Plan::<Staff>::new(), &filter, ApplyType::Or).apply();
        assert!(plan.is_empty());
    }

    #[test]
    fn invalid_selectors_fail_fast() {
        let filter = StringFilter::new().contains("x");
        let unknown = search_multi_field(Plan::<Staff>::new(), &filter, ApplyType::Or).on("salary");
        assert!(matches!(
            unknown,
            Err(SearchError::InvalidFieldSelector { ref field, .. }) if field == "salary"
        ));

        let flag = BooleanFilter::new().equal(true);
        let mismatch = search_multi_field(Plan::<Staff>::new(), &flag, ApplyType::Or).on("name");
        assert!(matches!(mismatch, Err(SearchError::InvalidFieldSelector { .. })));
    }
}
