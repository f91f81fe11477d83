//! Override configuration for one Filter field of a search.
//!
//! [`Search::configure`](crate::Search::configure) hands a [`Configuration`]
//! to the caller, who maps the field's filter onto one or more record fields
//! and picks how the resulting predicates combine. Selectors are checked as
//! they are added.

use std::marker::PhantomData;

use crate::error::Result;
use crate::filters::Filter;
use crate::predicate::{ApplyType, Predicate};
use crate::search::check_selector;
use crate::traits::Searchable;

/// Record-field mappings being collected for one specification field.
pub struct Configuration<'a, R> {
    field: &'static str,
    filter: &'a dyn Filter,
    targets: Vec<String>,
    _record: PhantomData<fn(&R)>,
}

impl<'a, R: Searchable> Configuration<'a, R> {
    pub(crate) fn new(field: &'static str, filter: &'a dyn Filter) -> Self {
        Configuration {
            field,
            filter,
            targets: Vec::new(),
            _record: PhantomData,
        }
    }

    /// The specification field being configured.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Record fields mapped so far, in order.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Adds a record field the filter is applied to.
    ///
    /// Fails with `InvalidFieldSelector` if the record has no such field or
    /// the filter cannot target its kind.
    pub fn map_to(mut self, field: &str) -> Result<Self> {
        check_selector::<R>(field, self.filter)?;
        self.targets.push(field.to_string());
        Ok(self)
    }

    /// Finishes the configuration, combining the mappings with `apply_type`.
    pub fn with_type(self, apply_type: ApplyType) -> FieldOverride {
        let predicates = self
            .targets
            .iter()
            .filter_map(|target| self.filter.build_predicate(target));
        FieldOverride {
            field: self.field,
            predicate: apply_type.combine(predicates),
        }
    }

    /// Finishes the configuration with AND.
    pub fn finish(self) -> FieldOverride {
        self.with_type(ApplyType::And)
    }
}

/// A finished configuration: the predicate that replaces the field's
/// default mapping.
///
/// Holds no predicate when nothing was mapped, in which case the search
/// keeps the default mapping.
#[derive(Debug, Clone)]
pub struct FieldOverride {
    field: &'static str,
    predicate: Option<Predicate>,
}

impl FieldOverride {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub(crate) fn into_predicate(self) -> Option<Predicate> {
        self.predicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::filters::{IntegerFilter, StringFilter};
    use crate::value::{FieldKind, Value};

    struct Employee {
        name: &'static str,
        title: &'static str,
    }

    impl Searchable for Employee {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(self.name),
                "title" => Value::String(self.title),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "name" | "title" => Some(FieldKind::String),
                "age" => Some(FieldKind::Number),
                _ => None,
            }
        }
    }

    #[test]
    fn collects_targets_in_order() {
        let filter = StringFilter::new().starts_with("S");
        let cfg = Configuration::<Employee>::new("term", &filter)
            .map_to("name")
            .unwrap()
            .map_to("title")
            .unwrap();
        assert_eq!(cfg.field(), "term");
        assert_eq!(cfg.targets(), ["name", "title"]);
    }

    #[test]
    fn or_combination() {
        let filter = StringFilter::new().starts_with("S");
        let finished = Configuration::<Employee>::new("term", &filter)
            .map_to("name")
            .unwrap()
            .map_to("title")
            .unwrap()
            .with_type(ApplyType::Or);
        let predicate = finished.predicate().unwrap();
        assert!(matches!(predicate, Predicate::Or(children) if children.len() == 2));

        let sally = Employee {
            name: "Sally",
            title: "HR",
        };
        let bob = Employee {
            name: "Bob",
            title: "Systems Engineer",
        };
        let dave = Employee {
            name: "Dave",
            title: "Developer",
        };
        assert!(predicate.evaluate(&sally));
        assert!(predicate.evaluate(&bob));
        assert!(!predicate.evaluate(&dave));
    }

    #[test]
    fn single_mapping_is_the_plain_predicate() {
        let filter = StringFilter::new().starts_with("S");
        let finished = Configuration::<Employee>::new("name", &filter)
            .map_to("name")
            .unwrap()
            .finish();
        assert!(matches!(finished.predicate(), Some(Predicate::Text { .. })));
    }

    #[test]
    fn no_mappings_means_no_predicate() {
        let filter = StringFilter::new().starts_with("S");
        let finished = Configuration::<Employee>::new("term", &filter).finish();
        assert!(finished.predicate().is_none());
    }

    #[test]
    fn unknown_selector_fails_fast() {
        let filter = StringFilter::new().starts_with("S");
        let err = Configuration::<Employee>::new("term", &filter)
            .map_to("department")
            .err()
            .unwrap();
        assert!(
            matches!(err, SearchError::InvalidFieldSelector { ref field, .. } if field == "department")
        );
    }

    #[test]
    fn kind_mismatch_fails_fast() {
        let filter = IntegerFilter::new().equal(3);
        let err = Configuration::<Employee>::new("term", &filter)
            .map_to("name")
            .err()
            .unwrap();
        assert!(matches!(err, SearchError::InvalidFieldSelector { .. }));
        assert!(err.to_string().contains("string field cannot take a number filter"));
    }
}
