use regex::Regex;

use super::{non_blank, Filter};
use crate::error::Result;
use crate::op::{CompareOp, TextOp};
use crate::predicate::Predicate;
use crate::value::{FieldKind, Scalar};

/// Constraints on a string field.
///
/// Blank (empty or whitespace-only) operands count as unset.
///
/// ```
/// use sift::{Filter, StringFilter};
///
/// let filter = StringFilter::new().starts_with("John").not_contains("Doe");
/// assert!(filter.has_active_constraint());
/// assert!(!StringFilter::new().equal("   ").has_active_constraint());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringFilter {
    pub equal: Option<String>,
    pub not_equal: Option<String>,
    pub starts_with: Option<String>,
    pub not_starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub not_ends_with: Option<String>,
    pub contains: Option<String>,
    pub not_contains: Option<String>,
    /// `Some(true)` keeps missing or empty values, `Some(false)` drops them.
    pub is_null_or_empty: Option<bool>,
    pub matches: Option<Regex>,
    pub not_matches: Option<Regex>,
}

impl StringFilter {
    pub fn new() -> Self {
        StringFilter::default()
    }

    pub fn equal(mut self, value: impl Into<String>) -> Self {
        self.equal = Some(value.into());
        self
    }

    pub fn not_equal(mut self, value: impl Into<String>) -> Self {
        self.not_equal = Some(value.into());
        self
    }

    pub fn starts_with(mut self, value: impl Into<String>) -> Self {
        self.starts_with = Some(value.into());
        self
    }

    pub fn not_starts_with(mut self, value: impl Into<String>) -> Self {
        self.not_starts_with = Some(value.into());
        self
    }

    pub fn ends_with(mut self, value: impl Into<String>) -> Self {
        self.ends_with = Some(value.into());
        self
    }

    pub fn not_ends_with(mut self, value: impl Into<String>) -> Self {
        self.not_ends_with = Some(value.into());
        self
    }

    pub fn contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    pub fn not_contains(mut self, value: impl Into<String>) -> Self {
        self.not_contains = Some(value.into());
        self
    }

    pub fn is_null_or_empty(mut self, value: bool) -> Self {
        self.is_null_or_empty = Some(value);
        self
    }

    /// Requires the value to match a regular expression.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn matches(mut self, pattern: &str) -> Result<Self> {
        self.matches = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Requires the value not to match a regular expression.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn not_matches(mut self, pattern: &str) -> Result<Self> {
        self.not_matches = Some(Regex::new(pattern)?);
        Ok(self)
    }

    fn text_operands(&self) -> [(Option<&str>, TextOp, bool); 6] {
        [
            (non_blank(&self.starts_with), TextOp::StartsWith, false),
            (non_blank(&self.not_starts_with), TextOp::StartsWith, true),
            (non_blank(&self.ends_with), TextOp::EndsWith, false),
            (non_blank(&self.not_ends_with), TextOp::EndsWith, true),
            (non_blank(&self.contains), TextOp::Contains, false),
            (non_blank(&self.not_contains), TextOp::Contains, true),
        ]
    }
}

impl Filter for StringFilter {
    fn has_active_constraint(&self) -> bool {
        self.is_null_or_empty.is_some()
            || non_blank(&self.equal).is_some()
            || non_blank(&self.not_equal).is_some()
            || self.text_operands().iter().any(|(v, _, _)| v.is_some())
            || self.matches.is_some()
            || self.not_matches.is_some()
    }

    fn build_predicate(&self, field: &str) -> Option<Predicate> {
        let mut clauses = Vec::new();

        if let Some(v) = non_blank(&self.equal) {
            clauses.push(Predicate::compare(field, CompareOp::Eq, Scalar::String(v.into())));
        }
        if let Some(v) = non_blank(&self.not_equal) {
            clauses.push(Predicate::compare(field, CompareOp::Ne, Scalar::String(v.into())));
        }

        for (operand, op, negated) in self.text_operands() {
            if let Some(v) = operand {
                let clause = Predicate::text(field, op, v);
                clauses.push(if negated { clause.negate() } else { clause });
            }
        }

        if let Some(regex) = &self.matches {
            clauses.push(Predicate::regex(field, regex.clone()));
        }
        if let Some(regex) = &self.not_matches {
            clauses.push(Predicate::regex(field, regex.clone()).negate());
        }

        match self.is_null_or_empty {
            Some(true) => clauses.push(Predicate::null_or_empty(field)),
            Some(false) => clauses.push(Predicate::null_or_empty(field).negate()),
            None => {}
        }

        Predicate::all(clauses)
    }

    fn target_kind(&self) -> FieldKind {
        FieldKind::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Searchable;
    use crate::value::Value;

    struct Person {
        name: Option<String>,
    }

    impl Searchable for Person {
        fn field_value(&self, field: &str) -> Value<'_> {
            match (field, &self.name) {
                ("name", Some(name)) => Value::String(name),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            (field == "name").then_some(FieldKind::String)
        }
    }

    fn people(names: &[Option<&str>]) -> Vec<Person> {
        names
            .iter()
            .map(|n| Person {
                name: n.map(str::to_string),
            })
            .collect()
    }

    fn matching(filter: &StringFilter, names: &[Option<&str>]) -> Vec<Option<String>> {
        let predicate = filter.build_predicate("name").expect("active filter");
        people(names)
            .into_iter()
            .filter(|p| predicate.evaluate(p))
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn starts_with() {
        let filter = StringFilter::new().starts_with("John");
        let found = matching(&filter, &[Some("John Doe"), Some("Johnny"), Some("Jane")]);
        assert_eq!(found, vec![Some("John Doe".into()), Some("Johnny".into())]);
    }

    #[test]
    fn is_null_or_empty_true() {
        let filter = StringFilter::new().is_null_or_empty(true);
        let found = matching(&filter, &[Some("John"), Some(""), None]);
        assert_eq!(found, vec![Some(String::new()), None]);
    }

    #[test]
    fn is_null_or_empty_false() {
        let filter = StringFilter::new().is_null_or_empty(false);
        let found = matching(&filter, &[Some("John"), Some(""), None]);
        assert_eq!(found, vec![Some("John".into())]);
    }

    #[test]
    fn not_equal() {
        let filter = StringFilter::new().not_equal("Jane");
        let found = matching(&filter, &[Some("John"), Some("Jane"), Some("Johnny")]);
        assert_eq!(found.len(), 2);
        assert!(!found.contains(&Some("Jane".into())));
    }

    #[test]
    fn negated_text_operators() {
        let filter = StringFilter::new()
            .not_starts_with("J")
            .not_ends_with("y")
            .not_contains("o");
        let found = matching(&filter, &[Some("Tom"), Some("Amy"), Some("Bea"), Some("Jim")]);
        assert_eq!(found, vec![Some("Bea".into())]);
    }

    #[test]
    fn all_clauses_are_anded() {
        let filter = StringFilter::new().starts_with("J").ends_with("n").contains("oh");
        let found = matching(&filter, &[Some("John"), Some("Joan"), Some("Johnny")]);
        assert_eq!(found, vec![Some("John".into())]);
    }

    #[test]
    fn regex_clauses() {
        let filter = StringFilter::new()
            .matches(r"^J\w+$")
            .unwrap()
            .not_matches("nn")
            .unwrap();
        let found = matching(&filter, &[Some("John"), Some("Johnny"), Some("John Doe")]);
        assert_eq!(found, vec![Some("John".into())]);
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(StringFilter::new().matches("(unclosed").is_err());
    }

    #[test]
    fn blank_operands_are_inactive() {
        let filter = StringFilter {
            equal: Some(String::new()),
            contains: Some("  ".into()),
            ..StringFilter::default()
        };
        assert!(!filter.has_active_constraint());
        assert!(filter.build_predicate("name").is_none());
    }

    #[test]
    fn blank_operand_is_ignored_next_to_active_one() {
        let filter = StringFilter {
            starts_with: Some("Jo".into()),
            ends_with: Some(" ".into()),
            ..StringFilter::default()
        };
        let found = matching(&filter, &[Some("John"), Some("Jo ")]);
        assert_eq!(found, vec![Some("John".into()), Some("Jo ".into())]);
    }
}
