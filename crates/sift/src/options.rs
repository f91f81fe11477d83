//! Search defaults a host application can load from its own configuration.

use serde::{Deserialize, Serialize};

/// When unknown fields and invalid values are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValidation {
    /// Errors surface when the offending field is applied.
    #[default]
    Lazy,
    /// Every field the pipeline would apply is checked when the search is
    /// created.
    Eager,
}

/// Options for [`search_with`](crate::search_with).
///
/// Every field is optional when deserializing.
///
/// ```
/// use sift::{FieldValidation, SearchOptions};
///
/// let options: SearchOptions =
///     serde_json::from_str(r#"{ "apply_paging": true, "validation": "eager" }"#).unwrap();
/// assert!(options.apply_paging);
/// assert!(!options.apply_all_properties);
/// assert_eq!(options.validation, FieldValidation::Eager);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Match Plain fields by equality.
    pub apply_all_properties: bool,
    /// Apply Skip and Take fields.
    pub apply_paging: bool,
    pub validation: FieldValidation,
}

impl SearchOptions {
    pub fn new() -> Self {
        SearchOptions::default()
    }

    pub fn apply_all_properties(mut self, yes: bool) -> Self {
        self.apply_all_properties = yes;
        self
    }

    pub fn apply_paging(mut self, yes: bool) -> Self {
        self.apply_paging = yes;
        self
    }

    pub fn validation(mut self, validation: FieldValidation) -> Self {
        self.validation = validation;
        self
    }
}
