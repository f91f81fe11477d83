//! Error types for the sift crate.

use thiserror::Error;

use crate::value::FieldKind;

/// Errors that can occur when building or applying a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A specification field names a record field that does not exist.
    #[error("unknown field '{field}': the record type has no such field")]
    UnknownField { field: String },

    /// A Skip or Take field holds a value that is not a non-negative integer.
    #[error("invalid paging value for '{field}': expected a non-negative integer, got {value}")]
    InvalidPagingValue { field: String, value: String },

    /// A field selector passed to `configure`, `map_to` or `on` is not usable.
    #[error("invalid field selector '{field}': {reason}")]
    InvalidFieldSelector { field: String, reason: String },

    /// A filter or plain value does not fit the kind of the record field.
    #[error("type mismatch on '{field}': record field is {expected}, value targets {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

impl SearchError {
    pub(crate) fn unknown_field(field: &str) -> Self {
        SearchError::UnknownField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_selector(field: &str, reason: impl Into<String>) -> Self {
        SearchError::InvalidFieldSelector {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// The specification or record field the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            SearchError::UnknownField { field }
            | SearchError::InvalidPagingValue { field, .. }
            | SearchError::InvalidFieldSelector { field, .. }
            | SearchError::TypeMismatch { field, .. } => Some(field),
            SearchError::InvalidRegex(_) => None,
        }
    }
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, SearchError>;
