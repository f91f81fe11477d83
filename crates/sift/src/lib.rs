//! Sift - Declarative filter specifications compiled into predicates.
//!
//! Callers describe a search as a plain struct: a field per constraint,
//! each holding a leaf filter, a paging value, or a plain value. Sift
//! classifies those fields, builds a predicate for every active filter and
//! applies the result to a record source. It supports:
//!
//! - Leaf filters for strings, ordered values, booleans, enums and lists
//! - Derived field tables for records and specifications, no reflection
//! - Skip / Take paging, always applied skip-first
//! - One filter spread over several fields with AND or OR
//! - Per-field overrides replacing the default mapping
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{IntegerFilter, Records, Searchable, Specification, StringFilter};
//!
//! #[derive(Searchable)]
//! struct Person {
//!     #[search(String)]
//!     name: String,
//!     #[search(Number)]
//!     age: u32,
//! }
//!
//! #[derive(Default, Specification)]
//! struct PersonSearch {
//!     name: Option<StringFilter>,
//!     age: Option<IntegerFilter>,
//!     #[spec(skip)]
//!     skip: Option<u32>,
//!     #[spec(take)]
//!     take: Option<u32>,
//! }
//!
//! let people = vec![
//!     Person { name: "John Doe".into(), age: 20 },
//!     Person { name: "Johnny".into(), age: 25 },
//!     Person { name: "Jane".into(), age: 30 },
//!     Person { name: "John".into(), age: 21 },
//! ];
//!
//! let spec = PersonSearch {
//!     name: Some(StringFilter::new().starts_with("John")),
//!     skip: Some(1),
//!     take: Some(1),
//!     ..Default::default()
//! };
//!
//! let found = sift::search(Records::new(&people), &spec, false, true)
//!     .into_source()
//!     .unwrap();
//! assert_eq!(found.to_vec()[0].name, "Johnny");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! classify fields → filters (AND) → plain fields (apply-all only) → skip → take
//! ```
//!
//! - **Filter** fields hold a leaf filter. Unset or inactive filters are
//!   skipped; active ones are checked against the record field of the same
//!   name and ANDed into the source.
//! - **Plain** fields are matched by equality, only in apply-all mode.
//! - **Skip** / **Take** fields hold non-negative integers.
//!
//! # Filters
//!
//! | Filter | Record field | Constraints |
//! |--------|--------------|-------------|
//! | [`StringFilter`] | String | equal, not equal, starts/ends with, contains, negations, null-or-empty, regex |
//! | [`ComparableFilter`] | Number, Timestamp | equal, not equal, gt, gte, lt, lte |
//! | [`BooleanFilter`] | Bool | equal, not equal |
//! | [`EnumFilter`] | Enum | equal, not equal, in, not in |
//! | [`ListFilter`] | List | contains any/all, does not contain any/all |

extern crate self as sift;

mod configure;
mod error;
mod ext;
pub mod filters;
mod multi;
mod op;
mod options;
mod predicate;
mod search;
mod source;
mod traits;
mod value;

// Re-export public API
pub use configure::{Configuration, FieldOverride};
pub use error::{Result, SearchError};
pub use ext::SearchExt;
pub use filters::{
    BooleanFilter, ComparableFilter, DateTimeFilter, DoubleFilter, EnumFilter, Filter,
    FloatFilter, IntegerFilter, ListFilter, LongFilter, ShortFilter, StringFilter,
};
pub use multi::{search_multi_field, MultiSearch};
pub use op::{CompareOp, SetOp, TextOp};
pub use options::{FieldValidation, SearchOptions};
pub use predicate::{ApplyType, Predicate};
pub use search::{search, search_single_field, search_with, Search, Transform};
pub use source::{Plan, Records, Source, Step};
pub use traits::{
    EnumValue, FieldDescriptor, FieldRole, ScalarSource, SearchEnum, Searchable, SpecValue,
    Specification,
};
pub use value::{FieldKind, ListValue, Number, Scalar, Timestamp, ToScalar, ToValue, Value};

// Derive macros share names with the traits they implement.
pub use sift_macros::{Searchable, Specification};
