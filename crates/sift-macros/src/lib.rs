//! Derive macros for sift.
//!
//! - [`Searchable`] - field accessor and field kinds for record types
//! - [`Specification`] - field descriptor table for filter specifications
//!
//! Both also generate SCREAMING_SNAKE field name constants
//! (`Person::NAME`) to use as field selectors. Generated code refers to
//! the `sift` crate, which re-exports these derives.

mod case;
mod searchable;
mod specification;

use proc_macro::TokenStream;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Token};

/// Derives `sift::Searchable` for a record struct.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | String field (`String`, `&str`, or an `Option` of either) |
/// | `Number` | Any primitive integer or float, or an `Option` of one |
/// | `Timestamp` | `sift::Timestamp` or `Option<Timestamp>` |
/// | `Enum` | A type implementing `sift::SearchEnum`, or an `Option` of one |
/// | `Bool` | `bool` or `Option<bool>` |
/// | `List` | `Vec`, array, slice, `VecDeque`, `BTreeSet` or `HashSet` of scalars, or an `Option` of one |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom field name |
///
/// Fields without an attribute are not searchable.
///
/// # Example
///
/// ```ignore
/// use sift::Searchable;
///
/// #[derive(Searchable)]
/// struct Project {
///     #[search(String)]
///     name: String,
///
///     #[search(List)]
///     tags: Vec<String>,
///
///     #[search(skip)]
///     internal_id: u64,
/// }
///
/// assert_eq!(Project::TAGS, "tags");
/// ```
#[proc_macro_derive(Searchable, attributes(search))]
pub fn searchable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    searchable::searchable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives `sift::Specification` for a filter specification struct.
///
/// Roles are assigned per field, in declaration order:
///
/// | Field | Role |
/// |-------|------|
/// | Type is a sift leaf filter, optionally in `Option` | Filter |
/// | `#[spec(filter)]` | Filter (custom `sift::Filter` types) |
/// | `#[spec(skip)]` | Skip |
/// | `#[spec(take)]` | Take |
/// | `#[spec(ignore)]` | Not listed |
/// | anything else | Plain, must implement `sift::ToScalar` |
///
/// `#[spec(rename = "...")]` targets a differently named record field.
///
/// # Example
///
/// ```ignore
/// use sift::{IntegerFilter, Specification, StringFilter};
///
/// #[derive(Default, Specification)]
/// struct PersonSearch {
///     name: Option<StringFilter>,
///     age: Option<IntegerFilter>,
///     #[spec(skip)]
///     skip: u32,
///     #[spec(take)]
///     take: Option<u32>,
/// }
/// ```
#[proc_macro_derive(Specification, attributes(spec))]
pub fn specification_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    specification::specification_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// The named fields of a struct, or an error naming the derive.
pub(crate) fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(&named.named),
            _ => Err(Error::new(
                input.span(),
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(Error::new(
            input.span(),
            format!("{derive} can only be derived for structs"),
        )),
    }
}
