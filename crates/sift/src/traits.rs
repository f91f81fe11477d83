//! Static field introspection for records and filter specifications.
//!
//! [`Searchable`] describes the record side: how to read a field and what
//! kind it has. [`Specification`] describes the filter-object side: a
//! descriptor table listing each field with its [`FieldRole`], plus access
//! to the field's current value. Both are normally derived with
//! `#[derive(Searchable)]` and `#[derive(Specification)]`.

use std::fmt;

use crate::filters::Filter;
use crate::value::{FieldKind, Scalar, Value};

/// A record type that predicates can be evaluated against.
///
/// # Derive Usage
///
/// ```
/// use sift::Searchable;
///
/// #[derive(Searchable)]
/// struct Person {
///     #[search(String)]
///     name: String,
///     #[search(Number)]
///     age: u32,
///     #[search(List)]
///     tags: Vec<String>,
/// }
///
/// assert_eq!(Person::NAME, "name");
/// assert!(Person::has_field("tags"));
/// ```
///
/// # Manual Implementation
///
/// ```
/// use sift::{FieldKind, Number, Searchable, Value};
///
/// struct Product {
///     name: String,
///     stock: u32,
/// }
///
/// impl Searchable for Product {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "stock" => Value::Number(Number::from(self.stock)),
///             _ => Value::None,
///         }
///     }
///
///     fn field_kind(field: &str) -> Option<FieldKind> {
///         match field {
///             "name" => Some(FieldKind::String),
///             "stock" => Some(FieldKind::Number),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Searchable {
    /// Returns the value of a field, or [`Value::None`] if the field is
    /// unknown or currently null.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns the declared kind of a field, or `None` if the record type has
    /// no such field.
    fn field_kind(field: &str) -> Option<FieldKind>;

    /// Returns the element kind of a `List` field, or `None` if the field is
    /// not a list or its element kind is not declared.
    fn element_kind(_field: &str) -> Option<FieldKind> {
        None
    }

    fn has_field(field: &str) -> bool {
        Self::field_kind(field).is_some()
    }
}

/// Maps an enum to a stable discriminant for `Enum` fields and filters.
///
/// ```
/// use sift::SearchEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending,
///     Active,
/// }
///
/// impl SearchEnum for Status {
///     fn discriminant(&self) -> u32 {
///         match self {
///             Status::Pending => 0,
///             Status::Active => 1,
///         }
///     }
/// }
/// ```
pub trait SearchEnum {
    /// Use explicit values rather than declaration order so that stored or
    /// transmitted discriminants stay valid when variants are added.
    fn discriminant(&self) -> u32;
}

/// Conversion of an `Enum` record field into a [`Value`].
///
/// Implemented for every [`SearchEnum`] and for `Option` of one, where
/// `None` is a missing value. Used by `#[derive(Searchable)]`.
pub trait EnumValue {
    fn enum_value(&self) -> Value<'_>;
}

impl<E: SearchEnum> EnumValue for E {
    fn enum_value(&self) -> Value<'_> {
        Value::Enum(self.discriminant())
    }
}

impl<E: SearchEnum> EnumValue for Option<E> {
    fn enum_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.enum_value(),
            None => Value::None,
        }
    }
}

/// Role of a specification field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Holds a leaf filter applied to the same-named record field.
    Filter,
    /// Holds the number of records to skip.
    Skip,
    /// Holds the maximum number of records to return.
    Take,
    /// Any other field; matched by equality in apply-all mode.
    Plain,
}

impl FieldRole {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldRole::Filter => "filter",
            FieldRole::Skip => "skip",
            FieldRole::Take => "take",
            FieldRole::Plain => "plain",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a specification's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name; also the record field a Filter or Plain field targets.
    pub name: &'static str,
    pub role: FieldRole,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, role: FieldRole) -> Self {
        FieldDescriptor { name, role }
    }
}

/// Current value of a specification field.
#[derive(Clone, Copy)]
pub enum SpecValue<'a> {
    /// A Filter field; `None` when the filter is unset.
    Filter(Option<&'a dyn Filter>),
    /// A Skip, Take, or Plain field; `None` when unset.
    Scalar(Option<&'a dyn ScalarSource>),
    /// No field of that name.
    Missing,
}

impl fmt::Debug for SpecValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Filter(Some(_)) => f.write_str("Filter(set)"),
            SpecValue::Filter(None) => f.write_str("Filter(unset)"),
            SpecValue::Scalar(Some(v)) => write!(f, "Scalar({:?})", v.scalar()),
            SpecValue::Scalar(None) => f.write_str("Scalar(unset)"),
            SpecValue::Missing => f.write_str("Missing"),
        }
    }
}

/// Object-safe access to a specification field's scalar value.
///
/// Implemented for every [`ToScalar`](crate::ToScalar) type.
pub trait ScalarSource {
    fn scalar(&self) -> Option<Scalar>;
}

impl<T: crate::value::ToScalar> ScalarSource for T {
    fn scalar(&self) -> Option<Scalar> {
        self.to_scalar()
    }
}

/// A filter specification: a plain struct whose fields describe a search.
///
/// ```
/// use sift::{FieldRole, IntegerFilter, Specification, StringFilter};
///
/// #[derive(Default, Specification)]
/// struct PersonSearch {
///     #[spec(skip)]
///     skip: u32,
///     #[spec(take)]
///     take: Option<u32>,
///     name: Option<StringFilter>,
///     age: Option<IntegerFilter>,
/// }
///
/// assert_eq!(PersonSearch::FIELDS[0].role, FieldRole::Skip);
/// assert_eq!(PersonSearch::FIELDS[2].role, FieldRole::Filter);
/// ```
pub trait Specification {
    /// Field table in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    fn spec_value(&self, field: &str) -> SpecValue<'_>;

    /// Returns the descriptor for a field name.
    fn descriptor(field: &str) -> Option<&'static FieldDescriptor> {
        Self::FIELDS.iter().find(|d| d.name == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::StringFilter;
    use crate::value::Number;

    struct Item {
        name: String,
        count: i32,
    }

    impl Searchable for Item {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                "count" => Value::Number(Number::from(self.count)),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "name" => Some(FieldKind::String),
                "count" => Some(FieldKind::Number),
                _ => None,
            }
        }
    }

    #[test]
    fn searchable_manual_impl() {
        let item = Item {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field_value("name"), Value::String("test"));
        assert_eq!(item.field_value("count"), Value::Number(Number::I64(42)));
        assert_eq!(item.field_value("unknown"), Value::None);
        assert!(Item::has_field("count"));
        assert!(!Item::has_field("unknown"));
    }

    struct ItemSearch {
        name: Option<StringFilter>,
        take: u32,
    }

    impl Specification for ItemSearch {
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new("name", FieldRole::Filter),
            FieldDescriptor::new("take", FieldRole::Take),
        ];

        fn spec_value(&self, field: &str) -> SpecValue<'_> {
            match field {
                "name" => SpecValue::Filter(self.name.as_ref().map(|f| f as &dyn Filter)),
                "take" => SpecValue::Scalar(Some(&self.take)),
                _ => SpecValue::Missing,
            }
        }
    }

    #[test]
    fn specification_manual_impl() {
        let spec = ItemSearch {
            name: None,
            take: 5,
        };

        assert!(matches!(spec.spec_value("name"), SpecValue::Filter(None)));
        match spec.spec_value("take") {
            SpecValue::Scalar(Some(v)) => {
                assert_eq!(v.scalar(), Some(Scalar::Number(Number::U64(5))))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(spec.spec_value("other"), SpecValue::Missing));
        assert_eq!(
            ItemSearch::descriptor("take").map(|d| d.role),
            Some(FieldRole::Take)
        );
        assert!(ItemSearch::descriptor("missing").is_none());
    }

    #[derive(Clone, Copy)]
    enum Level {
        Low,
        High,
    }

    impl SearchEnum for Level {
        fn discriminant(&self) -> u32 {
            match self {
                Level::Low => 1,
                Level::High => 2,
            }
        }
    }

    #[test]
    fn enum_value_for_plain_and_optional_enums() {
        assert_eq!(Level::High.enum_value(), Value::Enum(2));
        assert_eq!(Some(Level::Low).enum_value(), Value::Enum(1));
        assert_eq!(None::<Level>.enum_value(), Value::None);
    }

    #[test]
    fn element_kind_defaults_to_unknown() {
        assert_eq!(Item::element_kind("name"), None);
    }
}
