//! Runtime value types for field comparison.
//!
//! [`Value`] is borrowed from a record when a predicate is evaluated.
//! [`Scalar`] is the owned counterpart stored inside filters and predicates.
//! [`FieldKind`] names the declared type of a record field so that filters
//! can be checked against the fields they target.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Number,
    Timestamp,
    Enum,
    Bool,
    /// A collection of scalar values.
    List,
}

impl FieldKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Enum => "enum",
            FieldKind::Bool => "bool",
            FieldKind::List => "list",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime value of a record field, borrowed from the record.
///
/// ```
/// use sift::{Value, Number};
///
/// struct Product {
///     name: String,
///     stock: u32,
/// }
///
/// fn value_of<'a>(product: &'a Product, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&product.name),
///         "stock" => Value::Number(Number::U64(product.stock as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Enum discriminant value.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Collection field; each element is a scalar value.
    List(Vec<Value<'a>>),
    /// Field not present, null, or unsupported.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The kind of this value, or `None` for [`Value::None`].
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Value::String(_) => Some(FieldKind::String),
            Value::Number(_) => Some(FieldKind::Number),
            Value::Timestamp(_) => Some(FieldKind::Timestamp),
            Value::Enum(_) => Some(FieldKind::Enum),
            Value::Bool(_) => Some(FieldKind::Bool),
            Value::List(_) => Some(FieldKind::List),
            Value::None => None,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Comparisons between different variants go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Returns the value as a count when it is a non-negative integer.
    pub fn as_count(self) -> Option<usize> {
        match self {
            Number::I64(n) => usize::try_from(n).ok(),
            Number::U64(n) => usize::try_from(n).ok(),
            Number::F64(_) => None,
        }
    }
}

fn compare_signed_unsigned(a: i64, b: u64) -> Ordering {
    match u64::try_from(a) {
        Ok(a) => a.cmp(&b),
        Err(_) => Ordering::Less,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// ```
/// use sift::Timestamp;
///
/// let new_year = Timestamp::from_ymd(2023, 1, 1);
/// assert_eq!(new_year.as_millis(), 1_672_531_200_000);
/// assert!(Timestamp(1000) < Timestamp(2000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    ///
    /// Saturates at the representable range.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Midnight UTC of the given proleptic Gregorian calendar date.
    ///
    /// Dates outside the representable range saturate.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        let month = i64::from(month);
        let year = i64::from(year) - i64::from(month <= 2);
        let era = if year >= 0 { year } else { year - 399 } / 400;
        let year_of_era = year - era * 400;
        let shifted_month = if month > 2 { month - 3 } else { month + 9 };
        let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        let days = era * 146_097 + day_of_era - 719_468;
        Timestamp(days.saturating_mul(86_400_000))
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

/// Owned value stored in filters and predicates.
///
/// Unlike [`Value`], which borrows from a record, `Scalar` owns its data so
/// predicates can outlive the specification they were built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Timestamp(Timestamp),
    Enum(u32),
    Bool(bool),
}

impl Scalar {
    pub fn kind(&self) -> FieldKind {
        match self {
            Scalar::String(_) => FieldKind::String,
            Scalar::Number(_) => FieldKind::Number,
            Scalar::Timestamp(_) => FieldKind::Timestamp,
            Scalar::Enum(_) => FieldKind::Enum,
            Scalar::Bool(_) => FieldKind::Bool,
        }
    }

    /// Orders a record value relative to this scalar.
    ///
    /// The result reads as `value.cmp(self)`. Returns `None` when the kinds
    /// differ, when the value is missing, or for NaN. Enums and booleans only
    /// report equality or inequality.
    pub fn compare_value(&self, value: &Value<'_>) -> Option<Ordering> {
        match (self, value) {
            (Scalar::String(s), Value::String(v)) => Some((*v).cmp(s.as_str())),
            (Scalar::Number(n), Value::Number(v)) => v.compare(*n),
            (Scalar::Timestamp(t), Value::Timestamp(v)) => Some(v.cmp(t)),
            (Scalar::Enum(d), Value::Enum(v)) => Some(v.cmp(d)),
            (Scalar::Bool(b), Value::Bool(v)) => Some(v.cmp(b)),
            _ => None,
        }
    }

    /// Returns `true` if the record value equals this scalar.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        self.compare_value(value) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{s:?}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Timestamp(t) => write!(f, "@{}", t.as_millis()),
            Scalar::Enum(d) => write!(f, "#{d}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Conversion of filter operands and specification values into [`Scalar`].
///
/// `KIND` is the record field kind the converted value compares against.
/// `Option<T>` converts to `None` when empty, which the pipeline treats as
/// "not set".
pub trait ToScalar {
    const KIND: FieldKind;

    fn to_scalar(&self) -> Option<Scalar>;
}

macro_rules! number_scalar {
    ($($source:ty),*) => {
        $(
            impl ToScalar for $source {
                const KIND: FieldKind = FieldKind::Number;

                fn to_scalar(&self) -> Option<Scalar> {
                    Some(Scalar::Number(Number::from(*self)))
                }
            }
        )*
    };
}

number_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToScalar for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::String(self.clone()))
    }
}

impl ToScalar for &str {
    const KIND: FieldKind = FieldKind::String;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::String((*self).to_string()))
    }
}

impl ToScalar for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bool(*self))
    }
}

impl ToScalar for Timestamp {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Timestamp(*self))
    }
}

impl<T: ToScalar> ToScalar for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_scalar(&self) -> Option<Scalar> {
        self.as_ref().and_then(ToScalar::to_scalar)
    }
}

/// Borrowing conversion of a record field into a [`Value`].
///
/// Used by `#[derive(Searchable)]` for scalar fields and the elements of
/// `List` fields.
pub trait ToValue {
    fn to_value(&self) -> Value<'_>;
}

macro_rules! number_value {
    ($($source:ty),*) => {
        $(
            impl ToValue for $source {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::None,
        }
    }
}

/// Borrowing conversion of a collection field into [`Value::List`].
///
/// Used by `#[derive(Searchable)]` for `List` fields. `ELEMENT_KIND` is the
/// kind of the elements, so list filters can be checked against it. An
/// empty `Option` converts to [`Value::None`].
pub trait ListValue {
    const ELEMENT_KIND: FieldKind;

    fn list_value(&self) -> Value<'_>;
}

fn collect_list<'a, T: ToValue + 'a>(items: impl Iterator<Item = &'a T>) -> Value<'a> {
    Value::List(items.map(ToValue::to_value).collect())
}

impl<T: ToValue + ToScalar> ListValue for Vec<T> {
    const ELEMENT_KIND: FieldKind = T::KIND;

    fn list_value(&self) -> Value<'_> {
        collect_list(self.iter())
    }
}

impl<T: ToValue + ToScalar> ListValue for &[T] {
    const ELEMENT_KIND: FieldKind = T::KIND;

    fn list_value(&self) -> Value<'_> {
        collect_list(self.iter())
    }
}

impl<T: ToValue + ToScalar, const N: usize> ListValue for [T; N] {
    const ELEMENT_KIND: FieldKind = T::KIND;

    fn list_value(&self) -> Value<'_> {
        collect_list(self.iter())
    }
}

impl<T: ToValue + ToScalar> ListValue for VecDeque<T> {
    const ELEMENT_KIND: FieldKind = T::KIND;

    fn list_value(&self) -> Value<'_> {
        collect_list(self.iter())
    }
}

impl<T: ToValue + ToScalar> ListValue for BTreeSet<T> {
    const ELEMENT_KIND: FieldKind = T::KIND;

    fn list_value(&self) -> Value<'_> {
        collect_list(self.iter())
    }
}

impl<T: ToValue + ToScalar, S> ListValue for HashSet<T, S> {
    const ELEMENT_KIND: FieldKind = T::KIND;

    fn list_value(&self) -> Value<'_> {
        collect_list(self.iter())
    }
}

impl<L: ListValue> ListValue for Option<L> {
    const ELEMENT_KIND: FieldKind = L::ELEMENT_KIND;

    fn list_value(&self) -> Value<'_> {
        match self {
            Some(list) => list.list_value(),
            None => Value::None,
        }
    }
}
