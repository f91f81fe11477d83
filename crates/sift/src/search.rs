//! The search pipeline: a specification applied to a record source.
//!
//! A [`Search`] starts by classifying the specification's fields into four
//! queues by [`FieldRole`]. The phases then drain those queues in a fixed
//! order:
//!
//! ```text
//! apply_filters → apply_plain_fields → apply_skip → apply_take
//! ```
//!
//! Each phase consumes the snapshot and returns the next one with its queue
//! emptied, so running a phase twice is a no-op. Nothing touches records:
//! the pipeline only narrows the [`Source`], and enumeration is up to it.
//!
//! Filter fields combine with AND. To spread one filter over several
//! record fields use [`Search::configure`], or [`Search::with_override`]
//! for an arbitrary transform.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::configure::{Configuration, FieldOverride};
use crate::error::{Result, SearchError};
use crate::filters::Filter;
use crate::op::CompareOp;
use crate::options::{FieldValidation, SearchOptions};
use crate::predicate::Predicate;
use crate::source::Source;
use crate::traits::{FieldRole, Searchable, SpecValue, Specification};
use crate::value::{FieldKind, Scalar};

/// A transform registered for one specification field, replacing its
/// default application.
pub type Transform<Src> = Arc<dyn Fn(Src) -> Src + Send + Sync>;

type Overrides<Src> = Arc<HashMap<String, Transform<Src>>>;

/// Starts a search over `source` driven by `spec`.
///
/// With `apply_all_properties`, Plain fields are matched by equality. With
/// `apply_paging`, [`Search::into_source`] also applies Skip and Take.
///
/// ```
/// use sift::{Records, Searchable, Specification, StringFilter};
///
/// #[derive(Searchable)]
/// struct Person {
///     #[search(String)]
///     name: String,
/// }
///
/// #[derive(Default, Specification)]
/// struct PersonSearch {
///     name: Option<StringFilter>,
/// }
///
/// let people = vec![
///     Person { name: "John Doe".into() },
///     Person { name: "Jane".into() },
/// ];
/// let spec = PersonSearch {
///     name: Some(StringFilter::new().starts_with("John")),
/// };
///
/// let found = sift::search(Records::new(&people), &spec, false, false)
///     .into_source()
///     .unwrap();
/// assert_eq!(found.count(), 1);
/// ```
pub fn search<S, Src>(
    source: Src,
    spec: &S,
    apply_all_properties: bool,
    apply_paging: bool,
) -> Search<'_, S, Src>
where
    S: Specification,
    Src: Source,
{
    Search::new(source, spec, apply_all_properties, apply_paging)
}

/// Starts a search configured by [`SearchOptions`].
///
/// With [`FieldValidation::Eager`], every field the pipeline would apply is
/// checked up front and the first error is returned here.
pub fn search_with<'s, S, Src>(
    source: Src,
    spec: &'s S,
    options: &SearchOptions,
) -> Result<Search<'s, S, Src>>
where
    S: Specification,
    Src: Source,
{
    let search = Search::new(
        source,
        spec,
        options.apply_all_properties,
        options.apply_paging,
    );
    if options.validation == FieldValidation::Eager {
        search.validate()?;
    }
    Ok(search)
}

/// A pipeline snapshot: the source narrowed so far plus the fields still
/// waiting to be applied.
pub struct Search<'s, S, Src: Source> {
    source: Src,
    spec: &'s S,
    filters: Vec<&'static str>,
    plain: Vec<&'static str>,
    skips: Vec<&'static str>,
    takes: Vec<&'static str>,
    overrides: Overrides<Src>,
    apply_all: bool,
    apply_paging: bool,
}

impl<'s, S, Src> Search<'s, S, Src>
where
    S: Specification,
    Src: Source,
{
    /// Classifies the specification's fields and wraps the source.
    pub fn new(source: Src, spec: &'s S, apply_all_properties: bool, apply_paging: bool) -> Self {
        let mut search = Search {
            source,
            spec,
            filters: Vec::new(),
            plain: Vec::new(),
            skips: Vec::new(),
            takes: Vec::new(),
            overrides: Arc::new(HashMap::new()),
            apply_all: apply_all_properties,
            apply_paging,
        };
        for descriptor in S::FIELDS {
            let queue = match descriptor.role {
                FieldRole::Filter => &mut search.filters,
                FieldRole::Plain => &mut search.plain,
                FieldRole::Skip => &mut search.skips,
                FieldRole::Take => &mut search.takes,
            };
            queue.push(descriptor.name);
        }
        debug!(
            filters = search.filters.len(),
            plain = search.plain.len(),
            skips = search.skips.len(),
            takes = search.takes.len(),
            "classified specification fields"
        );
        search
    }

    /// The source as narrowed by the phases run so far.
    pub fn source(&self) -> &Src {
        &self.source
    }

    pub fn spec(&self) -> &'s S {
        self.spec
    }

    /// Filter fields not yet applied.
    pub fn pending_filters(&self) -> &[&'static str] {
        &self.filters
    }

    /// Plain fields not yet applied.
    pub fn pending_plain_fields(&self) -> &[&'static str] {
        &self.plain
    }

    pub fn is_apply_all(&self) -> bool {
        self.apply_all
    }

    pub fn is_paging(&self) -> bool {
        self.apply_paging
    }

    /// Turns on apply-all mode.
    ///
    /// Only affects the plain phase if it has not run yet.
    pub fn allow_all_properties(mut self) -> Self {
        self.apply_all = true;
        self
    }

    /// Makes [`Search::into_source`] apply Skip and Take fields.
    pub fn with_paging(mut self) -> Self {
        self.apply_paging = true;
        self
    }

    /// Applies every Filter field, ANDing their predicates into the source.
    ///
    /// Unset and inactive filters are skipped. A field with an override runs
    /// the override instead.
    pub fn apply_filters(mut self) -> Result<Self> {
        let queue = std::mem::take(&mut self.filters);
        if !queue.is_empty() {
            debug!(fields = queue.len(), "applying filter fields");
        }
        for field in queue {
            if let Some(transform) = self.override_for(field) {
                self.source = transform(self.source);
                continue;
            }
            let filter = match self.spec.spec_value(field) {
                SpecValue::Filter(Some(filter)) => filter,
                _ => {
                    debug!(field, "filter unset, skipped");
                    continue;
                }
            };
            if !filter.has_active_constraint() {
                debug!(field, "filter inactive, skipped");
                continue;
            }
            let predicate = build_for_field::<Src::Record>(field, filter)?;
            if let Some(predicate) = predicate {
                debug!(field, "filter applied");
                self.source = self.source.filter_by(predicate);
            }
        }
        Ok(self)
    }

    /// Matches each set Plain field by equality against the same-named record
    /// field. Does nothing outside apply-all mode.
    pub fn apply_plain_fields(mut self) -> Result<Self> {
        let queue = std::mem::take(&mut self.plain);
        if !self.apply_all {
            if !queue.is_empty() {
                debug!(fields = queue.len(), "apply-all disabled, plain fields dropped");
            }
            return Ok(self);
        }
        for field in queue {
            if let Some(transform) = self.override_for(field) {
                self.source = transform(self.source);
                continue;
            }
            let Some(value) = scalar_value(self.spec.spec_value(field)) else {
                debug!(field, "plain field unset, skipped");
                continue;
            };
            let predicate = equality_for_field::<Src::Record>(field, value)?;
            debug!(field, "plain field applied");
            self.source = self.source.filter_by(predicate);
        }
        Ok(self)
    }

    /// Applies every Skip field in declaration order.
    ///
    /// Filter and plain phases run first if they are still pending.
    pub fn apply_skip(self) -> Result<Self> {
        let mut search = self.apply_filters()?.apply_plain_fields()?;
        for field in std::mem::take(&mut search.skips) {
            if let Some(n) = paging_value(field, search.spec.spec_value(field))? {
                debug!(field, n, "skip applied");
                search.source = search.source.skip(n);
            }
        }
        Ok(search)
    }

    /// Applies every Take field in declaration order.
    ///
    /// Filter and plain phases run first if they are still pending.
    pub fn apply_take(self) -> Result<Self> {
        let mut search = self.apply_filters()?.apply_plain_fields()?;
        for field in std::mem::take(&mut search.takes) {
            if let Some(n) = paging_value(field, search.spec.spec_value(field))? {
                debug!(field, n, "take applied");
                search.source = search.source.take(n);
            }
        }
        Ok(search)
    }

    /// Skip then take, whatever order the fields were declared in.
    pub fn apply_paging(self) -> Result<Self> {
        self.apply_skip()?.apply_take()
    }

    /// Runs every pending phase and returns the narrowed source.
    ///
    /// Paging is included only when the search was created with paging on.
    pub fn into_source(self) -> Result<Src> {
        let search = self.apply_filters()?.apply_plain_fields()?;
        let search = if search.apply_paging {
            search.apply_paging()?
        } else {
            search
        };
        Ok(search.source)
    }

    /// Spreads one Filter field over several record fields.
    ///
    /// The closure receives a [`Configuration`] for the field's filter and
    /// returns the finished mapping. If the filter is unset or inactive the
    /// closure is not called and the search is returned unchanged.
    ///
    /// ```
    /// use sift::{ApplyType, Records, Searchable, Specification, StringFilter};
    ///
    /// #[derive(Searchable)]
    /// struct Employee {
    ///     #[search(String)]
    ///     name: String,
    ///     #[search(String)]
    ///     team: String,
    /// }
    ///
    /// #[derive(Default, Specification)]
    /// struct EmployeeSearch {
    ///     term: Option<StringFilter>,
    /// }
    ///
    /// let staff = vec![
    ///     Employee { name: "Sally".into(), team: "HR".into() },
    ///     Employee { name: "Bob".into(), team: "Storage".into() },
    ///     Employee { name: "Dave".into(), team: "Networking".into() },
    /// ];
    /// let spec = EmployeeSearch {
    ///     term: Some(StringFilter::new().starts_with("S")),
    /// };
    ///
    /// let found = sift::search(Records::new(&staff), &spec, false, false)
    ///     .configure(EmployeeSearch::TERM, |cfg| {
    ///         Ok(cfg.map_to(Employee::NAME)?.map_to(Employee::TEAM)?.with_type(ApplyType::Or))
    ///     })
    ///     .unwrap()
    ///     .into_source()
    ///     .unwrap();
    /// assert_eq!(found.count(), 2);
    /// ```
    pub fn configure<F>(mut self, field: &str, configure: F) -> Result<Self>
    where
        F: FnOnce(Configuration<'_, Src::Record>) -> Result<FieldOverride>,
    {
        let descriptor = S::descriptor(field)
            .ok_or_else(|| SearchError::invalid_selector(field, "not a specification field"))?;
        if descriptor.role != FieldRole::Filter {
            return Err(SearchError::invalid_selector(
                field,
                format!("{} field cannot be configured", descriptor.role),
            ));
        }
        let filter = match self.spec.spec_value(field) {
            SpecValue::Filter(Some(filter)) if filter.has_active_constraint() => filter,
            _ => {
                debug!(field, "filter inactive, configuration skipped");
                return Ok(self);
            }
        };

        let finished = configure(Configuration::new(descriptor.name, filter))?;
        let Some(predicate) = finished.into_predicate() else {
            debug!(field, "no mappings, default application kept");
            return Ok(self);
        };
        debug!(field, targets = ?predicate.fields(), "override registered");
        self.insert_override(descriptor.name, Arc::new(move |source: Src| {
            source.filter_by(predicate.clone())
        }));
        Ok(self)
    }

    /// Registers a transform that replaces the default application of a
    /// Filter or Plain field.
    pub fn with_override<F>(mut self, field: &str, transform: F) -> Self
    where
        F: Fn(Src) -> Src + Send + Sync + 'static,
    {
        self.insert_override(field, Arc::new(transform));
        self
    }

    /// Checks every field the pipeline would apply, without applying it.
    ///
    /// Catches unknown fields, filter kinds that do not fit their record
    /// field, plain values of the wrong kind, and invalid paging values.
    /// Fields with an override are not checked.
    pub fn validate(&self) -> Result<()> {
        for &field in &self.filters {
            if self.overrides.contains_key(field) {
                continue;
            }
            if let SpecValue::Filter(Some(filter)) = self.spec.spec_value(field) {
                if filter.has_active_constraint() {
                    build_for_field::<Src::Record>(field, filter)?;
                }
            }
        }
        if self.apply_all {
            for &field in &self.plain {
                if self.overrides.contains_key(field) {
                    continue;
                }
                if let Some(value) = scalar_value(self.spec.spec_value(field)) {
                    equality_for_field::<Src::Record>(field, value)?;
                }
            }
        }
        for &field in self.skips.iter().chain(&self.takes) {
            paging_value(field, self.spec.spec_value(field))?;
        }
        Ok(())
    }

    fn insert_override(&mut self, field: &str, transform: Transform<Src>) {
        Arc::make_mut(&mut self.overrides).insert(field.to_string(), transform);
    }

    fn override_for(&self, field: &str) -> Option<Transform<Src>> {
        let transform = self.overrides.get(field).cloned();
        if transform.is_some() {
            trace!(field, "dispatching override");
        }
        transform
    }
}

impl<S, Src: Source + Clone> Clone for Search<'_, S, Src> {
    fn clone(&self) -> Self {
        Search {
            source: self.source.clone(),
            spec: self.spec,
            filters: self.filters.clone(),
            plain: self.plain.clone(),
            skips: self.skips.clone(),
            takes: self.takes.clone(),
            overrides: Arc::clone(&self.overrides),
            apply_all: self.apply_all,
            apply_paging: self.apply_paging,
        }
    }
}

impl<S, Src: Source + fmt::Debug> fmt::Debug for Search<'_, S, Src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overrides: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        overrides.sort_unstable();
        f.debug_struct("Search")
            .field("source", &self.source)
            .field("filters", &self.filters)
            .field("plain", &self.plain)
            .field("skips", &self.skips)
            .field("takes", &self.takes)
            .field("overrides", &overrides)
            .field("apply_all", &self.apply_all)
            .field("apply_paging", &self.apply_paging)
            .finish()
    }
}

/// Applies one filter to one record field.
///
/// Fails with `InvalidFieldSelector` when the record has no such field or the
/// filter does not fit its kind. Returns the source unchanged for an
/// inactive filter.
///
/// ```
/// use sift::{IntegerFilter, Records, Searchable};
///
/// #[derive(Searchable)]
/// struct Product {
///     #[search(Number)]
///     stock: i32,
/// }
///
/// let products: Vec<Product> = [5, 20, 50, 60].into_iter().map(|stock| Product { stock }).collect();
/// let filter = IntegerFilter::new().greater_than(10).less_than_or_equal(50);
/// let found = sift::search_single_field(Records::new(&products), Product::STOCK, &filter).unwrap();
/// assert_eq!(found.count(), 2);
/// ```
pub fn search_single_field<Src, F>(source: Src, field: &str, filter: &F) -> Result<Src>
where
    Src: Source,
    F: Filter + ?Sized,
{
    if !filter.has_active_constraint() {
        debug!(field, "filter inactive, source unchanged");
        return Ok(source);
    }
    check_selector::<Src::Record>(field, filter)?;
    Ok(match filter.build_predicate(field) {
        Some(predicate) => source.filter_by(predicate),
        None => source,
    })
}

/// Checks that `field` names a record field the filter can target.
pub(crate) fn check_selector<R: Searchable>(
    field: &str,
    filter: &(impl Filter + ?Sized),
) -> Result<()> {
    let kind = R::field_kind(field)
        .ok_or_else(|| SearchError::invalid_selector(field, "not a field of the record type"))?;
    match kind_mismatch::<R>(field, kind, filter) {
        Some((record, wanted)) if filter.accepts(kind) => Err(SearchError::invalid_selector(
            field,
            format!("list of {record} cannot take a list filter of {wanted}"),
        )),
        Some((record, wanted)) => Err(SearchError::invalid_selector(
            field,
            format!("{record} field cannot take a {wanted} filter"),
        )),
        None => Ok(()),
    }
}

/// The record and filter kinds when `filter` cannot target `field`.
///
/// Collection filters must also agree on the element kind when the record
/// declares one.
fn kind_mismatch<R: Searchable>(
    field: &str,
    kind: FieldKind,
    filter: &(impl Filter + ?Sized),
) -> Option<(FieldKind, FieldKind)> {
    if !filter.accepts(kind) {
        return Some((kind, filter.target_kind()));
    }
    match (R::element_kind(field), filter.element_kind()) {
        (Some(record), Some(wanted)) if record != wanted => Some((record, wanted)),
        _ => None,
    }
}

fn build_for_field<R: Searchable>(field: &str, filter: &dyn Filter) -> Result<Option<Predicate>> {
    let kind = R::field_kind(field).ok_or_else(|| SearchError::unknown_field(field))?;
    if let Some((expected, actual)) = kind_mismatch::<R>(field, kind, filter) {
        return Err(SearchError::TypeMismatch {
            field: field.to_string(),
            expected,
            actual,
        });
    }
    Ok(filter.build_predicate(field))
}

fn equality_for_field<R: Searchable>(field: &str, value: Scalar) -> Result<Predicate> {
    let kind = R::field_kind(field).ok_or_else(|| SearchError::unknown_field(field))?;
    if value.kind() != kind {
        return Err(SearchError::TypeMismatch {
            field: field.to_string(),
            expected: kind,
            actual: value.kind(),
        });
    }
    Ok(Predicate::compare(field, CompareOp::Eq, value))
}

fn scalar_value(value: SpecValue<'_>) -> Option<Scalar> {
    match value {
        SpecValue::Scalar(Some(source)) => source.scalar(),
        _ => None,
    }
}

fn paging_value(field: &str, value: SpecValue<'_>) -> Result<Option<usize>> {
    let Some(value) = scalar_value(value) else {
        return Ok(None);
    };
    let count = match &value {
        Scalar::Number(n) => n.as_count(),
        _ => None,
    };
    count.map(Some).ok_or_else(|| SearchError::InvalidPagingValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}
