//! Method-call entry points for every [`Source`].

use crate::error::Result;
use crate::filters::Filter;
use crate::multi::MultiSearch;
use crate::predicate::ApplyType;
use crate::search::{search_single_field, Search};
use crate::source::Source;
use crate::traits::Specification;

/// `source.search(&spec)` instead of `sift::search(source, &spec, ..)`.
///
/// ```
/// use sift::{Records, SearchExt, Searchable, StringFilter};
///
/// #[derive(Searchable)]
/// struct Person {
///     #[search(String)]
///     name: String,
/// }
///
/// let people = vec![Person { name: "John".into() }, Person { name: "Tom".into() }];
/// let found = Records::new(&people)
///     .search_field(Person::NAME, &StringFilter::new().equal("Tom"))
///     .unwrap();
/// assert_eq!(found.first().map(|p| p.name.as_str()), Some("Tom"));
/// ```
pub trait SearchExt: Source {
    /// Starts a search with apply-all and paging off.
    fn search<S: Specification>(self, spec: &S) -> Search<'_, S, Self> {
        Search::new(self, spec, false, false)
    }

    /// Applies one filter to one record field.
    fn search_field<F: Filter + ?Sized>(self, field: &str, filter: &F) -> Result<Self> {
        search_single_field(self, field, filter)
    }

    /// Starts a multi-field search for one filter.
    fn search_multi_field<'f, F: Filter>(
        self,
        filter: &'f F,
        apply_type: ApplyType,
    ) -> MultiSearch<'f, Self> {
        MultiSearch::new(self, filter, apply_type)
    }
}

impl<Src: Source> SearchExt for Src {}
