//! Record sources the search pipeline applies predicates and paging to.
//!
//! A [`Source`] only needs to know how to narrow itself: add a predicate,
//! skip records, take records. The pipeline never looks inside.
//!
//! Two in-memory sources are provided:
//!
//! - [`Plan`], a data-free list of [`Step`]s. Backends that translate
//!   predicates into their own query language can walk [`Plan::steps`];
//!   [`Plan::execute`] runs it against a slice.
//! - [`Records`], a plan bound to a borrowed slice and evaluated lazily.
//!
//! `Vec<R>` is also a source; it filters eagerly.

use std::fmt;
use std::marker::PhantomData;

use crate::predicate::Predicate;
use crate::traits::Searchable;

/// A queryable sequence of records.
///
/// Every method consumes the source and returns the narrowed one.
pub trait Source: Sized {
    type Record: Searchable;

    /// Keeps only the records the predicate holds for.
    fn filter_by(self, predicate: Predicate) -> Self;

    /// Drops the first `n` records.
    fn skip(self, n: usize) -> Self;

    /// Keeps at most `n` records.
    fn take(self, n: usize) -> Self;
}

/// One narrowing step recorded by a [`Plan`].
#[derive(Debug, Clone)]
pub enum Step {
    Filter(Predicate),
    Skip(usize),
    Take(usize),
}

/// An ordered list of steps over records of type `R`.
///
/// ```
/// use sift::{Plan, Step, Searchable, Source, StringFilter, Filter};
///
/// #[derive(Searchable)]
/// struct Person {
///     #[search(String)]
///     name: String,
/// }
///
/// let predicate = StringFilter::new().starts_with("J").build_predicate("name").unwrap();
/// let plan = Plan::<Person>::new().filter_by(predicate).take(1);
/// assert!(matches!(plan.steps(), [Step::Filter(_), Step::Take(1)]));
///
/// let people = vec![
///     Person { name: "Tom".into() },
///     Person { name: "Jane".into() },
///     Person { name: "John".into() },
/// ];
/// let found = plan.execute(&people);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name, "Jane");
/// ```
pub struct Plan<R> {
    steps: Vec<Step>,
    _record: PhantomData<fn(&R)>,
}

impl<R> Plan<R> {
    pub fn new() -> Self {
        Plan {
            steps: Vec::new(),
            _record: PhantomData,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The predicates of every `Filter` step, in order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.steps.iter().filter_map(|step| match step {
            Step::Filter(predicate) => Some(predicate),
            _ => None,
        })
    }

    fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

impl<R: Searchable> Plan<R> {
    /// Runs the plan against a slice, returning matching records in order.
    pub fn execute<'a>(&self, items: &'a [R]) -> Vec<&'a R> {
        run(&self.steps, items).collect()
    }
}

impl<R> Default for Plan<R> {
    fn default() -> Self {
        Plan::new()
    }
}

impl<R> Clone for Plan<R> {
    fn clone(&self) -> Self {
        Plan {
            steps: self.steps.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Plan<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan").field("steps", &self.steps).finish()
    }
}

impl<R: Searchable> Source for Plan<R> {
    type Record = R;

    fn filter_by(self, predicate: Predicate) -> Self {
        self.push(Step::Filter(predicate))
    }

    fn skip(self, n: usize) -> Self {
        self.push(Step::Skip(n))
    }

    fn take(self, n: usize) -> Self {
        self.push(Step::Take(n))
    }
}

/// A borrowed slice of records plus the steps to run over it.
///
/// Nothing is evaluated until [`Records::iter`] (or one of the collecting
/// helpers) is called.
pub struct Records<'a, R> {
    items: &'a [R],
    plan: Plan<R>,
}

impl<'a, R> Records<'a, R> {
    pub fn new(items: &'a [R]) -> Self {
        Records {
            items,
            plan: Plan::new(),
        }
    }

    pub fn plan(&self) -> &Plan<R> {
        &self.plan
    }
}

impl<'a, R: Searchable> Records<'a, R> {
    /// Lazily yields the matching records.
    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        run(&self.plan.steps, self.items)
    }

    pub fn to_vec(&self) -> Vec<&'a R> {
        self.iter().collect()
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn first(&self) -> Option<&'a R> {
        self.iter().next()
    }
}

impl<R> Clone for Records<'_, R> {
    fn clone(&self) -> Self {
        Records {
            items: self.items,
            plan: self.plan.clone(),
        }
    }
}

impl<R> fmt::Debug for Records<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records")
            .field("len", &self.items.len())
            .field("plan", &self.plan)
            .finish()
    }
}

impl<'a, R: Searchable> Source for Records<'a, R> {
    type Record = R;

    fn filter_by(mut self, predicate: Predicate) -> Self {
        self.plan = self.plan.filter_by(predicate);
        self
    }

    fn skip(mut self, n: usize) -> Self {
        self.plan = self.plan.skip(n);
        self
    }

    fn take(mut self, n: usize) -> Self {
        self.plan = self.plan.take(n);
        self
    }
}

impl<R: Searchable> Source for Vec<R> {
    type Record = R;

    fn filter_by(mut self, predicate: Predicate) -> Self {
        self.retain(|record| predicate.evaluate(record));
        self
    }

    fn skip(self, n: usize) -> Self {
        let mut records = self;
        let at = n.min(records.len());
        records.split_off(at)
    }

    fn take(mut self, n: usize) -> Self {
        self.truncate(n);
        self
    }
}

fn run<'a, 'p, R: Searchable>(
    steps: &'p [Step],
    items: &'a [R],
) -> Box<dyn Iterator<Item = &'a R> + 'p>
where
    'a: 'p,
{
    let mut iter: Box<dyn Iterator<Item = &'a R> + 'p> = Box::new(items.iter());
    for step in steps {
        iter = match step {
            Step::Filter(predicate) => {
                Box::new(iter.filter(move |record| predicate.evaluate(*record)))
            }
            Step::Skip(n) => Box::new(iter.skip(*n)),
            Step::Take(n) => Box::new(iter.take(*n)),
        };
    }
    iter
}
