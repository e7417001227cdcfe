//! Query builder and executor.
//!
//! A [`Query`] pairs a borrowed dataset with a root [`Scope`], an ordering
//! and optional pagination. Every builder method returns a new query and
//! leaves the receiver untouched, so a query that failed to build further is
//! still usable.
//!
//! Results are computed on demand. Each iteration runs the full pipeline
//! against the dataset:
//!
//! ```text
//! filter (scope) -> stable sort (orderings) -> skip (offset) -> take (limit)
//! ```

use std::fmt;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::ordering::{compare_records, OrderBy, OrderSpec};
use crate::parser::{Filter, Operators};
use crate::record::Record;
use crate::scope::{Builder, Scope, ScopeBuilder};

/// An immutable query over a borrowed dataset.
///
/// # Example
///
/// ```
/// use sift::{Filter, Query};
/// use serde_json::json;
///
/// let books = vec![
///     json!({"title": "Tehanu", "author": "LeGuin", "year": 1990}),
///     json!({"title": "The Hobbit", "author": "Tolkien", "year": 1937}),
///     json!({"title": "A Wizard of Earthsea", "author": "LeGuin", "year": 1968}),
/// ];
///
/// let query = Query::new(&books)
///     .filter(&Filter::new().with("author", "LeGuin")).unwrap()
///     .order("year").unwrap()
///     .limit(1);
///
/// let titles: Vec<&str> = query
///     .each()
///     .iter()
///     .filter_map(|book| book["title"].as_str())
///     .collect();
/// assert_eq!(titles, vec!["A Wizard of Earthsea"]);
/// ```
pub struct Query<'d, R> {
    records: &'d [R],
    builder: Arc<dyn ScopeBuilder + Send + Sync>,
    scope: Scope,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl<'d, R: Record> Query<'d, R> {
    /// Creates a query over `dataset` using the basic builder.
    ///
    /// A new query is unscoped and matches every record.
    pub fn new<D>(dataset: &'d D) -> Self
    where
        D: Dataset<Record = R> + ?Sized,
    {
        Query::with_builder(dataset, Builder::basic())
    }

    /// Creates a query whose scopes are built by `builder`.
    pub fn with_builder<D, B>(dataset: &'d D, builder: B) -> Self
    where
        D: Dataset<Record = R> + ?Sized,
        B: ScopeBuilder + Send + Sync + 'static,
    {
        let scope = builder.null_scope();
        Query {
            records: dataset.records(),
            builder: Arc::new(builder),
            scope,
            orderings: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    // ========================================================================
    // Scoping
    // ========================================================================

    /// Narrows the query by a hash-form filter.
    pub fn filter(&self, filter: &Filter) -> Result<Self> {
        self.filter_by(Some(filter), None)
    }

    /// Narrows the query by a filter block.
    pub fn filter_with<F>(&self, block: F) -> Result<Self>
    where
        F: FnOnce(&Operators) -> Filter,
    {
        self.filter(&block(&Operators))
    }

    /// Narrows the query by a hash-form filter, a block, or both.
    ///
    /// Entries of `filter` come before those of `block`. Fails with
    /// [`SiftError::MissingFilter`](crate::SiftError::MissingFilter) if both
    /// are `None`.
    pub fn filter_by(
        &self,
        filter: Option<&Filter>,
        block: Option<&dyn Fn(&Operators) -> Filter>,
    ) -> Result<Self> {
        let scope = self.builder.filter(&self.scope, filter, block)?;
        Ok(self.with_scope(scope))
    }

    /// Narrows the query by an existing scope.
    ///
    /// Scopes from other dialects are transformed into this query's dialect
    /// first.
    pub fn scoped(&self, scope: &Scope) -> Result<Self> {
        let scope = self.builder.and(&self.scope, scope)?;
        Ok(self.with_scope(scope))
    }

    // ========================================================================
    // Ordering and pagination
    // ========================================================================

    /// Replaces the ordering.
    ///
    /// The spec is validated here; an invalid spec fails with
    /// [`SiftError::InvalidOrder`](crate::SiftError::InvalidOrder).
    pub fn order(&self, spec: impl Into<OrderSpec>) -> Result<Self> {
        let spec: OrderSpec = spec.into();
        let orderings = spec.resolve()?;
        Ok(Query {
            orderings,
            ..self.clone()
        })
    }

    /// Sets the maximum number of results to return.
    pub fn limit(&self, n: usize) -> Self {
        Query {
            limit: Some(n),
            ..self.clone()
        }
    }

    /// Sets the number of results to skip.
    pub fn offset(&self, n: usize) -> Self {
        Query {
            offset: Some(n),
            ..self.clone()
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the root scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the builder scopes are composed with.
    pub fn builder(&self) -> &dyn ScopeBuilder {
        self.builder.as_ref()
    }

    /// Returns the ordering clauses.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the offset, if set.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Returns the results as a re-enterable sequence.
    ///
    /// Every iteration over the returned value runs the pipeline again.
    pub fn each(&self) -> Results<'d, R> {
        Results {
            query: self.clone(),
        }
    }

    /// Collects the results.
    pub fn to_vec(&self) -> Vec<&'d R> {
        self.run().collect()
    }

    /// Counts the results, after pagination.
    pub fn count(&self) -> usize {
        self.run().count()
    }

    /// Returns `true` if there is at least one result.
    pub fn exists(&self) -> bool {
        self.run().next().is_some()
    }

    /// Returns the first result.
    pub fn first(&self) -> Option<&'d R> {
        self.run().next()
    }

    fn with_scope(&self, scope: Scope) -> Self {
        Query {
            scope,
            ..self.clone()
        }
    }

    fn run(&self) -> Box<dyn Iterator<Item = &'d R> + '_> {
        tracing::trace!(
            scope = self.scope.type_name(),
            records = self.records.len(),
            orderings = self.orderings.len(),
            limit = ?self.limit,
            offset = ?self.offset,
            "running query"
        );

        let scope = &self.scope;
        let matched = self.records.iter().filter(move |record| scope.matches(*record));

        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);

        if self.orderings.is_empty() {
            return Box::new(matched.skip(offset).take(limit));
        }

        // slice::sort_by is stable, so ties keep dataset order
        let mut sorted: Vec<&'d R> = matched.collect();
        sorted.sort_by(|a, b| compare_records(*a, *b, &self.orderings));
        Box::new(sorted.into_iter().skip(offset).take(limit))
    }
}

impl<R> Clone for Query<'_, R> {
    fn clone(&self) -> Self {
        Query {
            records: self.records,
            builder: Arc::clone(&self.builder),
            scope: self.scope.clone(),
            orderings: self.orderings.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<R> fmt::Debug for Query<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("records", &self.records.len())
            .field("builder", &self.builder)
            .field("scope", &self.scope)
            .field("orderings", &self.orderings)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, 'd, R: Record> IntoIterator for &'a Query<'d, R> {
    type Item = &'d R;
    type IntoIter = Box<dyn Iterator<Item = &'d R> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.run()
    }
}

/// The result sequence of a query.
///
/// Holds a snapshot of the query, not of its results: iterating twice runs
/// the pipeline twice. Each iterator is independent.
pub struct Results<'d, R> {
    query: Query<'d, R>,
}

impl<'d, R: Record> Results<'d, R> {
    /// Starts a fresh pass over the results.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &'d R> + '_> {
        self.query.run()
    }

    /// Collects the results.
    pub fn to_vec(&self) -> Vec<&'d R> {
        self.query.to_vec()
    }

    /// The query these results are computed from.
    pub fn query(&self) -> &Query<'d, R> {
        &self.query
    }
}

impl<R> Clone for Results<'_, R> {
    fn clone(&self) -> Self {
        Results {
            query: self.query.clone(),
        }
    }
}

impl<R> fmt::Debug for Results<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Results").field("query", &self.query).finish()
    }
}

impl<'a, 'd, R: Record> IntoIterator for &'a Results<'d, R> {
    type Item = &'d R;
    type IntoIter = Box<dyn Iterator<Item = &'d R> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'d, R: Record> IntoIterator for Results<'d, R> {
    type Item = &'d R;
    type IntoIter = std::vec::IntoIter<&'d R>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_vec().into_iter()
    }
}
