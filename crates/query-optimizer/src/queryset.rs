mod error;
mod model_query;

pub use error::QueryError;
pub use model_query::ModelQuery;

use model_definition::ModelWalker;

/// A query over the rows of one model, as provided by the relational layer.
///
/// The optimizer only ever narrows a query down: it asks for relations to be
/// joined, for relations to be prefetched, and for columns to be deferred.
pub trait QuerySet: Sized {
    type Error;

    /// A query returning every row of `model`, used as the base of prefetch
    /// queries.
    fn unfiltered(&self, model: ModelWalker<'_>) -> Self;

    /// Joins the to-one relation paths in the same query.
    fn with_joins(self, paths: Vec<String>) -> Result<Self, Self::Error>;

    /// Loads the relations with one follow-up query per relation.
    fn with_prefetches(self, prefetches: Vec<Prefetch<Self>>) -> Result<Self, Self::Error>;

    /// Loads only these columns, some of which may belong to joined relations.
    fn with_column_restriction(self, columns: Vec<String>) -> Result<Self, Self::Error>;
}

/// A relation to prefetch, with the query to run for it.
#[derive(Debug, Clone)]
pub struct Prefetch<Q> {
    pub lookup: String,
    /// Runs the prefetch with the default query of the related model if unset.
    pub queryset: Option<Q>,
}

impl<Q> Prefetch<Q> {
    pub fn new(lookup: impl Into<String>) -> Self {
        Self {
            lookup: lookup.into(),
            queryset: None,
        }
    }

    pub fn with_queryset(mut self, queryset: Q) -> Self {
        self.queryset = Some(queryset);
        self
    }
}
