#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Unknown model '{name}'")]
    UnknownModel { name: String },
    #[error("Cannot resolve '{field}' into a field of {model} in lookup '{lookup}'")]
    UnknownField {
        model: String,
        field: String,
        lookup: String,
    },
    #[error("{model}.{field} is not a relation, cannot follow lookup '{lookup}'")]
    NotARelation {
        model: String,
        field: String,
        lookup: String,
    },
    #[error("{model}.{field} relates to many rows and cannot be joined, in lookup '{lookup}'")]
    NotSingleValued {
        model: String,
        field: String,
        lookup: String,
    },
    #[error("{model}.{field} has no column to load, in '{lookup}'")]
    NotAColumn {
        model: String,
        field: String,
        lookup: String,
    },
    #[error("{model}.{field} cannot be both deferred and joined")]
    DeferredAndJoined { model: String, field: String },
    #[error("'{lookup}' is prefetched more than once with different queries")]
    ConflictingPrefetch { lookup: String },
    #[error("The query prefetching '{lookup}' must be on {expected}, not {actual}")]
    PrefetchModelMismatch {
        lookup: String,
        expected: String,
        actual: String,
    },
}
