//! Turns the selection tree of a GraphQL operation into the smallest set of
//! relational queries able to answer it: joins for to-one relations, prefetch
//! queries for to-many relations, and column restrictions.
//!
//! ```ignore
//! let selections = parse_selections(document, None, &variables)?;
//! let fruits = FieldSelection::find(&selections, "fruits").unwrap();
//!
//! let query = QueryOptimizer::new(&registry, &definition)
//!     .optimize(ModelQuery::all(&definition, "Fruit")?, &fruits.selections, "Fruit")?;
//! ```

mod config;
mod hints;
mod optimizer;
mod queryset;
mod registry;
mod selection;
mod store;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, NamingConvention, OptimizerConfig};
pub use hints::{IntoPaths, OptimizationHints};
pub use model_definition;
pub use optimizer::QueryOptimizer;
pub use queryset::{ModelQuery, Prefetch, QueryError, QuerySet};
pub use registry::{InterfaceType, MetaField, MetaType, ObjectType, Registry, UnionType};
pub use selection::{
    parse_selections, DocumentError, FieldSelection, FragmentSpread, InlineFragment, Selection, Variables,
};
pub use store::{ColumnRestriction, PrefetchEntry, Store};

/// Argument values of a selected field.
pub type Arguments = serde_json::Map<String, serde_json::Value>;
