//! Relational metadata for the models a GraphQL schema is backed by.
//!
//! The [`ModelDefinition`] holds every model, its fields and the relations
//! between models. It is built once, usually at schema build time, and then
//! only read through walkers.

mod model_definition;

pub use model_definition::*;
