
mod fragments;
mod pagination;
mod scalars;

use model_definition::ModelDefinition;

use crate::{parse_selections, FieldSelection, ModelQuery, OptimizerConfig, QueryOptimizer, Variables};

#[ctor::ctor]
fn setup_logging() {
    let filter = tracing_subscriber::filter::EnvFilter::builder()
        .parse(std::env::var("RUST_LOG").unwrap_or("query_optimizer=debug".to_string()))
        .unwrap();
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .without_time()
        .init();
}

/// Optimizes the query of the document's root field, with the default settings.
fn optimize<'a>(definition: &'a ModelDefinition, document: &str) -> ModelQuery<'a> {
    optimize_with(definition, OptimizerConfig::default(), document)
}

fn optimize_with<'a>(definition: &'a ModelDefinition, config: OptimizerConfig, document: &str) -> ModelQuery<'a> {
    let registry = fixtures::registry();
    let selections = parse_selections(document, None, &Variables::new()).unwrap();

    let crate::Selection::Field(root) = &selections[0] else {
        unreachable!("the document must start with a field")
    };

    let (type_name, model) = fixtures::root_field(&root.name);

    QueryOptimizer::new(&registry, definition)
        .with_config(config)
        .optimize(ModelQuery::all(definition, model).unwrap(), &root.selections, type_name)
        .unwrap()
}

/// The root field of the document, for tests looking at the plan itself.
fn root_field(document: &str) -> FieldSelection {
    let selections = parse_selections(document, None, &Variables::new()).unwrap();

    match selections.into_iter().next() {
        Some(crate::Selection::Field(field)) => field,
        _ => unreachable!("the document must start with a field"),
    }
}
