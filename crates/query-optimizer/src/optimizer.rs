use std::collections::HashSet;

use model_definition::{ModelDefinition, ModelWalker, RelationKind, LOOKUP_SEPARATOR};

use crate::{
    registry::{MetaField, ObjectType, Registry},
    selection::{FieldSelection, InlineFragment, Selection},
    store::Store,
    OptimizerConfig, QuerySet,
};

/// Plans a query for a GraphQL selection, so that everything selected is
/// loaded with as few queries and columns as possible.
///
/// To-one relations are joined, to-many relations are prefetched with their own
/// optimized query, and only the columns of selected fields are loaded. If a
/// selected field cannot be mapped to a model field or a hint, every column of
/// its level is loaded.
pub struct QueryOptimizer<'a> {
    registry: &'a Registry,
    definition: &'a ModelDefinition,
    config: OptimizerConfig,
}

impl<'a> QueryOptimizer<'a> {
    pub fn new(registry: &'a Registry, definition: &'a ModelDefinition) -> Self {
        Self {
            registry,
            definition,
            config: OptimizerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimizes `query` for the selection of a field of type `type_name`.
    /// `selections` are the children of that field.
    pub fn optimize<Q: QuerySet>(&self, query: Q, selections: &[Selection], type_name: &str) -> Result<Q, Q::Error> {
        let store = self.plan(&query, selections, type_name);

        tracing::debug!(
            type_name,
            joins = ?store.joins(),
            prefetches = ?store.prefetches().iter().map(|prefetch| prefetch.lookup()).collect::<Vec<_>>(),
            columns = ?store.column_restriction(),
            "planned query"
        );

        store.apply_to(query)
    }

    /// The plan for the selection, without applying it. `query` is only used
    /// to build the base queries of prefetches.
    pub fn plan<Q: QuerySet>(&self, query: &Q, selections: &[Selection], type_name: &str) -> Store<Q> {
        let mut store = Store::new(self.config.keep_column_restriction);
        self.plan_into(&mut store, &mut HashSet::new(), query, selections, type_name);

        store
    }

    /// Plans `selections` into the store of their level. Fragments and the
    /// pagination field share the level's store and its optimized field names,
    /// so a spread plans the same as its fields written inline.
    fn plan_into<'s, Q: QuerySet>(
        &self,
        store: &mut Store<Q>,
        optimized: &mut HashSet<&'s str>,
        query: &Q,
        selections: &'s [Selection],
        type_name: &str,
    ) {
        if selections.is_empty() {
            return;
        }

        let possible_types = self.registry.possible_types(type_name);

        for selection in selections {
            match selection {
                Selection::InlineFragment(fragment) => {
                    self.plan_inline_fragment(store, optimized, query, fragment, &possible_types, type_name);
                }
                Selection::FragmentSpread(spread) => {
                    self.plan_into(store, optimized, query, &spread.selections, type_name);
                }
                Selection::Field(field) if field.is_meta() => {}
                Selection::Field(field) if self.is_pagination_field(field) => {
                    self.plan_into(store, optimized, query, &field.selections, type_name);
                }
                Selection::Field(field) => {
                    if optimized.contains(field.name.as_str()) {
                        continue;
                    }

                    let definition = possible_types.iter().find_map(|object| {
                        let model = self.definition.find_model(object.model()?)?;
                        let meta_field = object.field(&field.name, self.config.naming_convention)?;

                        Some((model, meta_field))
                    });

                    match definition {
                        Some((model, meta_field)) => {
                            optimized.insert(field.name.as_str());
                            self.plan_field(store, query, model, field, meta_field);
                        }
                        None => tracing::trace!(field = %field.name, type_name, "no model defines the field"),
                    }
                }
            }
        }
    }

    fn plan_field<Q: QuerySet>(
        &self,
        store: &mut Store<Q>,
        query: &Q,
        model: ModelWalker<'_>,
        field: &FieldSelection,
        meta_field: &MetaField,
    ) {
        let by_name = self.plan_field_by_name(store, query, model, field, meta_field);
        let by_hints = self.plan_field_by_hints(store, field, meta_field);

        if !(by_name || by_hints) {
            tracing::debug!(
                field = %field.name,
                model = model.name(),
                "cannot tell what the field needs, loading every column"
            );

            store.disable_column_restriction();
        }
    }

    fn plan_field_by_name<Q: QuerySet>(
        &self,
        store: &mut Store<Q>,
        query: &Q,
        model: ModelWalker<'_>,
        field: &FieldSelection,
        meta_field: &MetaField,
    ) -> bool {
        let name = meta_field
            .hints()
            .and_then(|hints| hints.model_field_name(&field.arguments))
            .unwrap_or_else(|| meta_field.name().to_string());

        let head = name.split(LOOKUP_SEPARATOR).next().unwrap_or(&name);

        let Some(model_field) = model.find_field(head) else {
            return false;
        };

        if model_field.is_foreign_key_column(&name) {
            store.only(name);
            return true;
        }

        match model_field.kind() {
            RelationKind::Scalar => store.only(name),
            RelationKind::ForwardOne { .. } | RelationKind::ReverseOne { .. } => {
                let child = self.plan(query, &field.selections, meta_field.ty());

                // The foreign key of a forward relation must be loaded to join it.
                if model_field.column().is_some() {
                    store.only(name.clone());
                }

                store.select_related(&name, child);
            }
            RelationKind::ForwardMany { .. } | RelationKind::ReverseMany { .. } => {
                let Some(target) = model_field.target() else {
                    return false;
                };

                let mut child = self.plan(query, &field.selections, meta_field.ty());

                if let Some(foreign_key) = model_field.kind().reverse_foreign_key() {
                    child.only(foreign_key);
                }

                store.prefetch_related(&name, child, query.unfiltered(target));
            }
        }

        true
    }

    fn plan_field_by_hints<Q>(&self, store: &mut Store<Q>, field: &FieldSelection, meta_field: &MetaField) -> bool {
        let Some(hints) = meta_field.hints() else {
            return false;
        };

        for path in hints.select_related_paths(&field.arguments) {
            store.push_join(path);
        }

        for lookup in hints.prefetch_related_paths(&field.arguments) {
            store.push_prefetch(lookup);
        }

        for column in hints.only_columns(&field.arguments) {
            store.only(column);
        }

        true
    }

    fn plan_inline_fragment<'s, Q: QuerySet>(
        &self,
        store: &mut Store<Q>,
        optimized: &mut HashSet<&'s str>,
        query: &Q,
        fragment: &'s InlineFragment,
        possible_types: &[&ObjectType],
        type_name: &str,
    ) {
        let Some(type_condition) = fragment.type_condition.as_deref() else {
            self.plan_into(store, optimized, query, &fragment.selections, type_name);
            return;
        };

        let Some(base_model) = self.base_model(possible_types) else {
            tracing::debug!(type_name, type_condition, "no common model for the possible types, skipping fragment");
            return;
        };

        for fragment_type in self.registry.possible_types(type_condition) {
            let Some(fragment_model) = fragment_type.model().and_then(|name| self.definition.find_model(name)) else {
                continue;
            };

            match fragment_model.path_from_parent(base_model) {
                Some(path) if path.is_empty() => {
                    self.plan_into(store, optimized, query, &fragment.selections, fragment_type.name());
                }
                Some(path) => {
                    let child = self.plan(query, &fragment.selections, fragment_type.name());
                    store.select_related(&path.join(LOOKUP_SEPARATOR), child);
                }
                None if base_model.is_subclass_of(fragment_model) => {
                    self.plan_into(store, optimized, query, &fragment.selections, fragment_type.name());
                }
                None => {
                    tracing::debug!(
                        type_condition,
                        model = fragment_model.name(),
                        base_model = base_model.name(),
                        "fragment model is unrelated to the queried model, skipping"
                    );
                }
            }
        }
    }

    /// The model all possible types inherit from, i.e. the model being queried.
    fn base_model(&self, possible_types: &[&ObjectType]) -> Option<ModelWalker<'a>> {
        let models = possible_types
            .iter()
            .filter_map(|object| object.model().and_then(|name| self.definition.find_model(name)))
            .collect::<Vec<_>>();

        models
            .iter()
            .copied()
            .find(|candidate| models.iter().all(|model| model.is_subclass_of(*candidate)))
    }

    fn is_pagination_field(&self, field: &FieldSelection) -> bool {
        self.config.pagination_passthrough
            && field.name == self.config.pagination_field
            && !field.selections.is_empty()
    }
}
