mod ids;
mod model;
mod model_field;
mod names;
mod relation_kind;
mod vectorize;
mod walkers;

pub use ids::{ModelFieldId, ModelId};
use inflector::Inflector;
pub use model::Model;
pub use model_field::{ForeignKey, ManyToMany, ModelField};
use names::Names;
pub use relation_kind::RelationKind;
use serde::{Deserialize, Serialize};
pub use walkers::{ModelFieldWalker, ModelWalker, Walker};

/// The separator between relation names in a lookup path, e.g. `color__name`.
pub const LOOKUP_SEPARATOR: &str = "__";

/// Definition of the relational models backing a GraphQL schema. Contains all
/// the models, their fields and the relations between them, for the optimizer
/// to decide what to join, prefetch and load.
///
/// Every relation is stored from both sides: pushing a foreign key adds the
/// forward field to the constrained model and the reverse field to the
/// referenced model.
///
/// The structure can be serialized, so a definition built at startup can be
/// cached and loaded back.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ModelDefinition {
    /// Ordered by insertion.
    models: Vec<Model>,
    /// Ordered by insertion, reverse relations right after their forward side.
    model_fields: Vec<ModelField>,
    names: Names,
}

impl ModelDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over all models of the definition.
    pub fn models(&self) -> impl ExactSizeIterator<Item = ModelWalker<'_>> + '_ {
        (0..self.models.len()).map(move |id| self.walk(ModelId(id as u32)))
    }

    /// Find a model with the specified name.
    pub fn find_model(&self, name: &str) -> Option<ModelWalker<'_>> {
        self.names.get_model_id(name).map(|id| self.walk(id))
    }

    /// Find a field of the given model by its field name or its column name.
    /// Fields inherited from parent models are found too.
    pub fn find_field(&self, model: &str, name: &str) -> Option<ModelFieldWalker<'_>> {
        self.find_model(model).and_then(|model| model.find_field(name))
    }

    /// The relation path from `ancestor` down to `child`, following the parent
    /// links of model inheritance. Empty if both are the same model, `None` if
    /// `child` does not inherit from `ancestor`.
    pub fn path_from_parent(&self, child: &str, ancestor: &str) -> Option<Vec<&str>> {
        let child = self.find_model(child)?;
        let ancestor = self.find_model(ancestor)?;

        child.path_from_parent(ancestor)
    }

    /// Adds a model to the definition.
    pub fn push_model(&mut self, model: Model) -> ModelId {
        let id = ModelId(self.models.len() as u32);

        self.names.intern_model(model.name(), id);
        self.models.push(model);

        id
    }

    /// Adds a plain column to the model.
    pub fn push_column(&mut self, model_id: ModelId, name: impl Into<String>) -> ModelFieldId {
        let name = name.into();

        self.push_field(ModelField {
            model_id,
            column: Some(name.clone()),
            name,
            kind: RelationKind::Scalar,
            counterpart: None,
        })
    }

    /// Adds a foreign key to the constrained model, and its reverse relation to
    /// the referenced model. Returns the id of the forward field.
    ///
    /// # Panics
    ///
    /// If the constrained model was not pushed to this definition.
    pub fn push_foreign_key(&mut self, foreign_key: ForeignKey) -> ModelFieldId {
        let ForeignKey {
            model_id,
            name,
            target,
            column,
            related_name,
            nullable,
            unique,
        } = foreign_key;

        let model_name = self.models[model_id.0 as usize].name().to_lowercase();

        let related_name = related_name.unwrap_or_else(|| match unique {
            true => model_name,
            false => format!("{model_name}_set"),
        });

        let forward_id = self.push_field(ModelField {
            model_id,
            column: Some(column.unwrap_or_else(|| format!("{name}_id"))),
            name: name.clone(),
            kind: RelationKind::ForwardOne { target, nullable },
            counterpart: None,
        });

        let kind = match unique {
            true => RelationKind::ReverseOne {
                target: model_id,
                remote_field: name,
            },
            false => RelationKind::ReverseMany {
                target: model_id,
                remote_field: name,
                many_to_many: false,
            },
        };

        let reverse_id = self.push_field(ModelField {
            model_id: target,
            name: related_name,
            column: None,
            kind,
            counterpart: Some(forward_id),
        });

        self.model_fields[forward_id.0 as usize].counterpart = Some(reverse_id);

        forward_id
    }

    /// Adds a many-to-many relation to the model, and its reverse relation to
    /// the target model. Returns the id of the forward field.
    ///
    /// # Panics
    ///
    /// If the model was not pushed to this definition.
    pub fn push_many_to_many(&mut self, many_to_many: ManyToMany) -> ModelFieldId {
        let ManyToMany {
            model_id,
            name,
            target,
            related_name,
        } = many_to_many;

        let related_name = related_name
            .unwrap_or_else(|| format!("{}_set", self.models[model_id.0 as usize].name().to_lowercase()));

        let forward_id = self.push_field(ModelField {
            model_id,
            name: name.clone(),
            column: None,
            kind: RelationKind::ForwardMany { target },
            counterpart: None,
        });

        let reverse_id = self.push_field(ModelField {
            model_id: target,
            name: related_name,
            column: None,
            kind: RelationKind::ReverseMany {
                target: model_id,
                remote_field: name,
                many_to_many: true,
            },
            counterpart: Some(forward_id),
        });

        self.model_fields[forward_id.0 as usize].counterpart = Some(reverse_id);

        forward_id
    }

    /// Marks `child` as inheriting from `parent`. The child table gets a
    /// one-to-one link to the parent (`<parent>_ptr`), and the parent gets the
    /// reverse relation named after the lowercased child model.
    ///
    /// # Panics
    ///
    /// If either model was not pushed to this definition.
    pub fn push_parent_link(&mut self, child: ModelId, parent: ModelId) -> ModelFieldId {
        let parent_name = self.models[parent.0 as usize].name().to_snake_case();

        let link_id = self.push_foreign_key(ForeignKey::one_to_one(child, format!("{parent_name}_ptr"), parent));
        self.models[child.0 as usize].parent_link = Some(link_id);

        link_id
    }

    /// Walk an item in the definition by its ID.
    pub fn walk<Id>(&self, id: Id) -> Walker<'_, Id> {
        Walker {
            id,
            definition: self,
        }
    }

    fn push_field(&mut self, field: ModelField) -> ModelFieldId {
        let id = ModelFieldId(self.model_fields.len() as u32);

        self.names.intern_model_field(field.model_id(), field.name(), id);

        if let Some(column) = field.column() {
            self.names.intern_model_column(field.model_id(), column, id);
        }

        self.model_fields.push(field);

        id
    }
}
