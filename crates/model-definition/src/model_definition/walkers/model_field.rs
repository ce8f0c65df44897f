use std::fmt;

use super::{ModelWalker, Walker};
use crate::model_definition::{ModelField, ModelFieldId, RelationKind};

/// Definition of a model field.
pub type ModelFieldWalker<'a> = Walker<'a, ModelFieldId>;

impl<'a> ModelFieldWalker<'a> {
    /// The name of the field.
    pub fn name(self) -> &'a str {
        self.get().name()
    }

    /// The database column storing the field, if stored on the model's table.
    pub fn column(self) -> Option<&'a str> {
        self.get().column()
    }

    pub fn kind(self) -> &'a RelationKind {
        &self.get().kind
    }

    /// The model defining the field.
    pub fn model(self) -> ModelWalker<'a> {
        self.walk(self.get().model_id())
    }

    /// The model on the other side of the relation.
    pub fn target(self) -> Option<ModelWalker<'a>> {
        self.kind().target().map(|id| self.walk(id))
    }

    /// The field on the other side of the relation.
    pub fn counterpart(self) -> Option<ModelFieldWalker<'a>> {
        self.get().counterpart.map(|id| self.walk(id))
    }

    pub fn is_relation(self) -> bool {
        self.kind().is_relation()
    }

    pub fn is_to_one(self) -> bool {
        self.kind().is_to_one()
    }

    pub fn is_to_many(self) -> bool {
        self.kind().is_to_many()
    }

    /// True if `name` selects the raw column of a foreign key (`color_id`)
    /// instead of the related row (`color`).
    pub fn is_foreign_key_column(self, name: &str) -> bool {
        matches!(self.kind(), RelationKind::ForwardOne { .. }) && self.name() != name && self.column() == Some(name)
    }

    fn get(self) -> &'a ModelField {
        &self.definition.model_fields[self.id.0 as usize]
    }
}

impl fmt::Debug for ModelFieldWalker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelField")
            .field("model", &self.model().name())
            .field("name", &self.name())
            .field("kind", self.kind())
            .finish()
    }
}
