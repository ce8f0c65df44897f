use serde::{Deserialize, Serialize};

use super::{ModelFieldId, ModelId, RelationKind};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelField {
    pub(super) model_id: ModelId,
    pub(super) name: String,
    /// The database column, if the field is stored on this model's table.
    pub(super) column: Option<String>,
    pub(super) kind: RelationKind,
    /// The field on the other side of a relation.
    pub(super) counterpart: Option<ModelFieldId>,
}

impl ModelField {
    pub(crate) fn model_id(&self) -> ModelId {
        self.model_id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }
}

/// A foreign key from `model_id` to `target`, pushed together with its reverse
/// relation on the target model.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub(super) model_id: ModelId,
    pub(super) name: String,
    pub(super) target: ModelId,
    pub(super) column: Option<String>,
    pub(super) related_name: Option<String>,
    pub(super) nullable: bool,
    pub(super) unique: bool,
}

impl ForeignKey {
    pub fn new(model_id: ModelId, name: impl Into<String>, target: ModelId) -> Self {
        Self {
            model_id,
            name: name.into(),
            target,
            column: None,
            related_name: None,
            nullable: false,
            unique: false,
        }
    }

    /// A foreign key with a unique constraint, the reverse side returns at most one row.
    pub fn one_to_one(model_id: ModelId, name: impl Into<String>, target: ModelId) -> Self {
        Self {
            unique: true,
            ..Self::new(model_id, name, target)
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The column name. Defaults to the field name suffixed with `_id`.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// The name of the reverse relation on the target model.
    #[must_use]
    pub fn related_name(mut self, related_name: impl Into<String>) -> Self {
        self.related_name = Some(related_name.into());
        self
    }
}

/// A many-to-many relation from `model_id` to `target`, pushed together with
/// its reverse relation on the target model.
#[derive(Debug, Clone)]
pub struct ManyToMany {
    pub(super) model_id: ModelId,
    pub(super) name: String,
    pub(super) target: ModelId,
    pub(super) related_name: Option<String>,
}

impl ManyToMany {
    pub fn new(model_id: ModelId, name: impl Into<String>, target: ModelId) -> Self {
        Self {
            model_id,
            name: name.into(),
            target,
            related_name: None,
        }
    }

    #[must_use]
    pub fn related_name(mut self, related_name: impl Into<String>) -> Self {
        self.related_name = Some(related_name.into());
        self
    }
}
