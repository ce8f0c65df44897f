use serde::{Deserialize, Serialize};

use super::ModelId;

/// How a model field relates to other models. Decided once when the field is
/// pushed to the definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    /// A plain column.
    Scalar,
    /// A foreign key or a one-to-one field defined on this model.
    ForwardOne { target: ModelId, nullable: bool },
    /// The other side of a one-to-one field defined on `target`.
    ReverseOne { target: ModelId, remote_field: String },
    /// A many-to-many field defined on this model.
    ForwardMany { target: ModelId },
    /// The other side of a foreign key or a many-to-many field defined on `target`.
    ReverseMany {
        target: ModelId,
        remote_field: String,
        many_to_many: bool,
    },
}

impl RelationKind {
    /// The model on the other side of the relation.
    pub fn target(&self) -> Option<ModelId> {
        match self {
            RelationKind::Scalar => None,
            RelationKind::ForwardOne { target, .. }
            | RelationKind::ReverseOne { target, .. }
            | RelationKind::ForwardMany { target }
            | RelationKind::ReverseMany { target, .. } => Some(*target),
        }
    }

    pub fn is_relation(&self) -> bool {
        !matches!(self, RelationKind::Scalar)
    }

    /// At most one row on the other side: can be joined in the same query.
    pub fn is_to_one(&self) -> bool {
        matches!(self, RelationKind::ForwardOne { .. } | RelationKind::ReverseOne { .. })
    }

    /// Any number of rows on the other side: needs a separate query.
    pub fn is_to_many(&self) -> bool {
        matches!(self, RelationKind::ForwardMany { .. } | RelationKind::ReverseMany { .. })
    }

    /// For the reverse side of a plain foreign key, the name of the foreign
    /// key field on the target model.
    pub fn reverse_foreign_key(&self) -> Option<&str> {
        match self {
            RelationKind::ReverseMany {
                remote_field,
                many_to_many: false,
                ..
            } => Some(remote_field),
            _ => None,
        }
    }
}
