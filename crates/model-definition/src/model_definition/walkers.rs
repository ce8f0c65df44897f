mod model;
mod model_field;

pub use model::ModelWalker;
pub use model_field::ModelFieldWalker;

use super::ModelDefinition;

/// An abstraction to iterate over the model definition.
///
/// The `Id` must be something that points to an object in the definition.
#[derive(Clone, Copy)]
pub struct Walker<'a, Id> {
    pub(super) id: Id,
    pub(super) definition: &'a ModelDefinition,
}

impl<Id> PartialEq for Walker<'_, Id>
where
    Id: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<'a, Id> Walker<'a, Id>
where
    Id: Copy,
{
    pub fn new(id: Id, definition: &'a ModelDefinition) -> Self {
        Self { id, definition }
    }

    pub fn id(self) -> Id {
        self.id
    }

    /// The definition this walker points into.
    pub fn definition(self) -> &'a ModelDefinition {
        self.definition
    }

    fn walk<OtherId>(self, id: OtherId) -> Walker<'a, OtherId> {
        self.definition.walk(id)
    }
}
