use std::fmt;

use super::{ModelFieldWalker, Walker};
use crate::model_definition::{Model, ModelFieldId, ModelId};

/// Definition of a model.
pub type ModelWalker<'a> = Walker<'a, ModelId>;

impl<'a> ModelWalker<'a> {
    /// The name of the model.
    pub fn name(self) -> &'a str {
        self.get().name()
    }

    /// The name of the table in the database.
    pub fn table_name(self) -> &'a str {
        self.get().table_name()
    }

    /// An iterator over the fields defined on this model, not including the
    /// inherited ones.
    pub fn fields(self) -> impl Iterator<Item = ModelFieldWalker<'a>> + 'a {
        let definition = self.definition;

        definition
            .model_fields
            .iter()
            .enumerate()
            .filter(move |(_, field)| field.model_id() == self.id)
            .map(move |(id, _)| definition.walk(ModelFieldId(id as u32)))
    }

    /// Find a field by its name or column, first on this model and then on the
    /// models it inherits from.
    pub fn find_field(self, name: &str) -> Option<ModelFieldWalker<'a>> {
        let names = &self.definition.names;

        names
            .get_model_field_id(self.id, name)
            .or_else(|| names.get_model_column_id(self.id, name))
            .map(|id| self.walk(id))
            .or_else(|| self.parent().and_then(|parent| parent.find_field(name)))
    }

    /// The one-to-one field linking this model to its parent model.
    pub fn parent_link(self) -> Option<ModelFieldWalker<'a>> {
        self.get().parent_link.map(|id| self.walk(id))
    }

    /// The model this model inherits from.
    pub fn parent(self) -> Option<ModelWalker<'a>> {
        self.parent_link().and_then(|link| link.target())
    }

    /// True if the model is `ancestor` or inherits from it.
    pub fn is_subclass_of(self, ancestor: ModelWalker<'_>) -> bool {
        self.path_from_parent(ancestor).is_some()
    }

    /// The relation names leading from `ancestor` down to this model.
    pub fn path_from_parent(self, ancestor: ModelWalker<'_>) -> Option<Vec<&'a str>> {
        let mut path = Vec::new();
        let mut current = self;

        while current.id != ancestor.id {
            let link = current.parent_link()?;
            path.push(link.counterpart()?.name());
            current = link.target()?;
        }

        path.reverse();

        Some(path)
    }

    fn get(self) -> &'a Model {
        &self.definition.models[self.id.0 as usize]
    }
}

impl fmt::Debug for ModelWalker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model").field("name", &self.name()).finish()
    }
}
