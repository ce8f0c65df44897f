use inflector::Inflector;
use serde::{Deserialize, Serialize};

use super::ModelFieldId;

/// A model, backed by one table in the database.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Model {
    pub(super) name: String,
    pub(super) table_name: String,
    /// The one-to-one field linking this model to the model it inherits from.
    pub(super) parent_link: Option<ModelFieldId>,
}

impl Model {
    /// A new model. The table name defaults to the snake cased model name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table_name = name.to_snake_case();

        Self {
            name,
            table_name,
            parent_link: None,
        }
    }

    #[must_use]
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn table_name(&self) -> &str {
        &self.table_name
    }
}
