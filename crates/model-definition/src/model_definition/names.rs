use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ModelFieldId, ModelId};

#[derive(Default, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(super) struct Names {
    models: HashMap<String, ModelId>,
    #[serde(with = "super::vectorize")]
    model_fields: HashMap<(ModelId, String), ModelFieldId>,
    #[serde(with = "super::vectorize")]
    model_columns: HashMap<(ModelId, String), ModelFieldId>,
}

impl Names {
    pub(super) fn intern_model(&mut self, name: &str, model_id: ModelId) {
        self.models.insert(name.to_string(), model_id);
    }

    pub(super) fn intern_model_field(&mut self, model_id: ModelId, name: &str, field_id: ModelFieldId) {
        self.model_fields.insert((model_id, name.to_string()), field_id);
    }

    pub(super) fn intern_model_column(&mut self, model_id: ModelId, column: &str, field_id: ModelFieldId) {
        self.model_columns.insert((model_id, column.to_string()), field_id);
    }

    pub(super) fn get_model_id(&self, name: &str) -> Option<ModelId> {
        self.models.get(name).copied()
    }

    pub(super) fn get_model_field_id(&self, model_id: ModelId, name: &str) -> Option<ModelFieldId> {
        self.model_fields.get(&(model_id, name.to_string())).copied()
    }

    pub(super) fn get_model_column_id(&self, model_id: ModelId, column: &str) -> Option<ModelFieldId> {
        self.model_columns.get(&(model_id, column.to_string())).copied()
    }
}
