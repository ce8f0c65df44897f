use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelId(pub(crate) u32);

impl From<u32> for ModelId {
    fn from(value: u32) -> Self {
        ModelId(value)
    }
}

impl From<ModelId> for u32 {
    fn from(value: ModelId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelFieldId(pub(crate) u32);

impl From<u32> for ModelFieldId {
    fn from(value: u32) -> Self {
        ModelFieldId(value)
    }
}

impl From<ModelFieldId> for u32 {
    fn from(value: ModelFieldId) -> Self {
        value.0
    }
}
