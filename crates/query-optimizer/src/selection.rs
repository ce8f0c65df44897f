mod document;

pub use document::{parse_selections, DocumentError, Variables};

use crate::Arguments;

/// One node of the selection tree of a GraphQL operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(FieldSelection),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSelection {
    pub name: String,
    pub alias: Option<String>,
    /// Argument values with variables already substituted.
    pub arguments: Arguments,
    pub selections: Vec<Selection>,
}

/// A named fragment, with its definition already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpread {
    pub name: String,
    pub type_condition: String,
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<String>,
    pub selections: Vec<Selection>,
}

impl Selection {
    pub fn field(name: impl Into<String>) -> Self {
        Selection::Field(FieldSelection::new(name))
    }
}

impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn with_selections(mut self, selections: impl IntoIterator<Item = Selection>) -> Self {
        self.selections.extend(selections);
        self
    }

    /// The key of the field in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// `__typename` and the other introspection fields.
    pub fn is_meta(&self) -> bool {
        self.name.starts_with("__")
    }

    /// Finds a top-level field by its response key.
    pub fn find<'a>(selections: &'a [Selection], response_key: &str) -> Option<&'a FieldSelection> {
        selections.iter().find_map(|selection| match selection {
            Selection::Field(field) if field.response_key() == response_key => Some(field),
            _ => None,
        })
    }
}

impl From<FieldSelection> for Selection {
    fn from(field: FieldSelection) -> Self {
        Selection::Field(field)
    }
}

impl From<FragmentSpread> for Selection {
    fn from(spread: FragmentSpread) -> Self {
        Selection::FragmentSpread(spread)
    }
}

impl From<InlineFragment> for Selection {
    fn from(fragment: InlineFragment) -> Self {
        Selection::InlineFragment(fragment)
    }
}
