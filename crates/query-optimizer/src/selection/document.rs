use std::collections::HashMap;

use async_graphql_parser::{
    types::{self, DocumentOperations, ExecutableDocument, FragmentDefinition},
    Positioned,
};
use async_graphql_value::{ConstValue, Name, Value};

use super::{FieldSelection, FragmentSpread, InlineFragment, Selection};
use crate::Arguments;

/// Variable values of an operation, by variable name.
pub type Variables = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Parse(#[from] async_graphql_parser::Error),
    #[error("Unknown operation named '{0}'")]
    UnknownOperation(String),
    #[error("The document has several operations, an operation name is required")]
    OperationNameRequired,
    #[error("Unknown fragment '{0}'")]
    UnknownFragment(String),
    #[error("Fragment '{0}' spreads itself")]
    FragmentCycle(String),
    #[error("Invalid value for argument '{name}': {source}")]
    InvalidArgument { name: String, source: serde_json::Error },
}

/// Parses an executable GraphQL document into the selection tree of one of
/// its operations. Variables are substituted into the arguments, falling back
/// to the defaults of the operation. Fragment spreads carry the selections of
/// their definition, and fields excluded with `@skip` or `@include` are left
/// out.
pub fn parse_selections(
    document: &str,
    operation_name: Option<&str>,
    variables: &Variables,
) -> Result<Vec<Selection>, DocumentError> {
    let document = async_graphql_parser::parse_query(document)?;
    let operation = find_operation(&document, operation_name)?;

    let mut variables = variables.clone();

    for definition in &operation.node.variable_definitions {
        let name = definition.node.name.node.as_str();

        if variables.contains_key(name) {
            continue;
        }

        if let Some(default) = &definition.node.default_value {
            let value = default
                .node
                .clone()
                .into_json()
                .map_err(|source| DocumentError::InvalidArgument {
                    name: name.to_string(),
                    source,
                })?;

            variables.insert(name.to_string(), value);
        }
    }

    let mut ingester = Ingester {
        fragments: &document.fragments,
        variables: &variables,
        spreads: Vec::new(),
    };

    ingester.selection_set(&operation.node.selection_set.node)
}

fn find_operation<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> Result<&'a Positioned<types::OperationDefinition>, DocumentError> {
    match (&document.operations, operation_name) {
        (DocumentOperations::Single(operation), _) => Ok(operation),
        (DocumentOperations::Multiple(operations), Some(wanted)) => operations
            .iter()
            .find(|(name, _)| name.as_str() == wanted)
            .map(|(_, operation)| operation)
            .ok_or_else(|| DocumentError::UnknownOperation(wanted.to_string())),
        (DocumentOperations::Multiple(operations), None) if operations.len() == 1 => operations
            .values()
            .next()
            .ok_or(DocumentError::OperationNameRequired),
        (DocumentOperations::Multiple(_), None) => Err(DocumentError::OperationNameRequired),
    }
}

struct Ingester<'a> {
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    variables: &'a Variables,
    /// Fragments being spread, innermost last.
    spreads: Vec<&'a str>,
}

impl<'a> Ingester<'a> {
    fn selection_set(&mut self, selection_set: &'a types::SelectionSet) -> Result<Vec<Selection>, DocumentError> {
        let mut selections = Vec::with_capacity(selection_set.items.len());

        for item in &selection_set.items {
            if let Some(selection) = self.selection(&item.node)? {
                selections.push(selection);
            }
        }

        Ok(selections)
    }

    fn selection(&mut self, selection: &'a types::Selection) -> Result<Option<Selection>, DocumentError> {
        let selection = match selection {
            types::Selection::Field(field) => {
                if self.is_skipped(&field.node.directives)? {
                    return Ok(None);
                }

                let mut arguments = Arguments::new();

                for (name, value) in &field.node.arguments {
                    let name = name.node.as_str();
                    arguments.insert(name.to_string(), self.argument(name, &value.node)?);
                }

                Selection::Field(FieldSelection {
                    name: field.node.name.node.to_string(),
                    alias: field.node.alias.as_ref().map(|alias| alias.node.to_string()),
                    arguments,
                    selections: self.selection_set(&field.node.selection_set.node)?,
                })
            }
            types::Selection::FragmentSpread(spread) => {
                if self.is_skipped(&spread.node.directives)? {
                    return Ok(None);
                }

                let name = spread.node.fragment_name.node.as_str();

                let fragment = self
                    .fragments
                    .get(&spread.node.fragment_name.node)
                    .ok_or_else(|| DocumentError::UnknownFragment(name.to_string()))?;

                if self.spreads.contains(&name) {
                    return Err(DocumentError::FragmentCycle(name.to_string()));
                }

                self.spreads.push(name);
                let selections = self.selection_set(&fragment.node.selection_set.node)?;
                self.spreads.pop();

                Selection::FragmentSpread(FragmentSpread {
                    name: name.to_string(),
                    type_condition: fragment.node.type_condition.node.on.node.to_string(),
                    selections,
                })
            }
            types::Selection::InlineFragment(fragment) => {
                if self.is_skipped(&fragment.node.directives)? {
                    return Ok(None);
                }

                Selection::InlineFragment(InlineFragment {
                    type_condition: fragment
                        .node
                        .type_condition
                        .as_ref()
                        .map(|condition| condition.node.on.node.to_string()),
                    selections: self.selection_set(&fragment.node.selection_set.node)?,
                })
            }
        };

        Ok(Some(selection))
    }

    fn argument(&self, name: &str, value: &Value) -> Result<serde_json::Value, DocumentError> {
        let invalid = |source| DocumentError::InvalidArgument {
            name: name.to_string(),
            source,
        };

        let value = value.clone().into_const_with(|variable| match self.variables.get(variable.as_str()) {
            Some(value) => ConstValue::from_json(value.clone()).map_err(invalid),
            // Omitted nullable variables resolve to null.
            None => Ok(ConstValue::Null),
        })?;

        value.into_json().map_err(invalid)
    }

    fn is_skipped(&self, directives: &[Positioned<types::Directive>]) -> Result<bool, DocumentError> {
        for directive in directives {
            let skip_when = match directive.node.name.node.as_str() {
                "skip" => true,
                "include" => false,
                _ => continue,
            };

            let Some((_, condition)) = directive
                .node
                .arguments
                .iter()
                .find(|(name, _)| name.node.as_str() == "if")
            else {
                continue;
            };

            if self.argument("if", &condition.node)? == serde_json::Value::Bool(skip_when) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
