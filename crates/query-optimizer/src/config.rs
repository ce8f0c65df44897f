use std::borrow::Cow;

use inflector::Inflector;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid optimizer configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings of the query optimizer.
///
/// ```toml
/// keep_column_restriction = true
/// pagination_field = "items"
/// naming_convention = "verbatim"
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Keep the column restriction even if some selected fields cannot be
    /// resolved statically. Only safe when those fields need no extra columns.
    pub keep_column_restriction: bool,
    /// Walk the children of the pagination field as if they were selected on
    /// the paginated type itself.
    pub pagination_passthrough: bool,
    /// The name of the field wrapping the rows of a paginated result.
    pub pagination_field: String,
    /// How model-side field names are exposed in the GraphQL schema.
    pub naming_convention: NamingConvention,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            keep_column_restriction: false,
            pagination_passthrough: true,
            pagination_field: String::from("rows"),
            naming_convention: NamingConvention::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

/// Maps the name of a field definition to the name used in GraphQL documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `color_id` is selected as `colorId`.
    #[default]
    CamelCase,
    /// Names are used as they are.
    Verbatim,
}

impl NamingConvention {
    pub fn graphql_name(self, field_name: &str) -> Cow<'_, str> {
        match self {
            NamingConvention::CamelCase => Cow::Owned(field_name.to_camel_case()),
            NamingConvention::Verbatim => Cow::Borrowed(field_name),
        }
    }
}
