use indexmap::IndexMap;

use crate::{NamingConvention, OptimizationHints};

/// The output types of the GraphQL schema the optimizer walks, with the model
/// backing each object type.
#[derive(Debug, Default)]
pub struct Registry {
    types: IndexMap<String, MetaType>,
}

#[derive(Debug)]
pub enum MetaType {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
}

#[derive(Debug)]
pub struct ObjectType {
    name: String,
    model: Option<String>,
    fields: Vec<MetaField>,
    interfaces: Vec<String>,
}

#[derive(Debug)]
pub struct InterfaceType {
    name: String,
}

#[derive(Debug)]
pub struct UnionType {
    name: String,
    members: Vec<String>,
}

/// A field definition. `name` is the name of the field in the schema's
/// definition, which is converted with the [`NamingConvention`] when matching
/// selected fields.
#[derive(Debug)]
pub struct MetaField {
    name: String,
    ty: String,
    hints: Option<OptimizationHints>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, ty: impl Into<MetaType>) -> Self {
        self.insert_type(ty);
        self
    }

    pub fn insert_type(&mut self, ty: impl Into<MetaType>) {
        let ty = ty.into();
        self.types.insert(ty.name().to_string(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// The object types a value of type `name` can have: the object itself,
    /// the implementors of an interface, or the members of a union. Empty for
    /// unknown types.
    pub fn possible_types(&self, name: &str) -> Vec<&ObjectType> {
        match self.lookup(name) {
            Some(MetaType::Object(object)) => vec![object],
            Some(MetaType::Interface(interface)) => self
                .types
                .values()
                .filter_map(MetaType::as_object)
                .filter(|object| object.implements_interface(&interface.name))
                .collect(),
            Some(MetaType::Union(union)) => union
                .members
                .iter()
                .filter_map(|member| self.lookup(member).and_then(MetaType::as_object))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            MetaType::Object(object) => &object.name,
            MetaType::Interface(interface) => &interface.name,
            MetaType::Union(union) => &union.name,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            MetaType::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: None,
            fields: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    /// Values of this type are rows of `model`.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_field(mut self, field: MetaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn fields(&self) -> &[MetaField] {
        &self.fields
    }

    pub fn implements_interface(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|name| name == interface)
    }

    /// The definition of the field selected as `graphql_name`.
    pub fn field(&self, graphql_name: &str, naming_convention: NamingConvention) -> Option<&MetaField> {
        self.fields
            .iter()
            .find(|field| naming_convention.graphql_name(&field.name) == graphql_name)
    }
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl UnionType {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

impl MetaField {
    /// A field of type `ty`, the name of the type without list or non-null
    /// wrappers.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            hints: None,
        }
    }

    pub fn with_hints(mut self, hints: OptimizationHints) -> Self {
        self.hints = Some(hints);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn hints(&self) -> Option<&OptimizationHints> {
        self.hints.as_ref()
    }
}

impl From<ObjectType> for MetaType {
    fn from(object: ObjectType) -> Self {
        MetaType::Object(object)
    }
}

impl From<InterfaceType> for MetaType {
    fn from(interface: InterfaceType) -> Self {
        MetaType::Interface(interface)
    }
}

impl From<UnionType> for MetaType {
    fn from(union: UnionType) -> Self {
        MetaType::Union(union)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn registry() -> Registry {
        Registry::new()
            .with_type(InterfaceType::new("Node"))
            .with_type(
                ObjectType::new("Fruit")
                    .with_model("Fruit")
                    .implements("Node")
                    .with_field(MetaField::new("color_id", "ID")),
            )
            .with_type(ObjectType::new("Color").with_model("Color").implements("Node"))
            .with_type(ObjectType::new("Stats"))
            .with_type(UnionType::new("SearchResult", ["Color", "Stats", "Missing"]))
    }

    fn names(types: Vec<&ObjectType>) -> Vec<&str> {
        types.into_iter().map(ObjectType::name).collect()
    }

    #[test]
    fn possible_types() {
        let registry = registry();

        assert_eq!(names(registry.possible_types("Fruit")), vec!["Fruit"]);
        assert_eq!(names(registry.possible_types("Node")), vec!["Fruit", "Color"]);
        assert_eq!(names(registry.possible_types("SearchResult")), vec!["Color", "Stats"]);
        assert!(registry.possible_types("String").is_empty());
    }

    #[test]
    fn fields_are_matched_by_their_graphql_name() {
        let registry = registry();
        let fruit = registry.lookup("Fruit").and_then(MetaType::as_object).unwrap();

        assert!(fruit.field("colorId", NamingConvention::CamelCase).is_some());
        assert!(fruit.field("color_id", NamingConvention::CamelCase).is_none());
        assert!(fruit.field("color_id", NamingConvention::Verbatim).is_some());
    }
}
