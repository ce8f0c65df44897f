use std::{collections::HashSet, fmt};

use indexmap::IndexSet;
use itertools::Itertools;
use model_definition::{ModelDefinition, ModelFieldWalker, ModelId, ModelWalker, LOOKUP_SEPARATOR};

use super::{Prefetch, QueryError, QuerySet};

/// A query built against a [`ModelDefinition`]: it does not run anywhere, but
/// records and validates what the optimizer asked for, and tells how many
/// queries it would take and which columns it would load.
#[derive(Clone)]
pub struct ModelQuery<'a> {
    definition: &'a ModelDefinition,
    model_id: ModelId,
    joins: IndexSet<String>,
    prefetches: Vec<Prefetch<ModelQuery<'a>>>,
    columns: Option<IndexSet<String>>,
}

impl<'a> ModelQuery<'a> {
    /// All rows of the model with the given name.
    pub fn all(definition: &'a ModelDefinition, model: &str) -> Result<Self, QueryError> {
        definition
            .find_model(model)
            .map(Self::for_model)
            .ok_or_else(|| QueryError::UnknownModel {
                name: model.to_string(),
            })
    }

    pub fn for_model(model: ModelWalker<'a>) -> Self {
        Self {
            definition: model.definition(),
            model_id: model.id(),
            joins: IndexSet::new(),
            prefetches: Vec::new(),
            columns: None,
        }
    }

    pub fn model(&self) -> ModelWalker<'a> {
        self.definition.walk(self.model_id)
    }

    pub fn joins(&self) -> &IndexSet<String> {
        &self.joins
    }

    pub fn prefetches(&self) -> &[Prefetch<ModelQuery<'a>>] {
        &self.prefetches
    }

    pub fn prefetch(&self, lookup: &str) -> Option<&Prefetch<ModelQuery<'a>>> {
        self.prefetches.iter().find(|prefetch| prefetch.lookup == lookup)
    }

    /// `None` if every column is loaded.
    pub fn column_restriction(&self) -> Option<&IndexSet<String>> {
        self.columns.as_ref()
    }

    /// The number of queries it takes to load the rows and every planned
    /// relation: one for the rows, plus one per prefetched relation. Relations
    /// accessed without being joined or prefetched are not counted, they cost
    /// an extra query per row.
    pub fn round_trips(&self) -> usize {
        let planned: HashSet<&str> = self
            .prefetches
            .iter()
            .filter(|prefetch| prefetch.queryset.is_some())
            .map(|prefetch| prefetch.lookup.as_str())
            .collect();

        let mut levels = IndexSet::new();

        for prefetch in &self.prefetches {
            let segments = prefetch.lookup.split(LOOKUP_SEPARATOR).collect::<Vec<_>>();

            for depth in 1..=segments.len() {
                let level = segments[..depth].join(LOOKUP_SEPARATOR);

                if !planned.contains(level.as_str()) && !self.joins.contains(&level) {
                    levels.insert(level);
                }
            }
        }

        let nested: usize = self
            .prefetches
            .iter()
            .filter_map(|prefetch| prefetch.queryset.as_ref())
            .map(ModelQuery::round_trips)
            .sum();

        1 + levels.len() + nested
    }

    /// The fields of the model stored in its own table which the query loads,
    /// `None` if it loads all of them.
    pub fn loaded_fields(&self) -> Option<Vec<&'a str>> {
        let columns = self.columns.as_ref()?;
        let model = self.model();

        let fields = columns
            .iter()
            .filter_map(|column| column.split(LOOKUP_SEPARATOR).next())
            .filter_map(|head| model.find_field(head))
            .filter(|field| field.column().is_some())
            .map(|field| field.name())
            .unique()
            .collect();

        Some(fields)
    }

    /// Resolves every segment of the lookup to a field.
    fn resolve(&self, lookup: &str) -> Result<Vec<ModelFieldWalker<'a>>, QueryError> {
        let mut model = self.model();
        let mut fields = Vec::new();
        let mut segments = lookup.split(LOOKUP_SEPARATOR).peekable();

        while let Some(segment) = segments.next() {
            let field = model.find_field(segment).ok_or_else(|| QueryError::UnknownField {
                model: model.name().to_string(),
                field: segment.to_string(),
                lookup: lookup.to_string(),
            })?;

            fields.push(field);

            if segments.peek().is_none() {
                break;
            }

            model = field
                .target()
                .ok_or_else(|| field_error(field, lookup, ErrorKind::NotARelation))?;
        }

        Ok(fields)
    }

    fn check_deferred_joins(&self) -> Result<(), QueryError> {
        let Some(columns) = &self.columns else {
            return Ok(());
        };

        for join in &self.joins {
            let mut path = String::new();

            for field in self.resolve(join)? {
                let Some(column) = field.column() else {
                    push_segment(&mut path, field.name());
                    continue;
                };

                let column_path = match path.is_empty() {
                    true => column.to_string(),
                    false => format!("{path}{LOOKUP_SEPARATOR}{column}"),
                };

                push_segment(&mut path, field.name());

                let nested = format!("{path}{LOOKUP_SEPARATOR}");

                let loaded = columns
                    .iter()
                    .any(|loaded| *loaded == path || *loaded == column_path || loaded.starts_with(&nested));

                if !loaded {
                    return Err(QueryError::DeferredAndJoined {
                        model: field.model().name().to_string(),
                        field: field.name().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl QuerySet for ModelQuery<'_> {
    type Error = QueryError;

    fn unfiltered(&self, model: ModelWalker<'_>) -> Self {
        Self {
            definition: self.definition,
            model_id: model.id(),
            joins: IndexSet::new(),
            prefetches: Vec::new(),
            columns: None,
        }
    }

    fn with_joins(mut self, paths: Vec<String>) -> Result<Self, QueryError> {
        for path in paths {
            for field in self.resolve(&path)? {
                if field.is_to_many() {
                    return Err(field_error(field, &path, ErrorKind::NotSingleValued));
                }

                if !field.is_relation() {
                    return Err(field_error(field, &path, ErrorKind::NotARelation));
                }
            }

            self.joins.insert(path);
        }

        self.check_deferred_joins()?;

        Ok(self)
    }

    fn with_prefetches(mut self, prefetches: Vec<Prefetch<Self>>) -> Result<Self, QueryError> {
        for prefetch in prefetches {
            let fields = self.resolve(&prefetch.lookup)?;

            if let Some(field) = fields.iter().find(|field| !field.is_relation()) {
                return Err(field_error(*field, &prefetch.lookup, ErrorKind::NotARelation));
            }

            let target = fields.last().and_then(|field| field.target());

            if let (Some(queryset), Some(target)) = (&prefetch.queryset, target) {
                if queryset.model_id != target.id() {
                    return Err(QueryError::PrefetchModelMismatch {
                        lookup: prefetch.lookup.clone(),
                        expected: target.name().to_string(),
                        actual: queryset.model().name().to_string(),
                    });
                }
            }

            if let Some(existing) = self.prefetch(&prefetch.lookup) {
                if existing.queryset.is_some() || prefetch.queryset.is_some() {
                    return Err(QueryError::ConflictingPrefetch {
                        lookup: prefetch.lookup,
                    });
                }

                continue;
            }

            self.prefetches.push(prefetch);
        }

        Ok(self)
    }

    fn with_column_restriction(mut self, columns: Vec<String>) -> Result<Self, QueryError> {
        let mut restriction = IndexSet::with_capacity(columns.len());

        for column in columns {
            let fields = self.resolve(&column)?;

            let Some((last, path)) = fields.split_last() else {
                continue;
            };

            if let Some(field) = path.iter().find(|field| field.is_to_many()) {
                return Err(field_error(*field, &column, ErrorKind::NotSingleValued));
            }

            if last.column().is_none() {
                return Err(field_error(*last, &column, ErrorKind::NotAColumn));
            }

            restriction.insert(column);
        }

        self.columns = Some(restriction);
        self.check_deferred_joins()?;

        Ok(self)
    }
}

impl fmt::Display for ModelQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model().name())?;

        if !self.joins.is_empty() {
            write!(f, " joins({})", self.joins.iter().join(", "))?;
        }

        if !self.prefetches.is_empty() {
            let prefetches = self.prefetches.iter().format_with(", ", |prefetch, f| match &prefetch.queryset {
                Some(queryset) => f(&format_args!("{} => [{queryset}]", prefetch.lookup)),
                None => f(&prefetch.lookup),
            });

            write!(f, " prefetches({prefetches})")?;
        }

        if let Some(columns) = &self.columns {
            write!(f, " only({})", columns.iter().join(", "))?;
        }

        Ok(())
    }
}

impl fmt::Debug for ModelQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelQuery")
            .field("model", &self.model().name())
            .field("joins", &self.joins)
            .field("prefetches", &self.prefetches)
            .field("columns", &self.columns)
            .finish()
    }
}

enum ErrorKind {
    NotARelation,
    NotSingleValued,
    NotAColumn,
}

fn field_error(field: ModelFieldWalker<'_>, lookup: &str, kind: ErrorKind) -> QueryError {
    let model = field.model().name().to_string();
    let field = field.name().to_string();
    let lookup = lookup.to_string();

    match kind {
        ErrorKind::NotARelation => QueryError::NotARelation { model, field, lookup },
        ErrorKind::NotSingleValued => QueryError::NotSingleValued { model, field, lookup },
        ErrorKind::NotAColumn => QueryError::NotAColumn { model, field, lookup },
    }
}

fn push_segment(path: &mut String, segment: &str) {
    if !path.is_empty() {
        path.push_str(LOOKUP_SEPARATOR);
    }

    path.push_str(segment);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tests::fixtures;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn unknown_model() {
        let definition = fixtures::definition();
        let error = ModelQuery::all(&definition, "Vegetable").unwrap_err();

        insta::assert_snapshot!(error, @"Unknown model 'Vegetable'");
    }

    #[test]
    fn joins_are_validated() {
        let definition = fixtures::definition();
        let fruits = ModelQuery::all(&definition, "Fruit").unwrap();

        let error = fruits.clone().with_joins(strings(&["colour"])).unwrap_err();
        insta::assert_snapshot!(error, @"Cannot resolve 'colour' into a field of Fruit in lookup 'colour'");

        let error = fruits.clone().with_joins(strings(&["name"])).unwrap_err();
        insta::assert_snapshot!(error, @"Fruit.name is not a relation, cannot follow lookup 'name'");

        let error = fruits.clone().with_joins(strings(&["tags"])).unwrap_err();
        insta::assert_snapshot!(error, @"Fruit.tags relates to many rows and cannot be joined, in lookup 'tags'");

        let joined = fruits.with_joins(strings(&["color__palette", "nutrition"])).unwrap();
        insta::assert_snapshot!(joined, @"Fruit joins(color__palette, nutrition)");
        assert_eq!(joined.round_trips(), 1);
    }

    #[test]
    fn columns_are_validated() {
        let definition = fixtures::definition();
        let fruits = ModelQuery::all(&definition, "Fruit").unwrap();

        let error = fruits.clone().with_column_restriction(strings(&["tags"])).unwrap_err();
        insta::assert_snapshot!(error, @"Fruit.tags has no column to load, in 'tags'");

        let error = fruits
            .clone()
            .with_column_restriction(strings(&["tags__name"]))
            .unwrap_err();
        insta::assert_snapshot!(error, @"Fruit.tags relates to many rows and cannot be joined, in lookup 'tags__name'");

        let restricted = fruits.with_column_restriction(strings(&["id", "color_id"])).unwrap();
        assert_eq!(restricted.loaded_fields(), Some(vec!["id", "color"]));
    }

    #[test]
    fn deferred_relations_cannot_be_joined() {
        let definition = fixtures::definition();

        let error = ModelQuery::all(&definition, "Fruit")
            .unwrap()
            .with_joins(strings(&["color"]))
            .unwrap()
            .with_column_restriction(strings(&["id", "name"]))
            .unwrap_err();

        insta::assert_snapshot!(error, @"Fruit.color cannot be both deferred and joined");

        let error = ModelQuery::all(&definition, "Fruit")
            .unwrap()
            .with_joins(strings(&["color__palette"]))
            .unwrap()
            .with_column_restriction(strings(&["id", "color", "color__name"]))
            .unwrap_err();

        insta::assert_snapshot!(error, @"Color.palette cannot be both deferred and joined");

        for loaded in ["color", "color_id", "color__name"] {
            let query = ModelQuery::all(&definition, "Fruit")
                .unwrap()
                .with_joins(strings(&["color"]))
                .unwrap()
                .with_column_restriction(strings(&[loaded]));

            assert!(query.is_ok(), "{loaded}");
        }
    }

    #[test]
    fn prefetches_are_validated() {
        let definition = fixtures::definition();
        let colors = ModelQuery::all(&definition, "Color").unwrap();
        let fruits = ModelQuery::all(&definition, "Fruit").unwrap();
        let tags = ModelQuery::all(&definition, "Tag").unwrap();

        let error = colors
            .clone()
            .with_prefetches(vec![Prefetch::new("name")])
            .unwrap_err();
        insta::assert_snapshot!(error, @"Color.name is not a relation, cannot follow lookup 'name'");

        let error = colors
            .clone()
            .with_prefetches(vec![Prefetch::new("fruits").with_queryset(tags)])
            .unwrap_err();
        insta::assert_snapshot!(error, @"The query prefetching 'fruits' must be on Fruit, not Tag");

        let error = colors
            .clone()
            .with_prefetches(vec![
                Prefetch::new("fruits"),
                Prefetch::new("fruits").with_queryset(fruits.clone()),
            ])
            .unwrap_err();
        insta::assert_snapshot!(error, @"'fruits' is prefetched more than once with different queries");

        let deduplicated = colors
            .with_prefetches(vec![Prefetch::new("fruits"), Prefetch::new("fruits")])
            .unwrap();
        insta::assert_snapshot!(deduplicated, @"Color prefetches(fruits)");
    }

    #[test]
    fn round_trips() {
        let definition = fixtures::definition();
        let colors = ModelQuery::all(&definition, "Color").unwrap();

        assert_eq!(colors.round_trips(), 1);

        let fruits = colors
            .unfiltered(definition.find_model("Fruit").unwrap())
            .with_prefetches(vec![Prefetch::new("tags")])
            .unwrap();

        let planned = colors
            .clone()
            .with_prefetches(vec![Prefetch::new("fruits").with_queryset(fruits)])
            .unwrap();

        insta::assert_snapshot!(planned, @"Color prefetches(fruits => [Fruit prefetches(tags)])");
        assert_eq!(planned.round_trips(), 3);

        let lifted = colors
            .with_prefetches(vec![Prefetch::new("fruits__tags"), Prefetch::new("fruits")])
            .unwrap();

        assert_eq!(lifted.round_trips(), 3);
    }

    #[test]
    fn prefetch_through_a_joined_relation() {
        let definition = fixtures::definition();

        let fruits = ModelQuery::all(&definition, "Fruit")
            .unwrap()
            .with_joins(strings(&["color"]))
            .unwrap()
            .with_prefetches(vec![Prefetch::new("color__fruits")])
            .unwrap();

        assert_eq!(fruits.round_trips(), 2);
        assert_eq!(fruits.loaded_fields(), None);
    }
}
