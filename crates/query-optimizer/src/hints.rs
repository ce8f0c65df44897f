use std::{fmt, sync::Arc};

use crate::Arguments;

type Strategy<T> = Arc<dyn Fn(&Arguments) -> T + Send + Sync>;

/// Per-field annotations telling the optimizer what a field needs when its
/// name alone does not map to a model field: a computed field reading other
/// columns, or a field backed by a relation under another name.
///
/// Every hint is either a static value or a function of the field's arguments.
#[derive(Clone)]
pub struct OptimizationHints {
    model_field: Strategy<Option<String>>,
    select_related: Strategy<Vec<String>>,
    prefetch_related: Strategy<Vec<String>>,
    only: Strategy<Vec<String>>,
}

impl Default for OptimizationHints {
    fn default() -> Self {
        Self {
            model_field: Arc::new(|_| None),
            select_related: Arc::new(no_paths),
            prefetch_related: Arc::new(no_paths),
            only: Arc::new(no_paths),
        }
    }
}

impl fmt::Debug for OptimizationHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizationHints").finish_non_exhaustive()
    }
}

fn no_paths(_: &Arguments) -> Vec<String> {
    Vec::new()
}

impl OptimizationHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// The model field backing this GraphQL field, if named differently.
    pub fn model_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.model_field = Arc::new(move |_| Some(name.clone()));
        self
    }

    pub fn model_field_with<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&Arguments) -> Option<String> + Send + Sync + 'static,
    {
        self.model_field = Arc::new(strategy);
        self
    }

    /// Relation paths to join when the field is selected.
    pub fn select_related(mut self, paths: impl IntoPaths) -> Self {
        self.select_related = constant(paths.into_paths());
        self
    }

    pub fn select_related_with<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&Arguments) -> Vec<String> + Send + Sync + 'static,
    {
        self.select_related = Arc::new(strategy);
        self
    }

    /// Relation paths to prefetch when the field is selected.
    pub fn prefetch_related(mut self, paths: impl IntoPaths) -> Self {
        self.prefetch_related = constant(paths.into_paths());
        self
    }

    pub fn prefetch_related_with<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&Arguments) -> Vec<String> + Send + Sync + 'static,
    {
        self.prefetch_related = Arc::new(strategy);
        self
    }

    /// Columns to load when the field is selected.
    pub fn only(mut self, columns: impl IntoPaths) -> Self {
        self.only = constant(columns.into_paths());
        self
    }

    pub fn only_with<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&Arguments) -> Vec<String> + Send + Sync + 'static,
    {
        self.only = Arc::new(strategy);
        self
    }

    pub fn model_field_name(&self, arguments: &Arguments) -> Option<String> {
        (self.model_field)(arguments)
    }

    pub fn select_related_paths(&self, arguments: &Arguments) -> Vec<String> {
        (self.select_related)(arguments)
    }

    pub fn prefetch_related_paths(&self, arguments: &Arguments) -> Vec<String> {
        (self.prefetch_related)(arguments)
    }

    pub fn only_columns(&self, arguments: &Arguments) -> Vec<String> {
        (self.only)(arguments)
    }
}

fn constant(paths: Vec<String>) -> Strategy<Vec<String>> {
    Arc::new(move |_| paths.clone())
}

/// A static hint value: one path or several.
pub trait IntoPaths {
    fn into_paths(self) -> Vec<String>;
}

impl IntoPaths for &str {
    fn into_paths(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoPaths for String {
    fn into_paths(self) -> Vec<String> {
        vec![self]
    }
}

impl<S: Into<String>> IntoPaths for Vec<S> {
    fn into_paths(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<String>, const N: usize> IntoPaths for [S; N] {
    fn into_paths(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}
