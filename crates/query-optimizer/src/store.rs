use indexmap::IndexSet;
use model_definition::LOOKUP_SEPARATOR;

use crate::queryset::{Prefetch, QuerySet};

/// The optimization plan of one level of the selection tree: relations to
/// join, relations to prefetch with follow-up queries, and the columns to
/// load.
///
/// Plans of nested levels are folded into their parent with
/// [`Store::select_related`] and [`Store::prefetch_related`]. Nothing touches
/// the query until [`Store::apply_to`].
#[derive(Debug)]
pub struct Store<Q> {
    joins: IndexSet<String>,
    prefetches: Vec<PrefetchEntry<Q>>,
    columns: ColumnRestriction,
    keep_column_restriction: bool,
}

/// Which columns of the model to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRestriction {
    /// Load these columns only. An empty set loads every column.
    Enabled(IndexSet<String>),
    /// Something selected needs columns nobody could name: load every column.
    Disabled,
}

/// A relation to prefetch, optionally with the plan of its own query.
#[derive(Debug)]
pub struct PrefetchEntry<Q> {
    lookup: String,
    nested: Option<NestedPlan<Q>>,
}

#[derive(Debug)]
struct NestedPlan<Q> {
    store: Box<Store<Q>>,
    base: Q,
}

impl<Q> Store<Q> {
    pub fn new(keep_column_restriction: bool) -> Self {
        Self {
            joins: IndexSet::new(),
            prefetches: Vec::new(),
            columns: ColumnRestriction::Enabled(IndexSet::new()),
            keep_column_restriction,
        }
    }

    pub fn joins(&self) -> &IndexSet<String> {
        &self.joins
    }

    pub fn prefetches(&self) -> &[PrefetchEntry<Q>] {
        &self.prefetches
    }

    pub fn column_restriction(&self) -> &ColumnRestriction {
        &self.columns
    }

    /// The columns to load, `None` if the restriction is disabled.
    pub fn columns(&self) -> Option<&IndexSet<String>> {
        match &self.columns {
            ColumnRestriction::Enabled(columns) => Some(columns),
            ColumnRestriction::Disabled => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty() && self.prefetches.is_empty() && self.columns().is_some_and(IndexSet::is_empty)
    }

    /// Loads the column, unless the restriction is disabled.
    pub fn only(&mut self, column: impl Into<String>) {
        if let ColumnRestriction::Enabled(columns) = &mut self.columns {
            columns.insert(column.into());
        }
    }

    /// Gives up on restricting columns. Final for this store.
    pub fn disable_column_restriction(&mut self) {
        if self.keep_column_restriction {
            tracing::trace!("keeping the column restriction");
            return;
        }

        self.columns = ColumnRestriction::Disabled;
    }

    pub fn push_join(&mut self, path: impl Into<String>) {
        self.joins.insert(path.into());
    }

    /// Prefetches the relation without a planned query. Does nothing if the
    /// relation is already prefetched.
    pub fn push_prefetch(&mut self, lookup: impl Into<String>) {
        self.push_entry(PrefetchEntry {
            lookup: lookup.into(),
            nested: None,
        });
    }

    /// One entry per lookup. A planned query replaces a bare entry, and two
    /// planned queries of the same relation are merged.
    fn push_entry(&mut self, entry: PrefetchEntry<Q>) {
        let Some(existing) = self.prefetches.iter_mut().find(|prefetch| prefetch.lookup == entry.lookup) else {
            self.prefetches.push(entry);
            return;
        };

        let Some(nested) = entry.nested else {
            return;
        };

        match existing.nested.as_mut() {
            Some(existing_nested) => existing_nested.store.merge(*nested.store),
            None => existing.nested = Some(nested),
        }
    }

    /// Folds the plan of a to-one relation into this one. The relation is
    /// joined, and everything planned for it is prefixed with its name.
    pub fn select_related(&mut self, relation: &str, child: Store<Q>) {
        let Store {
            joins,
            prefetches,
            columns,
            ..
        } = child;

        if joins.is_empty() {
            self.joins.insert(relation.to_string());
        } else {
            self.joins
                .extend(joins.iter().map(|path| prefixed(relation, path)));
        }

        for mut prefetch in prefetches {
            prefetch.add_prefix(relation);
            self.push_entry(prefetch);
        }

        match columns {
            ColumnRestriction::Disabled => self.disable_column_restriction(),
            ColumnRestriction::Enabled(child_columns) => {
                if let ColumnRestriction::Enabled(columns) = &mut self.columns {
                    columns.extend(child_columns.iter().map(|column| prefixed(relation, column)));
                }
            }
        }
    }

    /// Folds the plan of a to-many relation into this one. If the child plan
    /// joins or restricts anything, the relation is prefetched with its own
    /// query built from `base`. Otherwise its prefetches are lifted here, or
    /// the relation is prefetched as is.
    pub fn prefetch_related(&mut self, relation: &str, child: Store<Q>, base: Q) {
        let restricts_columns = child.columns().is_some_and(|columns| !columns.is_empty());

        if !child.joins.is_empty() || restricts_columns {
            self.push_entry(PrefetchEntry {
                lookup: relation.to_string(),
                nested: Some(NestedPlan {
                    store: Box::new(child),
                    base,
                }),
            });
        } else if !child.prefetches.is_empty() {
            for mut prefetch in child.prefetches {
                prefetch.add_prefix(relation);
                self.push_entry(prefetch);
            }
        } else {
            self.push_prefetch(relation);
        }
    }

    /// Adds everything planned in `other` to this store.
    pub fn merge(&mut self, other: Store<Q>) {
        self.joins.extend(other.joins);

        for prefetch in other.prefetches {
            self.push_entry(prefetch);
        }

        match other.columns {
            ColumnRestriction::Disabled => self.columns = ColumnRestriction::Disabled,
            ColumnRestriction::Enabled(other_columns) => {
                if let ColumnRestriction::Enabled(columns) = &mut self.columns {
                    columns.extend(other_columns);
                }
            }
        }
    }
}

impl<Q: QuerySet> Store<Q> {
    /// Applies the plan to `query`: joins first, then prefetches, then the
    /// column restriction if there is one.
    pub fn apply_to(self, mut query: Q) -> Result<Q, Q::Error> {
        if !self.joins.is_empty() {
            query = query.with_joins(self.joins.into_iter().collect())?;
        }

        if !self.prefetches.is_empty() {
            let prefetches = self
                .prefetches
                .into_iter()
                .map(PrefetchEntry::render)
                .collect::<Result<Vec<_>, _>>()?;

            query = query.with_prefetches(prefetches)?;
        }

        if let ColumnRestriction::Enabled(columns) = self.columns {
            if !columns.is_empty() {
                query = query.with_column_restriction(columns.into_iter().collect())?;
            }
        }

        Ok(query)
    }
}

impl<Q> PrefetchEntry<Q> {
    pub fn lookup(&self) -> &str {
        &self.lookup
    }

    /// The plan of the prefetch query, if any.
    pub fn plan(&self) -> Option<&Store<Q>> {
        self.nested.as_ref().map(|nested| nested.store.as_ref())
    }

    /// Re-roots the prefetch under `prefix`. A planned query stays attached.
    pub fn add_prefix(&mut self, prefix: &str) {
        self.lookup = prefixed(prefix, &self.lookup);
    }
}

impl<Q: QuerySet> PrefetchEntry<Q> {
    fn render(self) -> Result<Prefetch<Q>, Q::Error> {
        let queryset = match self.nested {
            Some(NestedPlan { store, base }) => Some(store.apply_to(base)?),
            None => None,
        };

        Ok(Prefetch {
            lookup: self.lookup,
            queryset,
        })
    }
}

fn prefixed(prefix: &str, path: &str) -> String {
    format!("{prefix}{LOOKUP_SEPARATOR}{path}")
}
