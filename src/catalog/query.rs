use std::fmt;
use std::sync::Arc;

use crate::types::{CatalogEntry, Category};

use super::store::CatalogSnapshot;

/// Label of the option that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// The selected category filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Exact, case-sensitive match. Independent of whether the category still exists.
    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => entry.category == *name,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(selected: &str) -> Self {
        if selected == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(selected.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CatalogQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl CatalogQuery {
    pub fn new(search: impl Into<String>, category: impl Into<CategoryFilter>) -> Self {
        Self {
            search: search.into(),
            category: category.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.category.matches(entry) && text_matches(entry, &self.search.to_lowercase())
    }
}

/// `needle` must already be lower-cased.
fn text_matches(entry: &CatalogEntry, needle: &str) -> bool {
    needle.is_empty()
        || entry.title.to_lowercase().contains(needle)
        || entry.brief_description.to_lowercase().contains(needle)
        || entry
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Entries matching `query`, in their original order.
#[must_use]
pub fn visible<'a>(entries: &'a [CatalogEntry], query: &CatalogQuery) -> Vec<&'a CatalogEntry> {
    let needle = query.search.to_lowercase();
    entries
        .iter()
        .filter(|e| query.category.matches(e) && text_matches(e, &needle))
        .collect()
}

/// Filter options: the "All" sentinel followed by every known category name.
#[must_use]
pub fn category_options(categories: &[Category]) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(categories.iter().map(|c| c.name.clone()))
        .collect()
}

/// Memoizes [`visible`] on (entry list, search text, category).
///
/// The entry list is compared by identity, so one engine can be shared
/// between snapshots of different stores.
#[derive(Debug, Default)]
pub struct QueryEngine {
    cached: Option<CachedResult>,
}

#[derive(Debug)]
struct CachedResult {
    entries: Arc<Vec<CatalogEntry>>,
    generation: u64,
    query: CatalogQuery,
    indices: Vec<usize>,
}

impl QueryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible<'a>(
        &mut self,
        snapshot: &'a CatalogSnapshot,
        query: &CatalogQuery,
    ) -> Vec<&'a CatalogEntry> {
        if !self.is_cached(snapshot, query) {
            let needle = query.search.to_lowercase();
            let indices = snapshot
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| query.category.matches(e) && text_matches(e, &needle))
                .map(|(i, _)| i)
                .collect();
            self.cached = Some(CachedResult {
                entries: Arc::clone(&snapshot.entries),
                generation: snapshot.generation,
                query: query.clone(),
                indices,
            });
        }

        match &self.cached {
            Some(cached) => cached
                .indices
                .iter()
                .filter_map(|&i| snapshot.entries.get(i))
                .collect(),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_cached(&self, snapshot: &CatalogSnapshot, query: &CatalogQuery) -> bool {
        self.cached.as_ref().is_some_and(|cached| {
            Arc::ptr_eq(&cached.entries, &snapshot.entries)
                && cached.generation == snapshot.generation
                && cached.query == *query
        })
    }
}
