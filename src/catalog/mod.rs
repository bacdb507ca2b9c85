//! Catalog state and the visible-list query.

pub mod query;
pub mod store;

pub use query::{ALL_CATEGORIES, CatalogQuery, CategoryFilter, QueryEngine, category_options, visible};
pub use store::{CatalogSnapshot, CatalogStore, DEFAULT_IMAGE_BUCKET, RefreshOutcome};
