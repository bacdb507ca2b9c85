//! # Flowshelf
//!
//! A catalog of automation workflows backed by a hosted data store, usable
//! both as a CLI and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! flowshelf = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flowshelf::catalog::{CatalogQuery, CatalogStore, QueryEngine};
//! use flowshelf::config::ClientConfig;
//! use flowshelf::remote::RestCatalogService;
//!
//! let config = ClientConfig::load(None)?;
//! let store = CatalogStore::new(Arc::new(RestCatalogService::new(&config)?));
//! store.refresh_entries().await?;
//!
//! let snapshot = store.snapshot();
//! let mut engine = QueryEngine::new();
//! for entry in engine.visible(&snapshot, &CatalogQuery::new("slack", "All")) {
//!     println!("{}", entry.title);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod remote;
pub mod session;
pub mod types;
