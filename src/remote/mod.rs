//! Contract of the hosted catalog service.
//!
//! The [`CatalogService`] trait covers everything the core needs from the
//! backend: table queries and mutations, object storage for images, and the
//! identity provider's session lifecycle.
//!
//! - [`RestCatalogService`] talks to a hosted PostgREST-style backend
//! - [`InMemoryCatalogService`] keeps everything in process for tests and offline work

pub mod http;
pub mod memory;

pub use http::RestCatalogService;
pub use memory::InMemoryCatalogService;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::watch;

use crate::error::Result;
use crate::types::{CatalogEntry, Category, EntryPatch, NewEntry, Session};

/// Sort order for entry listings, keyed on `date_added`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl EntryOrder {
    /// Query-string form understood by the REST backend.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::NewestFirst => "date_added.desc",
            Self::OldestFirst => "date_added.asc",
        }
    }
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_entries(&self, order: EntryOrder) -> Result<Vec<CatalogEntry>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn insert_entry(&self, entry: &NewEntry) -> Result<CatalogEntry>;
    /// Fails with `NotFound` when no entry has this identity.
    async fn update_entry(&self, id: &str, patch: &EntryPatch) -> Result<CatalogEntry>;
    /// Fails with `NotFound` when no entry has this identity.
    async fn delete_entry(&self, id: &str) -> Result<()>;

    /// Stores `bytes` under `name` and returns its public URL.
    async fn upload_asset(
        &self,
        bucket: &str,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String>;

    async fn current_session(&self) -> Result<Option<Session>>;
    /// Returns the URL the user must visit to authenticate with `provider`.
    async fn sign_in(&self, provider: &str, redirect_to: &str) -> Result<String>;
    /// Finishes sign-in from the provider's callback (redirect URL or raw access token).
    async fn complete_sign_in(&self, callback: &str) -> Result<Session>;
    async fn sign_out(&self) -> Result<()>;

    /// Notifies on every sign-in and sign-out completion.
    fn subscribe_sessions(&self) -> watch::Receiver<Option<Session>>;
}

/// Extracts the access token from a provider callback.
///
/// Accepts a full redirect URL carrying `access_token` in its fragment or
/// query, a bare `access_token=...` parameter string, or the raw token.
#[must_use]
pub fn parse_callback_token(callback: &str) -> Option<String> {
    let callback = callback.trim();
    if callback.is_empty() {
        return None;
    }

    let params = match callback.split_once('#') {
        Some((_, fragment)) => fragment,
        None => match callback.split_once('?') {
            Some((_, query)) => query,
            None => callback,
        },
    };

    let from_params = params.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == "access_token" && !value.is_empty()).then(|| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
    });

    if from_params.is_some() {
        return from_params;
    }

    let looks_like_url = callback.contains("://") || callback.contains('=');
    (!looks_like_url && !callback.contains(char::is_whitespace)).then(|| callback.to_string())
}
