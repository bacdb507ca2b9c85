//! In-memory catalog service for tests and offline development.
//!
//! Behaves like the hosted backend from the core's point of view: identities
//! are assigned on insert, listings are ordered by `date_added`, uploads get a
//! public URL and sign-in resolves tokens against registered users. Nothing
//! is persisted.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use super::{CatalogService, EntryOrder, parse_callback_token};
use crate::error::{Error, Result};
use crate::types::{CatalogEntry, Category, EntryPatch, Identity, NewEntry, Session};

const BASE_URL: &str = "memory://catalog";

#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<CatalogEntry>,
    categories: Vec<Category>,
    assets: HashMap<(String, String), StoredAsset>,
    users: HashMap<String, Identity>,
    session: Option<Session>,
}

#[derive(Debug)]
pub struct InMemoryCatalogService {
    state: RwLock<MemoryState>,
    sessions: watch::Sender<Option<Session>>,
}

impl Default for InMemoryCatalogService {
    fn default() -> Self {
        Self::new()
    }
}

fn poison_err<T>(_: PoisonError<T>) -> Error {
    Error::Remote {
        status: 500,
        message: "in-memory catalog lock poisoned".to_string(),
    }
}

impl InMemoryCatalogService {
    #[must_use]
    pub fn new() -> Self {
        let (sessions, _) = watch::channel(None);
        Self {
            state: RwLock::new(MemoryState::default()),
            sessions,
        }
    }

    /// Adds an entry as-is, keeping its identity and timestamps.
    pub fn seed_entry(&self, entry: CatalogEntry) -> Result<()> {
        let mut state = self.state.write().map_err(poison_err)?;
        if state.entries.iter().any(|e| e.id == entry.id) {
            return Err(Error::Remote {
                status: 409,
                message: format!("duplicate key value: id {}", entry.id),
            });
        }
        state.entries.push(entry);
        Ok(())
    }

    pub fn seed_category(&self, name: &str) -> Result<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: slugify(name),
        };
        self.state
            .write()
            .map_err(poison_err)?
            .categories
            .push(category.clone());
        Ok(category)
    }

    pub fn remove_category(&self, name: &str) -> Result<bool> {
        let mut state = self.state.write().map_err(poison_err)?;
        let before = state.categories.len();
        state.categories.retain(|c| c.name != name);
        Ok(state.categories.len() != before)
    }

    /// Makes `token` a valid sign-in callback for `identity`.
    pub fn register_user(&self, token: &str, identity: Identity) -> Result<()> {
        self.state
            .write()
            .map_err(poison_err)?
            .users
            .insert(token.to_string(), identity);
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.state.read().map_err(poison_err)?.entries.clone())
    }

    pub fn asset(&self, bucket: &str, name: &str) -> Result<Option<StoredAsset>> {
        Ok(self
            .state
            .read()
            .map_err(poison_err)?
            .assets
            .get(&(bucket.to_string(), name.to_string()))
            .cloned())
    }

    pub fn asset_count(&self) -> Result<usize> {
        Ok(self.state.read().map_err(poison_err)?.assets.len())
    }

    fn public_url(bucket: &str, name: &str) -> String {
        format!("{BASE_URL}/storage/v1/object/public/{bucket}/{name}")
    }

    fn set_session(&self, session: Option<Session>) -> Result<()> {
        self.state.write().map_err(poison_err)?.session = session.clone();
        self.sessions.send_replace(session);
        Ok(())
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[async_trait]
impl CatalogService for InMemoryCatalogService {
    async fn list_entries(&self, order: EntryOrder) -> Result<Vec<CatalogEntry>> {
        let mut entries = self.state.read().map_err(poison_err)?.entries.clone();
        match order {
            EntryOrder::NewestFirst => entries.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
            EntryOrder::OldestFirst => entries.sort_by(|a, b| a.date_added.cmp(&b.date_added)),
        }
        Ok(entries)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.state.read().map_err(poison_err)?.categories.clone())
    }

    async fn insert_entry(&self, new: &NewEntry) -> Result<CatalogEntry> {
        let mut state = self.state.write().map_err(poison_err)?;

        // Keep date_added strictly increasing so newest-first ordering is total.
        let mut date_added = Utc::now();
        if let Some(latest) = state.entries.iter().map(|e| e.date_added).max() {
            if date_added <= latest {
                date_added = latest + Duration::milliseconds(1);
            }
        }

        let fields = new.fields.clone();
        let entry = CatalogEntry {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            brief_description: fields.brief_description,
            full_description: fields.full_description,
            image_url: Some(fields.image_url),
            workflow_json: fields.workflow_json,
            tags: fields.tags,
            tools_used: fields.tools_used,
            category: fields.category,
            difficulty: fields.difficulty,
            use_case: fields.use_case,
            date_added,
            views: 0,
            author_id: new.author_id.clone(),
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, id: &str, patch: &EntryPatch) -> Result<CatalogEntry> {
        let mut state = self.state.write().map_err(poison_err)?;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Error::NotFound)?;

        let fields = patch.fields.clone();
        entry.title = fields.title;
        entry.brief_description = fields.brief_description;
        entry.full_description = fields.full_description;
        entry.image_url = Some(fields.image_url);
        entry.workflow_json = fields.workflow_json;
        entry.tags = fields.tags;
        entry.tools_used = fields.tools_used;
        entry.category = fields.category;
        entry.difficulty = fields.difficulty;
        entry.use_case = fields.use_case;
        Ok(entry.clone())
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().map_err(poison_err)?;
        let before = state.entries.len();
        state.entries.retain(|e| e.id != id);
        if state.entries.len() == before {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn upload_asset(
        &self,
        bucket: &str,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String> {
        let mut state = self.state.write().map_err(poison_err)?;
        let key = (bucket.to_string(), name.to_string());
        if state.assets.contains_key(&key) {
            return Err(Error::Remote {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        state.assets.insert(
            key,
            StoredAsset {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(Self::public_url(bucket, name))
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.state.read().map_err(poison_err)?.session.clone())
    }

    async fn sign_in(&self, provider: &str, redirect_to: &str) -> Result<String> {
        Ok(format!(
            "{BASE_URL}/auth/v1/authorize?provider={}&redirect_to={}",
            urlencoding::encode(provider),
            urlencoding::encode(redirect_to)
        ))
    }

    async fn complete_sign_in(&self, callback: &str) -> Result<Session> {
        let token = parse_callback_token(callback).ok_or(Error::Unauthorized)?;
        let user = self
            .state
            .read()
            .map_err(poison_err)?
            .users
            .get(&token)
            .cloned()
            .ok_or(Error::Unauthorized)?;

        let session = Session {
            access_token: token,
            user,
        };
        self.set_session(Some(session.clone()))?;
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.set_session(None)
    }

    fn subscribe_sessions(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}
