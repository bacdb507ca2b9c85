//! A catalog service wrapper that records calls, injects failures and can
//! hold a listing response until released.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{oneshot, watch};

use flowshelf::error::{Error, Result};
use flowshelf::remote::{CatalogService, EntryOrder, InMemoryCatalogService};
use flowshelf::types::{CatalogEntry, Category, EntryPatch, NewEntry, Session};

pub const LIST_ENTRIES: &str = "list_entries";
pub const LIST_CATEGORIES: &str = "list_categories";
pub const INSERT: &str = "insert_entry";
pub const UPDATE: &str = "update_entry";
pub const DELETE: &str = "delete_entry";
pub const UPLOAD: &str = "upload_asset";

#[derive(Default)]
pub struct ScriptedService {
    pub inner: InMemoryCatalogService,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
    held_list: Mutex<Option<oneshot::Receiver<()>>>,
    pub last_insert: Mutex<Option<NewEntry>>,
    pub last_patch: Mutex<Option<EntryPatch>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// The next `list_entries` call reads its data immediately but does not
    /// return until the sender fires.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.held_list.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(op) {
            return Err(Error::Remote {
                status: 503,
                message: format!("{op} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for ScriptedService {
    async fn list_entries(&self, order: EntryOrder) -> Result<Vec<CatalogEntry>> {
        self.record(LIST_ENTRIES)?;
        let result = self.inner.list_entries(order).await;
        let held = self.held_list.lock().unwrap().take();
        if let Some(rx) = held {
            let _ = rx.await;
        }
        result
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.record(LIST_CATEGORIES)?;
        self.inner.list_categories().await
    }

    async fn insert_entry(&self, entry: &NewEntry) -> Result<CatalogEntry> {
        self.record(INSERT)?;
        *self.last_insert.lock().unwrap() = Some(entry.clone());
        self.inner.insert_entry(entry).await
    }

    async fn update_entry(&self, id: &str, patch: &EntryPatch) -> Result<CatalogEntry> {
        self.record(UPDATE)?;
        *self.last_patch.lock().unwrap() = Some(patch.clone());
        self.inner.update_entry(id, patch).await
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        self.record(DELETE)?;
        self.inner.delete_entry(id).await
    }

    async fn upload_asset(
        &self,
        bucket: &str,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String> {
        self.record(UPLOAD)?;
        self.inner
            .upload_asset(bucket, name, bytes, content_type)
            .await
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        self.inner.current_session().await
    }

    async fn sign_in(&self, provider: &str, redirect_to: &str) -> Result<String> {
        self.inner.sign_in(provider, redirect_to).await
    }

    async fn complete_sign_in(&self, callback: &str) -> Result<Session> {
        self.inner.complete_sign_in(callback).await
    }

    async fn sign_out(&self) -> Result<()> {
        self.inner.sign_out().await
    }

    fn subscribe_sessions(&self) -> watch::Receiver<Option<Session>> {
        self.inner.subscribe_sessions()
    }
}
