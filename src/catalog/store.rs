use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::editor::{EntryEditor, SubmitOutcome};
use crate::error::Result;
use crate::remote::{CatalogService, EntryOrder};
use crate::session::SessionContext;
use crate::types::{CatalogEntry, Category};

use super::query::category_options;

pub const DEFAULT_IMAGE_BUCKET: &str = "workflow-images";

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Bumped every time the entry list is replaced.
    pub generation: u64,
    pub entries: Arc<Vec<CatalogEntry>>,
    pub categories: Arc<Vec<Category>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced the in-memory list.
    Applied { count: usize },
    /// A newer refresh was issued while this one was in flight; its response was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct StoreState {
    entries: Arc<Vec<CatalogEntry>>,
    categories: Arc<Vec<Category>>,
    generation: u64,
    in_flight: usize,
}

/// Owns the in-memory copy of the catalog and keeps it in sync with the service.
///
/// Entry refreshes carry a sequence number. A response is applied only if no
/// newer refresh was issued after it, so overlapping refreshes never regress
/// the list to older data.
pub struct CatalogStore {
    service: Arc<dyn CatalogService>,
    image_bucket: String,
    state: Mutex<StoreState>,
    issued: AtomicU64,
}

/// Keeps the loading flag raised while a refresh is in flight, even if the future is dropped.
struct InFlight<'a>(&'a CatalogStore);

impl<'a> InFlight<'a> {
    fn start(store: &'a CatalogStore) -> Self {
        store.lock().in_flight += 1;
        Self(store)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl CatalogStore {
    #[must_use]
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        Self {
            service,
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
            state: Mutex::new(StoreState::default()),
            issued: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_image_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.image_bucket = bucket.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn service(&self) -> &Arc<dyn CatalogService> {
        &self.service
    }

    /// Fetches every entry, newest first, and replaces the in-memory list.
    ///
    /// On failure the previous list is kept and the error is returned for the
    /// caller to report.
    pub async fn refresh_entries(&self) -> Result<RefreshOutcome> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let guard = InFlight::start(self);
        let result = self.service.list_entries(EntryOrder::NewestFirst).await;
        drop(guard);

        let mut state = self.lock();
        if seq < self.issued.load(Ordering::SeqCst) {
            tracing::debug!(seq, "discarding superseded entry refresh");
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(entries) => {
                let count = entries.len();
                state.entries = Arc::new(entries);
                state.generation += 1;
                tracing::debug!(seq, count, "entries refreshed");
                Ok(RefreshOutcome::Applied { count })
            }
            Err(e) => {
                tracing::error!("failed to load workflows: {e}");
                Err(e)
            }
        }
    }

    /// Fetches every category. Failures are tolerated; returns whether the list was replaced.
    pub async fn refresh_categories(&self) -> bool {
        match self.service.list_categories().await {
            Ok(categories) => {
                self.lock().categories = Arc::new(categories);
                true
            }
            Err(e) => {
                tracing::debug!("category refresh failed: {e}");
                false
            }
        }
    }

    /// Deletes an entry and reconciles by refetching.
    ///
    /// Requires an elevated session. Callers must obtain explicit user
    /// confirmation first. On failure nothing changes locally.
    pub async fn delete_entry(&self, id: &str, session: &SessionContext) -> Result<()> {
        session.require_elevated()?;
        self.service
            .delete_entry(id)
            .await
            .inspect_err(|e| tracing::error!(id, "failed to delete workflow: {e}"))?;

        tracing::info!(id, "workflow deleted");
        if let Err(e) = self.refresh_entries().await {
            tracing::warn!("refresh after delete failed: {e}");
        }
        Ok(())
    }

    /// Submits the editor and, on success, refetches the entry list.
    /// Requires an elevated session.
    pub async fn save(
        &self,
        editor: &mut EntryEditor,
        session: &SessionContext,
    ) -> Result<SubmitOutcome> {
        session.require_elevated()?;
        let outcome = editor
            .submit(self.service.as_ref(), &self.image_bucket, session)
            .await?;
        if let Err(e) = self.refresh_entries().await {
            tracing::warn!("refresh after save failed: {e}");
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.lock();
        CatalogSnapshot {
            generation: state.generation,
            entries: Arc::clone(&state.entries),
            categories: Arc::clone(&state.categories),
        }
    }

    #[must_use]
    pub fn entries(&self) -> Arc<Vec<CatalogEntry>> {
        Arc::clone(&self.lock().entries)
    }

    #[must_use]
    pub fn categories(&self) -> Arc<Vec<Category>> {
        Arc::clone(&self.lock().categories)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<CatalogEntry> {
        self.lock().entries.iter().find(|e| e.id == id).cloned()
    }

    /// "All" followed by the known category names.
    #[must_use]
    pub fn category_options(&self) -> Vec<String> {
        category_options(&self.lock().categories)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }
}
