//! Editing a single catalog entry.
//!
//! An [`EntryEditor`] starts either empty (create) or from an existing entry
//! (edit), accumulates a flat [`EntryDraft`] plus optional attachments, and
//! turns them into an insert or update. Every local check runs before the
//! first network call. A failed submission leaves the editor open with the
//! draft untouched.

mod attachment;
mod draft;
mod validation;

pub use attachment::{ImageAttachment, ImageKind, MAX_IMAGE_BYTES, parse_workflow_document};
pub use draft::{EntryDraft, join_list, split_list};
pub use validation::{
    MAX_BRIEF_DESCRIPTION_LEN, validate_brief_description, validate_category, validate_draft,
    validate_full_description, validate_title,
};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::remote::CatalogService;
use crate::session::SessionContext;
use crate::types::{CatalogEntry, Difficulty, EntryFields, EntryPatch, NewEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(CatalogEntry),
    Updated(CatalogEntry),
}

impl SubmitOutcome {
    #[must_use]
    pub fn entry(&self) -> &CatalogEntry {
        match self {
            Self::Created(entry) | Self::Updated(entry) => entry,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryEditor {
    mode: EditorMode,
    draft: EntryDraft,
    image: Option<ImageAttachment>,
    open: bool,
}

impl EntryEditor {
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            draft: EntryDraft::default(),
            image: None,
            open: true,
        }
    }

    #[must_use]
    pub fn edit(entry: &CatalogEntry) -> Self {
        Self {
            mode: EditorMode::Edit {
                id: entry.id.clone(),
            },
            draft: EntryDraft::from(entry),
            image: None,
            open: true,
        }
    }

    #[must_use]
    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    #[must_use]
    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EntryDraft {
        &mut self.draft
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Replaces any previously attached image. Size and type were checked on construction.
    pub fn attach_image(&mut self, image: ImageAttachment) {
        self.image = Some(image);
    }

    /// Parses and attaches a workflow definition. On a parse error the
    /// previously attached document is kept.
    pub fn attach_workflow_json(&mut self, text: &str) -> Result<()> {
        let document = parse_workflow_document(text)?;
        self.draft.workflow_json = Some(document);
        Ok(())
    }

    fn has_image(&self) -> bool {
        self.image.is_some()
            || self
                .draft
                .image_url
                .as_deref()
                .is_some_and(|u| !u.trim().is_empty())
    }

    /// Runs every local check, returning the parsed difficulty.
    pub fn validate(&self) -> Result<Difficulty> {
        let difficulty = validate_draft(&self.draft)?;
        if !self.has_image() {
            return Err(Error::validation("Please upload an image"));
        }
        Ok(difficulty)
    }

    pub async fn submit(
        &mut self,
        service: &dyn CatalogService,
        bucket: &str,
        session: &SessionContext,
    ) -> Result<SubmitOutcome> {
        self.submit_at(service, bucket, session, Utc::now()).await
    }

    /// Submits using `now` for the upload name and modification timestamp.
    pub async fn submit_at(
        &mut self,
        service: &dyn CatalogService,
        bucket: &str,
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        let difficulty = self.validate()?;
        let author_id = session.require_identity()?.id.clone();

        let image_url = match &self.image {
            Some(image) => {
                let name = image.upload_name(now);
                service
                    .upload_asset(bucket, &name, image.bytes().clone(), image.kind().mime_type())
                    .await
                    .inspect_err(|e| tracing::error!(name = %name, "image upload failed: {e}"))?
            }
            None => self.draft.image_url.clone().unwrap_or_default(),
        };

        let fields = self.fields(difficulty, image_url);
        let outcome = match &self.mode {
            EditorMode::Edit { id } => {
                let patch = EntryPatch {
                    fields,
                    updated_at: now,
                };
                let entry = service
                    .update_entry(id, &patch)
                    .await
                    .inspect_err(|e| tracing::error!(id = %id, "failed to update workflow: {e}"))?;
                SubmitOutcome::Updated(entry)
            }
            EditorMode::Create => {
                let new = NewEntry { fields, author_id };
                let entry = service
                    .insert_entry(&new)
                    .await
                    .inspect_err(|e| tracing::error!("failed to create workflow: {e}"))?;
                SubmitOutcome::Created(entry)
            }
        };

        tracing::info!(id = %outcome.entry().id, "workflow saved");
        self.open = false;
        Ok(outcome)
    }

    fn fields(&self, difficulty: Difficulty, image_url: String) -> EntryFields {
        let draft = &self.draft;
        let use_case = draft.use_case.trim();
        EntryFields {
            title: draft.title.clone(),
            brief_description: draft.brief_description.clone(),
            full_description: draft.full_description.clone(),
            category: draft.category.clone(),
            difficulty,
            use_case: (!use_case.is_empty()).then(|| use_case.to_string()),
            tags: split_list(&draft.tags),
            tools_used: split_list(&draft.tools_used),
            image_url,
            workflow_json: draft.workflow_json.clone(),
        }
    }
}
