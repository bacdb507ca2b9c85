use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::CatalogEntry;

const FILE_SUFFIX: &str = "_workflow.json";

/// A downloadable copy of an entry's workflow definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowExport {
    pub file_name: String,
    pub contents: String,
}

impl WorkflowExport {
    /// Writes into `dir`. Path separators in the name are replaced so the file stays in `dir`.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name.replace(['/', '\\'], "_"));
        tokio::fs::write(&path, &self.contents).await?;
        Ok(path)
    }
}

/// Replaces each run of whitespace with a single underscore.
fn collapse_whitespace(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_run = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[must_use]
pub fn export_file_name(title: &str) -> String {
    format!("{}{FILE_SUFFIX}", collapse_whitespace(title))
}

/// Pretty-prints the stored document verbatim. `None` when the entry has none.
pub fn export_workflow(entry: &CatalogEntry) -> Result<Option<WorkflowExport>> {
    let Some(document) = &entry.workflow_json else {
        return Ok(None);
    };
    Ok(Some(WorkflowExport {
        file_name: export_file_name(&entry.title),
        contents: serde_json::to_string_pretty(document)?,
    }))
}
