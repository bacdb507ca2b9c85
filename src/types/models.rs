use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Difficulty;

/// Treats an explicit `null` list the same as a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single automation recipe in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub brief_description: String,
    pub full_description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Opaque automation definition. Stored and returned verbatim.
    #[serde(default)]
    pub workflow_json: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tools_used: Vec<String>,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub use_case: Option<String>,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub views: i64,
    pub author_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Fields shared by inserts and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFields {
    pub title: String,
    pub brief_description: String,
    pub full_description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub use_case: Option<String>,
    pub tags: Vec<String>,
    pub tools_used: Vec<String>,
    pub image_url: String,
    pub workflow_json: Option<serde_json::Value>,
}

/// Insert payload. Identity, `date_added` and `views` are assigned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(flatten)]
    pub fields: EntryFields,
    pub author_id: String,
}

/// Update payload for every mutable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(flatten)]
    pub fields: EntryFields,
    pub updated_at: DateTime<Utc>,
}
