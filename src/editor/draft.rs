use crate::types::{CatalogEntry, Difficulty};

/// Flat, editable form of a catalog entry.
///
/// List fields are held as a single comma-separated string, the way a user
/// types them.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub title: String,
    pub brief_description: String,
    pub full_description: String,
    pub category: String,
    pub difficulty: String,
    pub use_case: String,
    pub tags: String,
    pub tools_used: String,
    /// Previously stored image, kept when editing without a new upload.
    pub image_url: Option<String>,
    pub workflow_json: Option<serde_json::Value>,
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            brief_description: String::new(),
            full_description: String::new(),
            category: String::new(),
            difficulty: Difficulty::default().to_string(),
            use_case: String::new(),
            tags: String::new(),
            tools_used: String::new(),
            image_url: None,
            workflow_json: None,
        }
    }
}

impl From<&CatalogEntry> for EntryDraft {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            title: entry.title.clone(),
            brief_description: entry.brief_description.clone(),
            full_description: entry.full_description.clone(),
            category: entry.category.clone(),
            difficulty: entry.difficulty.to_string(),
            use_case: entry.use_case.clone().unwrap_or_default(),
            tags: join_list(&entry.tags),
            tools_used: join_list(&entry.tools_used),
            image_url: entry.image_url.clone().filter(|u| !u.is_empty()),
            workflow_json: entry.workflow_json.clone(),
        }
    }
}

/// Joins list items with `", "`.
#[must_use]
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Splits on commas, trims each item and drops empty ones. Order is preserved.
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        let tags = vec!["api".to_string(), "automation".to_string()];
        let flat = join_list(&tags);
        assert_eq!(flat, "api, automation");
        assert_eq!(split_list(&flat), tags);
    }

    #[test]
    fn test_split_drops_empty_items() {
        assert_eq!(split_list(" a ,, b,  ,c , "), ["a", "b", "c"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn test_default_draft() {
        let draft = EntryDraft::default();
        assert_eq!(draft.difficulty, "Beginner");
        assert!(draft.title.is_empty());
        assert!(draft.image_url.is_none());
    }
}
