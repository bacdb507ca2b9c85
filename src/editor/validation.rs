use crate::error::{Error, Result};
use crate::types::Difficulty;

use super::draft::EntryDraft;

pub const MAX_BRIEF_DESCRIPTION_LEN: usize = 150;

fn require(value: &str, field: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> std::result::Result<(), String> {
    require(title, "Title")
}

/// Length is counted in characters, not bytes.
pub fn validate_brief_description(brief: &str) -> std::result::Result<(), String> {
    require(brief, "Brief description")?;
    if brief.chars().count() > MAX_BRIEF_DESCRIPTION_LEN {
        return Err(format!(
            "Brief description cannot exceed {MAX_BRIEF_DESCRIPTION_LEN} characters"
        ));
    }
    Ok(())
}

pub fn validate_full_description(full: &str) -> std::result::Result<(), String> {
    require(full, "Full description")
}

pub fn validate_category(category: &str) -> std::result::Result<(), String> {
    require(category, "Category")
}

/// Checks every text field and returns the parsed difficulty.
pub fn validate_draft(draft: &EntryDraft) -> Result<Difficulty> {
    validate_title(&draft.title)
        .and_then(|()| validate_brief_description(&draft.brief_description))
        .and_then(|()| validate_full_description(&draft.full_description))
        .and_then(|()| validate_category(&draft.category))
        .and_then(|()| draft.difficulty.parse::<Difficulty>())
        .map_err(Error::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> EntryDraft {
        EntryDraft {
            title: "Lead Sync".into(),
            brief_description: "Sync leads".into(),
            full_description: "Sync leads from forms into the CRM".into(),
            category: "Sales".into(),
            ..EntryDraft::default()
        }
    }

    #[test]
    fn test_brief_description_boundary() {
        assert!(validate_brief_description(&"a".repeat(150)).is_ok());
        assert!(validate_brief_description(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_brief_description_counts_characters() {
        assert!(validate_brief_description(&"é".repeat(150)).is_ok());
    }

    #[test]
    fn test_required_fields() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_full_description("").is_err());
        assert!(validate_category("").is_err());
        assert!(validate_title("ok").is_ok());
    }

    #[test]
    fn test_validate_draft() {
        assert_eq!(validate_draft(&valid_draft()).unwrap(), Difficulty::Beginner);

        let mut draft = valid_draft();
        draft.difficulty = "Expert".into();
        assert!(matches!(validate_draft(&draft), Err(Error::Validation(_))));

        let mut draft = valid_draft();
        draft.category.clear();
        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.to_string(), "Category is required");
    }
}
