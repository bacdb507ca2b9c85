use std::fmt;

use inquire::{Select, Text};

use crate::types::{CatalogEntry, Difficulty};

/// A catalog entry rendered as a card in list output.
pub struct EntryCard<'a> {
    pub entry: &'a CatalogEntry,
}

impl fmt::Display for EntryCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.entry;
        writeln!(
            f,
            "[{}] {}  ({}, {})",
            e.difficulty,
            e.title,
            e.category,
            e.date_added.format("%Y-%m-%d")
        )?;
        writeln!(f, "    {}", e.brief_description)?;

        let shown: Vec<String> = e.tags.iter().take(2).map(|t| format!("#{t}")).collect();
        let mut tags = shown.join(" ");
        if e.tags.len() > 2 {
            tags.push_str(&format!(" +{}", e.tags.len() - 2));
        }
        write!(f, "    {tags:<40} id: {}", e.id)
    }
}

/// Confirm a destructive action, honoring `--yes` and `--non-interactive`.
pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required for destructive operations in non-interactive mode");
    } else {
        Ok(inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?)
    }
}

/// Use the flag value if given, otherwise prompt (unless non-interactive).
pub fn text_or_prompt(
    value: Option<String>,
    label: &str,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if value.is_some() || non_interactive {
        return Ok(value);
    }
    let input = Text::new(label).prompt()?;
    Ok((!input.trim().is_empty()).then_some(input))
}

pub fn category_or_prompt(
    value: Option<String>,
    categories: Vec<String>,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if value.is_some() || non_interactive {
        return Ok(value);
    }
    if categories.is_empty() {
        return text_or_prompt(None, "Category:", false);
    }
    let selected = Select::new("Category:", categories)
        .with_help_message("Type to filter, Enter to select")
        .prompt()?;
    Ok(Some(selected))
}

pub fn difficulty_or_prompt(
    value: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if value.is_some() || non_interactive {
        return Ok(value);
    }
    let selected = Select::new("Difficulty:", Difficulty::ALL.to_vec()).prompt()?;
    Ok(Some(selected.to_string()))
}
