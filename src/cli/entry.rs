use super::Context;
use super::commands::EntryArgs;
use super::pickers::{category_or_prompt, confirm_action, difficulty_or_prompt, text_or_prompt};
use crate::catalog::CatalogStore;
use crate::editor::{EntryEditor, ImageAttachment, SubmitOutcome};
use crate::session::SessionContext;

/// Copies every provided flag into the editor, attaching files as it goes.
async fn apply_fields(editor: &mut EntryEditor, fields: EntryArgs) -> anyhow::Result<()> {
    let draft = editor.draft_mut();
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(brief) = fields.brief {
        draft.brief_description = brief;
    }
    if let Some(description) = fields.description {
        draft.full_description = description;
    }
    if let Some(category) = fields.category {
        draft.category = category;
    }
    if let Some(difficulty) = fields.difficulty {
        draft.difficulty = difficulty;
    }
    if let Some(use_case) = fields.use_case {
        draft.use_case = use_case;
    }
    if let Some(tags) = fields.tags {
        draft.tags = tags;
    }
    if let Some(tools) = fields.tools {
        draft.tools_used = tools;
    }

    if let Some(path) = fields.image {
        let image = ImageAttachment::from_path(&path).await?;
        editor.attach_image(image);
    }
    if let Some(path) = fields.workflow {
        let text = tokio::fs::read_to_string(&path).await?;
        editor
            .attach_workflow_json(&text)
            .map_err(|e| anyhow::anyhow!("Invalid JSON file: {e}"))?;
        println!("JSON loaded successfully");
    }
    Ok(())
}

async fn save(
    store: &CatalogStore,
    editor: &mut EntryEditor,
    session: &SessionContext,
) -> anyhow::Result<()> {
    editor.validate()?;
    let outcome = store
        .save(editor, session)
        .await
        .map_err(|e| anyhow::anyhow!("Error saving workflow: {e}"))?;

    println!();
    match outcome {
        SubmitOutcome::Created(entry) => {
            println!("Workflow created successfully ({})", entry.id);
        }
        SubmitOutcome::Updated(entry) => {
            println!("Workflow updated successfully ({})", entry.id);
        }
    }
    println!();
    Ok(())
}

pub async fn run_entry_add(
    ctx: &Context,
    fields: EntryArgs,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let session = ctx.require_admin().await?;
    let store = ctx.store();
    store.refresh_categories().await;

    let categories: Vec<String> = store.categories().iter().map(|c| c.name.clone()).collect();
    let fields = EntryArgs {
        title: text_or_prompt(fields.title, "Title:", non_interactive)?,
        brief: text_or_prompt(fields.brief, "Brief description:", non_interactive)?,
        description: text_or_prompt(fields.description, "Full description:", non_interactive)?,
        category: category_or_prompt(fields.category, categories, non_interactive)?,
        difficulty: difficulty_or_prompt(fields.difficulty, non_interactive)?,
        use_case: text_or_prompt(fields.use_case, "Use case (optional):", non_interactive)?,
        tags: text_or_prompt(fields.tags, "Tags (comma-separated):", non_interactive)?,
        tools: text_or_prompt(fields.tools, "Tools used (comma-separated):", non_interactive)?,
        image: match fields.image {
            Some(path) => Some(path),
            None => text_or_prompt(None, "Cover image path:", non_interactive)?.map(Into::into),
        },
        workflow: match fields.workflow {
            Some(path) => Some(path),
            None => text_or_prompt(None, "Workflow JSON path (optional):", non_interactive)?
                .map(Into::into),
        },
    };

    let mut editor = EntryEditor::create();
    apply_fields(&mut editor, fields).await?;
    save(&store, &mut editor, &session).await
}

pub async fn run_entry_edit(ctx: &Context, id: &str, fields: EntryArgs) -> anyhow::Result<()> {
    let session = ctx.require_admin().await?;
    let store = ctx.store();
    store.refresh_entries().await?;

    let entry = store
        .find(id)
        .ok_or_else(|| anyhow::anyhow!("Workflow not found: {}", id))?;

    let mut editor = EntryEditor::edit(&entry);
    apply_fields(&mut editor, fields).await?;
    save(&store, &mut editor, &session).await
}

pub async fn run_entry_delete(
    ctx: &Context,
    id: &str,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let session = ctx.require_admin().await?;
    let store = ctx.store();
    if let Err(e) = store.refresh_entries().await {
        eprintln!("Failed to load workflows: {e}");
    }

    let label = store
        .find(id)
        .map_or_else(|| id.to_string(), |e| e.title);
    let confirmed = confirm_action(
        &format!("Are you sure you want to delete '{label}'?"),
        yes,
        non_interactive,
    )?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    store
        .delete_entry(id, &session)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete workflow: {e}"))?;

    println!();
    println!("Workflow deleted");
    println!();
    Ok(())
}
