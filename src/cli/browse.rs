use std::path::PathBuf;

use super::Context;
use super::pickers::EntryCard;
use crate::catalog::{ALL_CATEGORIES, CatalogQuery, CatalogStore, CategoryFilter, QueryEngine};
use crate::export::export_workflow;
use crate::types::CatalogEntry;

/// Fetches entries and categories together. A failed entry load is reported, not fatal.
async fn load(store: &CatalogStore) {
    let (entries, _) = tokio::join!(store.refresh_entries(), store.refresh_categories());
    if let Err(e) = entries {
        eprintln!("Failed to load workflows: {e}");
    }
}

async fn load_entry(ctx: &Context, id: &str) -> anyhow::Result<CatalogEntry> {
    let store = ctx.store();
    store.refresh_entries().await?;
    store
        .find(id)
        .ok_or_else(|| anyhow::anyhow!("Workflow not found: {}", id))
}

pub async fn run_list(
    ctx: &Context,
    search: Option<String>,
    category: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let store = ctx.store();
    load(&store).await;

    let query = CatalogQuery::new(
        search.unwrap_or_default(),
        category.as_deref().unwrap_or(ALL_CATEGORIES),
    );
    if let CategoryFilter::Named(name) = &query.category {
        if !store.category_options().contains(name) {
            eprintln!("Note: '{name}' is not a known category.");
        }
    }

    let snapshot = store.snapshot();
    let mut engine = QueryEngine::new();
    let visible = engine.visible(&snapshot, &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!();
        println!("No workflows found.");
        println!("Try adjusting your search or categories.");
        println!();
        return Ok(());
    }

    println!();
    for entry in visible {
        println!("{}", EntryCard { entry });
        println!();
    }
    Ok(())
}

pub async fn run_categories(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let store = ctx.store();
    if !store.refresh_categories().await {
        eprintln!("Failed to load categories");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(store.categories().as_ref())?);
        return Ok(());
    }

    for option in store.category_options() {
        println!("{option}");
    }
    Ok(())
}

pub async fn run_show(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let entry = load_entry(ctx, id).await?;

    println!();
    println!("{}", entry.title);
    println!(
        "{} | {} | added {}",
        entry.category,
        entry.difficulty,
        entry.date_added.format("%Y-%m-%d")
    );
    if let Some(url) = &entry.image_url {
        println!("Image: {url}");
    }
    println!();
    println!("Description");
    println!("  {}", entry.full_description);

    if let Some(use_case) = entry.use_case.as_deref().filter(|u| !u.is_empty()) {
        println!();
        println!("Use Case");
        println!("  {use_case}");
    }
    if !entry.tools_used.is_empty() {
        println!();
        println!("Tools: {}", entry.tools_used.join(", "));
    }
    if !entry.tags.is_empty() {
        println!("Tags:  {}", entry.tags.join(", "));
    }
    if entry.workflow_json.is_some() {
        println!();
        println!("Workflow JSON available: flowshelf export {}", entry.id);
    }
    println!();
    Ok(())
}

pub async fn run_export(ctx: &Context, id: &str, out: Option<PathBuf>) -> anyhow::Result<()> {
    let entry = load_entry(ctx, id).await?;
    let export = export_workflow(&entry)?
        .ok_or_else(|| anyhow::anyhow!("Workflow '{}' has no JSON attached", entry.title))?;

    let dir = out.unwrap_or_else(|| PathBuf::from("."));
    let path = export.write_to(&dir).await?;
    println!("Saved {}", path.display());
    Ok(())
}
