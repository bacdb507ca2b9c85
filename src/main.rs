use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flowshelf::cli::{
    AuthCommands, Context, EntryCommands, run_auth_login, run_auth_logout,
    run_auth_status, run_categories, run_entry_add, run_entry_delete, run_entry_edit, run_export,
    run_list, run_show,
};

#[derive(Parser)]
#[command(name = "flowshelf")]
#[command(about = "Browse and curate a catalog of automation workflows", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to $FLOWSHELF_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List workflows, newest first
    List {
        /// Match against title, brief description, and tags (case-insensitive)
        #[arg(long, short)]
        search: Option<String>,

        /// Only show this category ("All" for every category)
        #[arg(long, short)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one workflow in detail
    Show {
        /// Workflow ID
        id: String,
    },

    /// Download a workflow's JSON definition
    Export {
        /// Workflow ID
        id: String,

        /// Directory to write into
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Sign in and out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Create, edit, and delete workflows
    Entry {
        #[command(subcommand)]
        command: EntryCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("flowshelf=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::connect(cli.config.as_deref())?;

    match cli.command {
        Commands::List {
            search,
            category,
            json,
        } => run_list(&ctx, search, category, json).await?,
        Commands::Categories { json } => run_categories(&ctx, json).await?,
        Commands::Show { id } => run_show(&ctx, &id).await?,
        Commands::Export { id, out } => run_export(&ctx, &id, out).await?,
        Commands::Auth { command } => match command {
            AuthCommands::Login {
                callback,
                non_interactive,
            } => run_auth_login(&ctx, callback, non_interactive).await?,
            AuthCommands::Logout => run_auth_logout(&ctx).await?,
            AuthCommands::Status => run_auth_status(&ctx).await?,
        },
        Commands::Entry { command } => match command {
            EntryCommands::Add {
                fields,
                non_interactive,
            } => run_entry_add(&ctx, fields, non_interactive).await?,
            EntryCommands::Edit { id, fields } => run_entry_edit(&ctx, &id, fields).await?,
            EntryCommands::Delete {
                id,
                non_interactive,
                yes,
            } => run_entry_delete(&ctx, &id, non_interactive, yes).await?,
        },
    }

    Ok(())
}
