use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with the configured identity provider
    Login {
        /// Redirect URL (or raw access token) returned by the provider
        #[arg(long)]
        callback: Option<String>,

        /// Skip interactive prompts (requires --callback)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the current session
    Status,
}

/// Entry fields accepted by `entry add` and `entry edit`.
#[derive(Args, Default)]
pub struct EntryArgs {
    /// Display title
    #[arg(long)]
    pub title: Option<String>,

    /// Short summary for the card view (max 150 characters)
    #[arg(long)]
    pub brief: Option<String>,

    /// Full description for the detail view
    #[arg(long)]
    pub description: Option<String>,

    /// Category name
    #[arg(long)]
    pub category: Option<String>,

    /// Beginner, Intermediate, or Advanced
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Optional use case
    #[arg(long)]
    pub use_case: Option<String>,

    /// Tags (comma-separated)
    #[arg(long)]
    pub tags: Option<String>,

    /// Tools used (comma-separated)
    #[arg(long)]
    pub tools: Option<String>,

    /// Cover image (PNG, JPEG, or WEBP, under 5MB)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Workflow definition JSON file
    #[arg(long)]
    pub workflow: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add a new workflow (administrator only)
    Add {
        #[command(flatten)]
        fields: EntryArgs,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Edit an existing workflow (administrator only)
    Edit {
        /// Workflow ID
        id: String,

        #[command(flatten)]
        fields: EntryArgs,
    },

    /// Delete a workflow (administrator only)
    Delete {
        /// Workflow ID
        id: String,

        /// Skip interactive prompts (requires --yes)
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
