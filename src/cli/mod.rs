mod auth;
mod browse;
mod commands;
pub mod credentials;
mod entry;
pub mod pickers;

pub use auth::{run_auth_login, run_auth_logout, run_auth_status};
pub use browse::{run_categories, run_export, run_list, run_show};
pub use commands::{AuthCommands, EntryArgs, EntryCommands};
pub use entry::{run_entry_add, run_entry_delete, run_entry_edit};

use std::path::Path;
use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::config::ClientConfig;
use crate::remote::{CatalogService, RestCatalogService};
use crate::session::{AdminPolicy, SessionContext, SessionGate};

use credentials::load_credentials;

/// Connected configuration shared by every command.
pub struct Context {
    pub config: ClientConfig,
    pub service: Arc<dyn CatalogService>,
}

impl Context {
    /// Loads configuration and resumes any saved session for the configured service.
    pub fn connect(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = ClientConfig::load(config_path)?;
        let mut service = RestCatalogService::new(&config)?;

        if let Some(creds) = load_credentials(service.base_url())? {
            service = service.with_access_token(creds.access_token);
        }

        Ok(Self {
            config,
            service: Arc::new(service),
        })
    }

    #[must_use]
    pub fn store(&self) -> CatalogStore {
        CatalogStore::new(Arc::clone(&self.service)).with_image_bucket(&self.config.image_bucket)
    }

    pub async fn session_gate(&self) -> SessionGate {
        let mut gate = SessionGate::new(
            Arc::clone(&self.service),
            AdminPolicy::new(&self.config.admin_email),
        );
        gate.initialize().await;
        gate
    }

    /// Session context for administrator-only commands.
    pub async fn require_admin(&self) -> anyhow::Result<SessionContext> {
        let context = self.session_gate().await.context();
        match context.require_elevated() {
            Ok(_) => Ok(context),
            Err(crate::error::Error::Unauthorized) => {
                anyhow::bail!("Not logged in. Run 'flowshelf auth login' first.")
            }
            Err(_) => anyhow::bail!("Administrator access required."),
        }
    }
}
