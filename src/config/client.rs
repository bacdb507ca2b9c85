use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

pub const ENV_CONFIG_PATH: &str = "FLOWSHELF_CONFIG";
pub const ENV_SERVICE_URL: &str = "FLOWSHELF_URL";
pub const ENV_API_KEY: &str = "FLOWSHELF_API_KEY";
pub const ENV_ADMIN_EMAIL: &str = "ADMIN_EMAIL";
pub const ENV_REDIRECT_TO: &str = "FLOWSHELF_REDIRECT_TO";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the hosted catalog service (e.g., "https://abc.example.co").
    pub service_url: Option<String>,
    /// Public API key sent with every request.
    pub api_key: Option<String>,
    /// The single address granted create/edit/delete rights.
    pub admin_email: String,
    pub entries_table: String,
    pub categories_table: String,
    pub image_bucket: String,
    pub auth_provider: String,
    /// Where the identity provider sends the browser after sign-in.
    pub redirect_to: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            api_key: None,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            entries_table: "workflows".to_string(),
            categories_table: "categories".to_string(),
            image_bucket: "workflow-images".to_string(),
            auth_provider: "google".to_string(),
            redirect_to: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, then the TOML file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok();
        let path = path.or(env_path.as_deref().map(Path::new));

        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.warn_if_default_admin();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_SERVICE_URL) {
            self.service_url = Some(url);
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(email) = non_empty(ENV_ADMIN_EMAIL) {
            self.admin_email = email;
        }
        if let Some(redirect) = non_empty(ENV_REDIRECT_TO) {
            self.redirect_to = Some(redirect);
        }
    }

    #[must_use]
    pub fn uses_default_admin(&self) -> bool {
        self.admin_email == DEFAULT_ADMIN_EMAIL
    }

    fn warn_if_default_admin(&self) {
        if self.uses_default_admin() {
            tracing::warn!(
                "ADMIN_EMAIL is not configured; falling back to the default administrator \
                 address {DEFAULT_ADMIN_EMAIL}. Set ADMIN_EMAIL before deploying."
            );
        }
    }

    /// The service URL without a trailing slash.
    pub fn service_url(&self) -> Result<&str> {
        self.service_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "service_url is not set (use a config file or {ENV_SERVICE_URL})"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.entries_table, "workflows");
        assert_eq!(config.image_bucket, "workflow-images");
        assert!(config.uses_default_admin());
        assert!(config.service_url().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ClientConfig::from_toml(
            r#"
            service_url = "https://catalog.example.co/"
            admin_email = "owner@example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.service_url().unwrap(), "https://catalog.example.co");
        assert_eq!(config.admin_email, "owner@example.com");
        assert_eq!(config.categories_table, "categories");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = ClientConfig::from_toml(r#"admin_email = "file@example.com""#).unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_ADMIN_EMAIL, "env@example.com"),
            (ENV_SERVICE_URL, "http://localhost:54321"),
            (ENV_API_KEY, ""),
        ]
        .into_iter()
        .collect();

        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.admin_email, "env@example.com");
        assert_eq!(config.service_url().unwrap(), "http://localhost:54321");
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            ClientConfig::from_toml("admin_email = ["),
            Err(Error::Config(_))
        ));
    }
}
