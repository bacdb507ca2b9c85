use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const ENV_HOME: &str = "FLOWSHELF_HOME";

const FILE_NAME: &str = "session.toml";

/// A saved sign-in, scoped to the service it was issued by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCredentials {
    pub service_url: String,
    pub access_token: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CredentialsFile {
    pub default: Option<SessionCredentials>,
}

/// `$FLOWSHELF_HOME/session.toml` when set, otherwise the platform config directory.
pub fn credentials_path() -> anyhow::Result<PathBuf> {
    resolve_credentials_path(std::env::var(ENV_HOME).ok().as_deref())
}

fn resolve_credentials_path(home_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(home) = home_override.filter(|h| !h.trim().is_empty()) {
        return Ok(PathBuf::from(home).join(FILE_NAME));
    }
    let dirs = ProjectDirs::from("", "", "flowshelf").ok_or_else(|| {
        anyhow::anyhow!("Could not determine config directory. Set ${ENV_HOME}.")
    })?;
    Ok(dirs.config_dir().join(FILE_NAME))
}

/// Returns the saved session for `service_url`, if any.
pub fn load_credentials(service_url: &str) -> anyhow::Result<Option<SessionCredentials>> {
    let path = credentials_path()?;
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(None);
    };
    let file: CredentialsFile = toml::from_str(&content).map_err(|_| {
        anyhow::anyhow!("Credentials file is corrupted. Run 'flowshelf auth login' to fix.")
    })?;
    Ok(file.default.filter(|c| c.service_url == service_url))
}

pub fn save_credentials(creds: &SessionCredentials) -> anyhow::Result<()> {
    let path = credentials_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = CredentialsFile {
        default: Some(creds.clone()),
    };
    let content = toml::to_string_pretty(&file)?;
    fs::write(&path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

pub fn delete_credentials() -> anyhow::Result<bool> {
    let path = credentials_path()?;
    if path.exists() {
        fs::remove_file(&path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
