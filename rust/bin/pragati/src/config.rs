//! Client configuration.
//!
//! Reads/writes `~/.pragati/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pragati_client::{AuthScheme, DEFAULT_IP_LOOKUP_URL};

/// How the stored token goes into `Authorization`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeSetting {
    #[default]
    Raw,
    Bearer,
}

impl From<SchemeSetting> for AuthScheme {
    fn from(s: SchemeSetting) -> Self {
        match s {
            SchemeSetting::Raw => AuthScheme::Raw,
            SchemeSetting::Bearer => AuthScheme::Bearer,
        }
    }
}

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL (e.g. "https://erp.example.com/api").
    #[serde(default)]
    pub server: String,

    /// Public IP lookup service answering `{"ip": "..."}`.
    #[serde(default = "default_ip_lookup")]
    pub ip_lookup: String,

    /// Session database file. Empty means `~/.pragati/session.redb`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_db: String,

    #[serde(default)]
    pub auth_scheme: SchemeSetting,
}

fn default_ip_lookup() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            ip_lookup: default_ip_lookup(),
            session_db: String::new(),
            auth_scheme: SchemeSetting::default(),
        }
    }
}

impl ClientConfig {
    /// Default config file path: ~/.pragati/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn session_path(&self) -> PathBuf {
        if self.session_db.is_empty() {
            dirs_path().join("session.redb")
        } else {
            PathBuf::from(&self.session_db)
        }
    }

    /// Set one field by its file key.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "server" => self.server = value.trim_end_matches('/').to_string(),
            "ip_lookup" => self.ip_lookup = value.to_string(),
            "session_db" => self.session_db = value.to_string(),
            "auth_scheme" => {
                self.auth_scheme = match value.to_ascii_lowercase().as_str() {
                    "raw" => SchemeSetting::Raw,
                    "bearer" => SchemeSetting::Bearer,
                    other => anyhow::bail!("auth_scheme must be raw or bearer, got {:?}", other),
                }
            }
            other => anyhow::bail!(
                "Unknown config key {:?} (server, ip_lookup, session_db, auth_scheme)",
                other
            ),
        }
        Ok(())
    }
}

/// Return the Pragati config directory (~/.pragati).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".pragati")
}
