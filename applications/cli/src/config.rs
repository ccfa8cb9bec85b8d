/// CLI configuration
use crate::error::{CliError, Result};
use docsync_client::ServerConfig;
use docsync_engine::{SyncOptions, DEFAULT_BATCH_SIZE, DEFAULT_DOCUMENTS_DIR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file looked up in the project directory
pub const CONFIG_FILE: &str = "docsync.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    /// Named servers, `[servers.<name>]`
    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,

    #[serde(default)]
    pub transfer: TransferSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerEntry {
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferSettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Relative paths are taken from the project directory
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            documents_dir: default_documents_dir(),
        }
    }
}

/// Credentials given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `file` must exist when given; otherwise `docsync.toml` in the project
    /// directory is used if present. `DOCSYNC__`-prefixed variables override
    /// both (`DOCSYNC__TRANSFER__BATCH_SIZE=4`).
    pub fn load(project: &Path, file: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match file {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let config_path = project.join(CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("DOCSYNC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.transfer.batch_size == 0 {
            return Err(CliError::Config(
                "transfer.batch_size must be at least 1".to_string(),
            ));
        }

        for (name, server) in &self.servers {
            if server.url.trim().is_empty() {
                return Err(CliError::Config(format!("server {} has no url", name)));
            }
            if server.password.is_some() && server.username.is_none() {
                return Err(CliError::Config(format!(
                    "server {} has a password but no username",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Sync settings for one invocation
    pub fn sync_options(&self, project: &Path) -> SyncOptions {
        SyncOptions {
            batch_size: self.transfer.batch_size,
            documents_dir: project.join(&self.transfer.documents_dir),
        }
    }

    /// Connection settings for `--server`, a configured name or a literal URL.
    ///
    /// A token or username given as an override replaces the entry's
    /// credentials. A password given alone pairs with the entry's username.
    pub fn server(&self, name: &str, overrides: &CredentialOverrides) -> Result<ServerConfig> {
        let entry = if is_url(name) {
            ServerEntry {
                url: name.to_string(),
                ..ServerEntry::default()
            }
        } else {
            self.servers
                .get(name)
                .cloned()
                .ok_or_else(|| CliError::UnknownServer(name.to_string()))?
        };

        let (token, username, password) =
            if overrides.token.is_some() || overrides.username.is_some() {
                (
                    overrides.token.clone(),
                    overrides.username.clone(),
                    overrides.password.clone(),
                )
            } else {
                (
                    entry.token,
                    entry.username,
                    overrides.password.clone().or(entry.password),
                )
            };

        match (token, username, password) {
            (Some(token), _, _) => Ok(ServerConfig::with_token(entry.url, token)),
            (None, Some(username), Some(password)) => {
                Ok(ServerConfig::with_basic_auth(entry.url, username, password))
            }
            (None, Some(username), None) => Err(CliError::Config(format!(
                "no password for user {} on server {}",
                username, name
            ))),
            (None, None, _) => Ok(ServerConfig::new(entry.url)),
        }
    }
}

fn is_url(server: &str) -> bool {
    server.starts_with("http://") || server.starts_with("https://")
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENTS_DIR)
}
