/// CLI error types
use docsync_client::ClientError;
use docsync_engine::SyncError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("server {0} is not configured")]
    UnknownServer(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
