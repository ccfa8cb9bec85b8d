//! Error types for the documents REST client.

use docsync_core::StoreError;
use thiserror::Error;

/// Errors that can occur when talking to a documents server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Requested item does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Authentication failed (missing or rejected credentials)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// IO error while preparing a request
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) => StoreError::Other(e.to_string()),
            ClientError::ServerError { status, message } => StoreError::Status { status, message },
            ClientError::NotFound { entity, id } => StoreError::not_found(entity, id),
            ClientError::AuthFailed(msg) => StoreError::AuthFailed(msg),
            ClientError::InvalidUrl(msg) => StoreError::InvalidUrl(msg),
            ClientError::ParseError(msg) => StoreError::Parse(msg),
            ClientError::ServerUnreachable(msg) => StoreError::Unreachable(msg),
            ClientError::Io(e) => StoreError::Io(e),
        }
    }
}
