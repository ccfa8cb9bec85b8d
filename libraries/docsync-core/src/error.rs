/// Errors reported by a remote document store
use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for remote document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Item addressed by id does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Credentials rejected or missing
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Server cannot be reached at all
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// Server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Server URL is malformed
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else the transport reports
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Create a not-found error for the given entity kind
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Errors that make every further call pointless for this invocation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthFailed(_) | Self::Unreachable(_) | Self::InvalidUrl(_)
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
