use docsync_core::{ResourceKind, StoreError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("no {0} name after the scope prefix")]
    MissingResourceName(ResourceKind),

    #[error("no folder specified")]
    NoFolderSpecified,

    #[error("no file specified")]
    NoFileSpecified,

    #[error("{path}: {reason}")]
    InvalidLocalPath { path: PathBuf, reason: String },

    #[error("invalid {kind} {name}")]
    ResourceNotFound { kind: ResourceKind, name: String },

    #[error("folder {segment} not found (in {path})")]
    FolderNotFound { segment: String, path: String },

    #[error("file {0} not found")]
    FileNotFound(String),

    #[error("user {0} does not exist")]
    UserNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },
}

impl SyncError {
    pub(crate) fn invalid_local(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidLocalPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The server cannot be used at all; the invocation stops
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_fatal())
    }

    /// Raised from the arguments alone, before any remote call
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingResourceName(_)
                | Self::NoFolderSpecified
                | Self::NoFileSpecified
                | Self::InvalidLocalPath { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
