use docsync_core::{CreatedFile, FolderRef, Role, User};
use serde::Serialize;
use std::path::PathBuf;

/// Default number of transfers in flight at once
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Default directory (under the project) that downloads land in
pub const DEFAULT_DOCUMENTS_DIR: &str = "documents";

/// Settings fixed for the duration of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub batch_size: usize,
    /// Default download root when no explicit target is given
    pub documents_dir: PathBuf,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            documents_dir: PathBuf::from(DEFAULT_DOCUMENTS_DIR),
        }
    }
}

/// Local files uploaded into the same remote folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferGroup {
    /// Folder segments relative to the upload source root
    pub relative_folder_segments: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// Progress tick emitted after each batch group settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// 1-based index of the group that just settled
    pub group: usize,
    pub groups: usize,
    /// Items settled so far, failed ones included
    pub completed: usize,
    pub total: usize,
}

/// A single item that could not be transferred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferFailure {
    /// Relative path of the item
    pub item: String,
    pub reason: String,
}

/// Per-item outcome of a batch transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<TransferFailure>,
}

impl<T> Default for TransferReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> TransferReport<T> {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// At least one item succeeded, or there was nothing to transfer
    pub fn is_success(&self) -> bool {
        !self.succeeded.is_empty() || self.failed.is_empty()
    }

    pub(crate) fn merge(&mut self, other: TransferReport<T>) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
    }
}

/// A remote file written to the local filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Path relative to the enumerated remote root
    pub remote_path: String,
    pub local_path: PathBuf,
    pub bytes: usize,
}

/// A local file created in the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub local_path: PathBuf,
    /// Remote folder segments relative to the upload root
    pub remote_folder: Vec<String>,
    pub created: CreatedFile,
}

/// Outcome of a folder upload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadReport {
    /// Remote folders this upload created, in creation order
    pub created_folders: Vec<FolderRef>,
    pub files: TransferReport<UploadedFile>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.files.is_success()
    }
}

/// Outcome of a single download-file call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub file: DownloadedFile,
    /// Breadcrumb of the remote folder the file was read from
    pub source: String,
}

/// Outcome of a single upload-file call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub created: CreatedFile,
    /// Breadcrumb of the remote folder the file was created in
    pub target: String,
}

/// Outcome of a download-folder call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDownload {
    pub source: String,
    pub target: PathBuf,
    pub report: TransferReport<DownloadedFile>,
}

/// Outcome of an upload-folder call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderUpload {
    pub target: String,
    pub report: UploadReport,
}

/// What happened to one user in a share or unshare call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Access granted to a user that was not a member
    Granted(Role),
    /// Existing member's role changed
    RoleUpdated { from: Option<Role>, to: Role },
    Revoked,
    /// Unshare target had no access in the first place
    NoAccess,
    Failed(String),
}

impl ShareOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ShareOutcome::Failed(_))
    }
}

/// Per-user outcome of a share or unshare call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareReport {
    pub folder: String,
    pub outcomes: Vec<(User, ShareOutcome)>,
}

impl ShareReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| !outcome.is_failure())
            || self.outcomes.is_empty()
    }
}
