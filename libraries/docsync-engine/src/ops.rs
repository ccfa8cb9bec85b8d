//! One operation per docsync command
//!
//! Every operation validates its arguments before the first remote call.

use crate::chain::{FolderChainResolver, ResolvedChain};
use crate::error::{Result, SyncError};
use crate::layout::{self, LocalLayout};
use crate::path::PathSpec;
use crate::scheduler::TransferScheduler;
use crate::tree::TreeEnumerator;
use crate::types::{
    BatchProgress, DownloadedFile, FileDownload, FileUpload, FolderDownload, FolderUpload,
    ShareOutcome, ShareReport, SyncOptions,
};
use docsync_core::{DocumentStore, FileDescriptor, FolderRef, ItemType, Member, Role, User};
use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Folder and file sync against a document store
pub struct DocumentSync<'a> {
    store: &'a dyn DocumentStore,
    options: SyncOptions,
}

impl<'a> DocumentSync<'a> {
    pub fn new(store: &'a dyn DocumentStore, options: SyncOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    fn resolver(&self) -> FolderChainResolver<'a> {
        FolderChainResolver::new(self.store)
    }

    fn scheduler(&self) -> TransferScheduler<'a> {
        TransferScheduler::new(self.store, self.options.batch_size)
    }

    /// Create every missing folder of `path`
    pub async fn create_folder(&self, path: &str) -> Result<ResolvedChain> {
        let spec = PathSpec::parse(path)?;
        if spec.is_root() {
            return Err(SyncError::NoFolderSpecified);
        }

        let chain = self.resolver().resolve_path(&spec, true).await?;
        info!(
            path = %spec,
            created = chain.created().count(),
            "Folder chain ready"
        );
        Ok(chain)
    }

    /// Delete the folder `path` points at.
    ///
    /// Roots (the home folder, a resource root) are never deleted.
    pub async fn delete_folder(&self, path: &str) -> Result<FolderRef> {
        let spec = PathSpec::parse(path)?;
        if spec.is_root() {
            return Err(SyncError::NoFolderSpecified);
        }

        let chain = self.resolver().resolve_path(&spec, false).await?;
        let leaf = chain.leaf().clone();
        self.store.delete_folder(&leaf.id).await?;

        info!(path = %spec, id = %leaf.id, "Deleted folder");
        Ok(leaf)
    }

    /// Upload one local file into an existing remote folder
    pub async fn upload_file(&self, local: &Path, folder_path: &str) -> Result<FileUpload> {
        if !local.is_file() {
            return Err(SyncError::invalid_local(local, "not an existing file"));
        }
        let name = local
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SyncError::invalid_local(local, "file name is not valid UTF-8"))?;
        let spec = PathSpec::parse(folder_path)?;

        let chain = self.resolver().resolve_path(&spec, false).await?;
        let contents = tokio::fs::read(local).await?;
        let created = self
            .store
            .create_file(&chain.leaf().id, name, contents)
            .await?;

        info!(file = %name, id = %created.id, version = %created.version, "Uploaded file");
        Ok(FileUpload {
            created,
            target: spec.describe(),
        })
    }

    /// Download one remote file.
    ///
    /// Without `target` the file lands in the default layout below the
    /// documents directory.
    pub async fn download_file(&self, path: &str, target: Option<&Path>) -> Result<FileDownload> {
        let spec = PathSpec::parse(path)?;
        let (folder_spec, name) = spec.split_file()?;
        check_target_dir(target)?;

        let chain = self.resolver().resolve_path(&folder_spec, false).await?;
        let item = self
            .store
            .find_item(&chain.leaf().id, &name, ItemType::File)
            .await?
            .ok_or_else(|| SyncError::FileNotFound(spec.to_string()))?;

        let contents = self.store.read_file_data(&item.id).await?;
        let layout = LocalLayout::new(self.target_root(target, &folder_spec));
        let descriptor = FileDescriptor::new(item.id, item.name, Vec::new());
        let local_path = layout.write_file(&descriptor, &contents).await?;

        info!(file = %spec, local = %local_path.display(), bytes = contents.len(), "Downloaded file");
        Ok(FileDownload {
            file: DownloadedFile {
                remote_path: descriptor.relative_path(),
                local_path,
                bytes: contents.len(),
            },
            source: folder_spec.describe(),
        })
    }

    /// Download a whole remote folder tree, `batch_size` files at a time
    pub async fn download_folder<F>(
        &self,
        path: &str,
        target: Option<&Path>,
        progress: F,
    ) -> Result<FolderDownload>
    where
        F: FnMut(BatchProgress),
    {
        let spec = PathSpec::parse(path)?;
        check_target_dir(target)?;

        let chain = self.resolver().resolve_path(&spec, false).await?;
        let files = TreeEnumerator::new(self.store)
            .enumerate(&chain.leaf().id, &[])
            .await?;
        debug!(path = %spec, files = files.len(), "Folder enumerated");

        let layout = LocalLayout::new(self.target_root(target, &spec));
        let report = self.scheduler().download(&files, &layout, progress).await?;

        Ok(FolderDownload {
            source: spec.describe(),
            target: layout.root().to_path_buf(),
            report,
        })
    }

    /// Upload a local directory tree.
    ///
    /// The directory itself becomes a folder under `folder_path` unless
    /// `content_only` is set, in which case only its contents are uploaded.
    /// Missing remote folders are created.
    pub async fn upload_folder<F>(
        &self,
        local: &Path,
        folder_path: &str,
        content_only: bool,
        progress: F,
    ) -> Result<FolderUpload>
    where
        F: FnMut(BatchProgress),
    {
        if !local.is_dir() {
            return Err(SyncError::invalid_local(local, "not an existing directory"));
        }
        let source = local.canonicalize()?;
        let spec = PathSpec::parse(folder_path)?;

        let target = if content_only {
            spec
        } else {
            let name = source
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| SyncError::invalid_local(local, "directory has no usable name"))?;
            spec.join([name])
        };

        let files = layout::collect_files(&source)?;
        let groups = layout::group_files(&source, &files)?;

        let resolver = self.resolver();
        let base = resolver.resolve_path(&target, true).await?;
        let mut report = self
            .scheduler()
            .upload(&groups, &resolver, base.leaf(), &[], progress)
            .await?;

        let mut created_folders: Vec<FolderRef> = base.created().cloned().collect();
        created_folders.append(&mut report.created_folders);
        report.created_folders = created_folders;

        Ok(FolderUpload {
            target: target.describe(),
            report,
        })
    }

    /// Share a folder with each user, granting `role`.
    ///
    /// Existing members get their role changed; all users are looked up
    /// before any access is changed.
    pub async fn share_folder(&self, path: &str, users: &[String], role: Role) -> Result<ShareReport> {
        let spec = PathSpec::parse(path)?;
        let (folder, users, members) = self.prepare_sharing(&spec, users).await?;
        let folder = &folder;

        let outcomes = join_all(users.into_iter().map(|user| {
            let existing = find_member(&members, &user).cloned();
            async move {
                let outcome = match self
                    .store
                    .grant_access(&folder.id, &user, role, existing.is_none())
                    .await
                {
                    Ok(()) => match existing {
                        None => ShareOutcome::Granted(role),
                        Some(member) => ShareOutcome::RoleUpdated {
                            from: member.role,
                            to: role,
                        },
                    },
                    Err(e) => ShareOutcome::Failed(e.to_string()),
                };
                (user, outcome)
            }
        }))
        .await;

        Ok(ShareReport {
            folder: spec.describe(),
            outcomes,
        })
    }

    /// Remove each user's access to a folder
    pub async fn unshare_folder(&self, path: &str, users: &[String]) -> Result<ShareReport> {
        let spec = PathSpec::parse(path)?;
        let (folder, users, members) = self.prepare_sharing(&spec, users).await?;
        let folder = &folder;

        let outcomes = join_all(users.into_iter().map(|user| {
            let is_member = find_member(&members, &user).is_some();
            async move {
                let outcome = if !is_member {
                    ShareOutcome::NoAccess
                } else {
                    match self.store.revoke_access(&folder.id, &user).await {
                        Ok(()) => ShareOutcome::Revoked,
                        Err(e) => ShareOutcome::Failed(e.to_string()),
                    }
                };
                (user, outcome)
            }
        }))
        .await;

        Ok(ShareReport {
            folder: spec.describe(),
            outcomes,
        })
    }

    async fn prepare_sharing(
        &self,
        spec: &PathSpec,
        names: &[String],
    ) -> Result<(FolderRef, Vec<User>, Vec<Member>)> {
        if spec.is_root() && spec.resource().is_none() {
            return Err(SyncError::NoFolderSpecified);
        }

        let chain = self.resolver().resolve_path(spec, false).await?;
        let folder = chain.leaf().clone();

        let mut users = Vec::with_capacity(names.len());
        for name in names {
            users.push(self.lookup_user(name).await?);
        }

        let members = self.store.list_folder_members(&folder.id).await?;
        debug!(folder = %folder.id, members = members.len(), "Loaded folder members");
        Ok((folder, users, members))
    }

    async fn lookup_user(&self, name: &str) -> Result<User> {
        self.store
            .get_users_by_name(name)
            .await?
            .into_iter()
            .find(|user| user.login_name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SyncError::UserNotFound(name.to_string()))
    }

    fn target_root(&self, explicit: Option<&Path>, spec: &PathSpec) -> PathBuf {
        match explicit {
            Some(dir) => dir.to_path_buf(),
            None => layout::default_target(&self.options.documents_dir, spec),
        }
    }
}

fn check_target_dir(target: Option<&Path>) -> Result<()> {
    match target {
        Some(dir) if !dir.is_dir() => Err(SyncError::invalid_local(dir, "not an existing directory")),
        _ => Ok(()),
    }
}

fn find_member<'m>(members: &'m [Member], user: &User) -> Option<&'m Member> {
    members.iter().find(|member| member.user.id == user.id)
}
