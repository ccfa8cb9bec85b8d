//! Bounded-concurrency batch transfers
//!
//! Items are split into consecutive groups of at most `batch_size`. Groups
//! run strictly one after another; the items of a group run concurrently.
//! A failed item is recorded and never cancels its siblings.

use crate::chain::FolderChainResolver;
use crate::error::{Result, SyncError};
use crate::layout::LocalLayout;
use crate::types::{
    BatchProgress, DownloadedFile, TransferFailure, TransferGroup, TransferReport, UploadReport,
    UploadedFile,
};
use docsync_core::{CreatedFile, DocumentStore, FileDescriptor, FolderRef, ItemId};
use futures_util::future::join_all;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info, warn};

pub use crate::types::DEFAULT_BATCH_SIZE;

pub struct TransferScheduler<'a> {
    store: &'a dyn DocumentStore,
    batch_size: usize,
}

impl<'a> TransferScheduler<'a> {
    /// A zero batch size is treated as 1
    pub fn new(store: &'a dyn DocumentStore, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Split `n` items into `ceil(n / batch_size)` consecutive groups
    pub fn plan(&self, n: usize) -> Vec<Range<usize>> {
        (0..n)
            .step_by(self.batch_size)
            .map(|start| start..(start + self.batch_size).min(n))
            .collect()
    }

    /// Download `items` into `layout`, one batch group at a time.
    ///
    /// Failed items are recorded in the report. A fatal store error stops
    /// the download once its group has settled.
    pub async fn download<F>(
        &self,
        items: &[FileDescriptor],
        layout: &LocalLayout,
        mut progress: F,
    ) -> Result<TransferReport<DownloadedFile>>
    where
        F: FnMut(BatchProgress),
    {
        let plan = self.plan(items.len());
        let groups = plan.len();
        let mut report = TransferReport::default();

        info!(files = items.len(), groups, batch_size = self.batch_size, "Starting download");

        for (index, range) in plan.into_iter().enumerate() {
            let batch = &items[range];
            let results = join_all(batch.iter().map(|file| self.download_one(file, layout))).await;

            for (file, result) in batch.iter().zip(results) {
                match result {
                    Ok(downloaded) => report.succeeded.push(downloaded),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(file = %file.relative_path(), error = %e, "Download failed");
                        report.failed.push(TransferFailure {
                            item: file.relative_path(),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            progress(BatchProgress {
                group: index + 1,
                groups,
                completed: report.total(),
                total: items.len(),
            });
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Download finished"
        );
        Ok(report)
    }

    async fn download_one(&self, file: &FileDescriptor, layout: &LocalLayout) -> Result<DownloadedFile> {
        let contents = self.store.read_file_data(&file.id).await?;
        let local_path = layout.write_file(file, &contents).await?;
        debug!(file = %file.relative_path(), bytes = contents.len(), "Downloaded file");

        Ok(DownloadedFile {
            remote_path: file.relative_path(),
            local_path,
            bytes: contents.len(),
        })
    }

    /// Upload each group into `root/base_segments/<group folder>`.
    ///
    /// Target folders are created as needed. A group whose folder cannot be
    /// resolved has all of its files recorded as failed; later groups still
    /// run. Fatal store errors stop the upload.
    pub async fn upload<F>(
        &self,
        groups: &[TransferGroup],
        resolver: &FolderChainResolver<'_>,
        root: &FolderRef,
        base_segments: &[String],
        mut progress: F,
    ) -> Result<UploadReport>
    where
        F: FnMut(BatchProgress),
    {
        let total: usize = groups.iter().map(|group| group.files.len()).sum();
        let batches: usize = groups
            .iter()
            .map(|group| self.plan(group.files.len()).len())
            .sum();
        let mut report = UploadReport::default();
        let mut batch_index = 0;

        info!(files = total, folders = groups.len(), batch_size = self.batch_size, "Starting upload");

        for group in groups {
            let mut segments = base_segments.to_vec();
            segments.extend(group.relative_folder_segments.iter().cloned());

            let plan = self.plan(group.files.len());

            let folder = match resolver.resolve(root.clone(), &segments, true).await {
                Ok(chain) => {
                    report.created_folders.extend(chain.created().cloned());
                    chain.leaf().id.clone()
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(folder = %segments.join("/"), error = %e, "Target folder unavailable");
                    let reason = e.to_string();
                    report.files.failed.extend(group.files.iter().map(|file| TransferFailure {
                        item: relative_item(&group.relative_folder_segments, file),
                        reason: reason.clone(),
                    }));
                    batch_index += plan.len();
                    if !plan.is_empty() {
                        progress(BatchProgress {
                            group: batch_index,
                            groups: batches,
                            completed: report.files.total(),
                            total,
                        });
                    }
                    continue;
                }
            };

            for range in plan {
                let batch = &group.files[range];
                let results = join_all(batch.iter().map(|file| self.upload_one(&folder, file))).await;

                let mut settled = TransferReport::default();
                for (file, result) in batch.iter().zip(results) {
                    match result {
                        Ok(created) => settled.succeeded.push(UploadedFile {
                            local_path: file.clone(),
                            remote_folder: segments.clone(),
                            created,
                        }),
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            let item = relative_item(&group.relative_folder_segments, file);
                            warn!(file = %item, error = %e, "Upload failed");
                            settled.failed.push(TransferFailure {
                                item,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                report.files.merge(settled);

                batch_index += 1;
                progress(BatchProgress {
                    group: batch_index,
                    groups: batches,
                    completed: report.files.total(),
                    total,
                });
            }
        }

        info!(
            succeeded = report.files.succeeded.len(),
            failed = report.files.failed.len(),
            folders_created = report.created_folders.len(),
            "Upload finished"
        );
        Ok(report)
    }

    async fn upload_one(&self, folder: &ItemId, file: &Path) -> Result<CreatedFile> {
        let name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SyncError::invalid_local(file, "file name is not valid UTF-8"))?;
        let contents = tokio::fs::read(file).await?;
        let created = self.store.create_file(folder, name, contents).await?;
        debug!(file = %name, id = %created.id, version = %created.version, "Uploaded file");
        Ok(created)
    }
}

fn relative_item(segments: &[String], file: &Path) -> String {
    let name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let mut parts = segments.to_vec();
    parts.push(name);
    parts.join("/")
}
