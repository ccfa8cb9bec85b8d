//! Command handlers
//!
//! Each handler runs one engine operation and prints its report to stdout.
//! The returned flag is false when a batch command transferred nothing
//! successfully.

use crate::error::Result;
use docsync_core::Role;
use docsync_engine::{
    BatchProgress, DocumentSync, ShareOutcome, ShareReport, TransferFailure,
};
use std::path::{Path, MAIN_SEPARATOR};

pub async fn create_folder(sync: &DocumentSync<'_>, path: &str) -> Result<bool> {
    let chain = sync.create_folder(path).await?;

    for folder in &chain.folders {
        if folder.created {
            println!(" - created folder {} (Id: {})", folder.name, folder.id);
        } else {
            println!(" - folder {} exists (Id: {})", folder.name, folder.id);
        }
    }
    println!("folder {} ready", chain.path().join("/"));
    Ok(true)
}

pub async fn delete_folder(sync: &DocumentSync<'_>, path: &str) -> Result<bool> {
    let folder = sync.delete_folder(path).await?;
    println!("folder {} deleted (Id: {})", path.trim_matches('/'), folder.id);
    Ok(true)
}

pub async fn upload_file(sync: &DocumentSync<'_>, file: &Path, folder: &str) -> Result<bool> {
    let upload = sync.upload_file(file, folder).await?;
    println!(
        "file {} uploaded to {} (Id: {} version: {})",
        upload.created.name, upload.target, upload.created.id, upload.created.version
    );
    Ok(true)
}

pub async fn download_file(sync: &DocumentSync<'_>, path: &str, target: Option<&Path>) -> Result<bool> {
    let download = sync.download_file(path, target).await?;
    println!(
        "file {} downloaded from {} to {}",
        download.file.remote_path,
        download.source,
        download.file.local_path.display()
    );
    Ok(true)
}

pub async fn download_folder(
    sync: &DocumentSync<'_>,
    path: &str,
    target: Option<&Path>,
) -> Result<bool> {
    let download = sync.download_folder(path, target, print_progress).await?;
    let report = &download.report;

    for file in &report.succeeded {
        println!(" - saved file {} to {}", file.remote_path, file.local_path.display());
    }
    println!(
        "downloaded {} of {} files from {} to {}",
        report.succeeded.len(),
        report.total(),
        download.source,
        download.target.display()
    );
    print_failures("download", &report.failed);
    Ok(report.is_success())
}

/// True when `dir` ends with a separator, meaning only its contents are
/// uploaded.
pub fn contents_only(dir: &str) -> bool {
    dir.ends_with('/') || dir.ends_with(MAIN_SEPARATOR)
}

pub async fn upload_folder(
    sync: &DocumentSync<'_>,
    dir: &Path,
    content_only: bool,
    folder: &str,
) -> Result<bool> {
    let upload = sync
        .upload_folder(dir, folder, content_only, print_progress)
        .await?;
    let report = &upload.report;

    for created in &report.created_folders {
        println!(" - created folder {} (Id: {})", created.name, created.id);
    }
    for file in &report.files.succeeded {
        let folder = if file.remote_folder.is_empty() {
            upload.target.clone()
        } else {
            format!("{} > {}", upload.target, file.remote_folder.join(" > "))
        };
        println!(
            " - uploaded file {} (Id: {} version: {}) to {}",
            file.created.name, file.created.id, file.created.version, folder
        );
    }
    println!(
        "uploaded {} of {} files to {}",
        report.files.succeeded.len(),
        report.files.total(),
        upload.target
    );
    print_failures("upload", &report.files.failed);
    Ok(report.is_success())
}

pub async fn share_folder(
    sync: &DocumentSync<'_>,
    path: &str,
    users: &[String],
    role: Role,
) -> Result<bool> {
    let report = sync.share_folder(path, users, role).await?;
    print_share_report(&report);
    Ok(report.is_success())
}

pub async fn unshare_folder(sync: &DocumentSync<'_>, path: &str, users: &[String]) -> Result<bool> {
    let report = sync.unshare_folder(path, users).await?;
    print_share_report(&report);
    Ok(report.is_success())
}

fn print_progress(tick: BatchProgress) {
    println!(
        " - group {}/{}: {}/{} files",
        tick.group, tick.groups, tick.completed, tick.total
    );
}

fn print_failures(action: &str, failed: &[TransferFailure]) {
    for failure in failed {
        println!("ERROR: failed to {} {}: {}", action, failure.item, failure.reason);
    }
}

fn print_share_report(report: &ShareReport) {
    for (user, outcome) in &report.outcomes {
        let login = &user.login_name;
        match outcome {
            ShareOutcome::Granted(role) => {
                println!("user {} granted {} on {}", login, role, report.folder);
            }
            ShareOutcome::RoleUpdated { from: Some(from), to } => {
                println!("user {} role changed from {} to {} on {}", login, from, to, report.folder);
            }
            ShareOutcome::RoleUpdated { from: None, to } => {
                println!("user {} role set to {} on {}", login, to, report.folder);
            }
            ShareOutcome::Revoked => {
                println!("user {} no longer has access to {}", login, report.folder);
            }
            ShareOutcome::NoAccess => {
                println!("user {} has no access to {}", login, report.folder);
            }
            ShareOutcome::Failed(reason) => {
                println!("ERROR: user {}: {}", login, reason);
            }
        }
    }
}
