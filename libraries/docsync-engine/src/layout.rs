//! Mapping between remote folder paths and the local filesystem

use crate::error::{Result, SyncError};
use crate::path::PathSpec;
use crate::types::TransferGroup;
use docsync_core::FileDescriptor;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Local directory tree that downloads are written into
#[derive(Debug, Clone)]
pub struct LocalLayout {
    root: PathBuf,
}

impl LocalLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Make sure `root/segments...` exists as a directory.
    ///
    /// Safe to call concurrently for overlapping paths: a directory created
    /// by someone else between the check and the create is accepted.
    pub async fn ensure_dir(&self, segments: &[String]) -> Result<PathBuf> {
        let mut dir = self.root.clone();
        if !dir.is_dir() {
            if dir.exists() {
                return Err(SyncError::invalid_local(dir, "exists and is not a directory"));
            }
            tokio::fs::create_dir_all(&dir).await?;
        }

        for segment in segments {
            check_segment(&dir, segment)?;
            dir.push(segment);
            create_dir_if_missing(&dir).await?;
        }

        Ok(dir)
    }

    /// Write a downloaded file below its remote folder path, replacing any
    /// existing file.
    pub async fn write_file(&self, file: &FileDescriptor, contents: &[u8]) -> Result<PathBuf> {
        let dir = self.ensure_dir(&file.remote_folder_path).await?;
        check_segment(&dir, &file.name)?;

        let path = dir.join(&file.name);
        tokio::fs::write(&path, contents).await?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
        Ok(path)
    }
}

async fn create_dir_if_missing(dir: &Path) -> Result<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => return Err(SyncError::invalid_local(dir, "exists and is not a directory")),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    match tokio::fs::create_dir(dir).await {
        Ok(()) => {
            debug!(dir = %dir.display(), "Created directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Remote names become single path components and nothing else.
fn check_segment(dir: &Path, segment: &str) -> Result<()> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !segment.contains(['/', '\\']) => Ok(()),
        _ => Err(SyncError::invalid_local(
            dir.join(segment),
            "remote name is not a plain file name",
        )),
    }
}

/// Default download target: `documents_dir/<resource name>/<segments...>`
pub fn default_target(documents_dir: &Path, spec: &PathSpec) -> PathBuf {
    let mut target = documents_dir.to_path_buf();
    if let Some(name) = spec.resource_name() {
        target.push(name);
    }
    target.extend(spec.segments());
    target
}

/// Folder segments of `file` relative to `source_root`
pub fn relative_segments(source_root: &Path, file: &Path) -> Result<Vec<String>> {
    let parent = file.parent().unwrap_or(source_root);
    let relative = parent
        .strip_prefix(source_root)
        .map_err(|_| SyncError::invalid_local(file, "not inside the upload folder"))?;

    relative
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .map(|component| match component {
            Component::Normal(name) => name
                .to_str()
                .map(str::to_string)
                .ok_or_else(|| SyncError::invalid_local(file, "folder name is not valid UTF-8")),
            _ => Err(SyncError::invalid_local(file, "unexpected path component")),
        })
        .collect()
}

/// Group files by their folder relative to `source_root`.
///
/// Groups are ordered by folder path, so a parent folder always comes
/// before its subfolders; each folder appears exactly once.
pub fn group_files(source_root: &Path, files: &[PathBuf]) -> Result<Vec<TransferGroup>> {
    let mut groups: BTreeMap<Vec<String>, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let segments = relative_segments(source_root, file)?;
        groups.entry(segments).or_default().push(file.clone());
    }

    Ok(groups
        .into_iter()
        .map(|(relative_folder_segments, files)| TransferGroup {
            relative_folder_segments,
            files,
        })
        .collect())
}

/// Every regular file below `source_root`, symlinks not followed
pub fn collect_files(source_root: &Path) -> Result<Vec<PathBuf>> {
    if !source_root.is_dir() {
        return Err(SyncError::invalid_local(source_root, "not a directory"));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(source_root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| SyncError::Walk {
            path: source_root.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
