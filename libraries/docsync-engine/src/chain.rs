//! Folder chain resolution: walks a list of segments from a root folder.

use crate::error::{Result, SyncError};
use crate::path::PathSpec;
use docsync_core::{DocumentStore, FolderRef, ItemType};
use tracing::{debug, info};

/// Outcome of resolving a segment list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChain {
    pub root: FolderRef,
    /// One entry per segment, in order
    pub folders: Vec<FolderRef>,
}

impl ResolvedChain {
    /// Deepest folder of the chain, or the root for an empty chain
    pub fn leaf(&self) -> &FolderRef {
        self.folders.last().unwrap_or(&self.root)
    }

    /// Folders this resolution created
    pub fn created(&self) -> impl Iterator<Item = &FolderRef> {
        self.folders.iter().filter(|folder| folder.created)
    }

    /// Segment names, in order
    pub fn path(&self) -> Vec<String> {
        self.folders.iter().map(|folder| folder.name.clone()).collect()
    }
}

/// Resolves (and optionally creates) folder chains in a document store
pub struct FolderChainResolver<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> FolderChainResolver<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Root folder a path is relative to
    pub async fn resolve_root(&self, spec: &PathSpec) -> Result<FolderRef> {
        match spec.resource() {
            None => Ok(FolderRef::home()),
            Some((kind, name)) => {
                debug!(kind = %kind, name = %name, "Resolving resource root");
                let id = self
                    .store
                    .get_resource_id(kind, name)
                    .await?
                    .ok_or_else(|| SyncError::ResourceNotFound {
                        kind,
                        name: name.to_string(),
                    })?;
                Ok(FolderRef::resource_root(kind, name, id))
            }
        }
    }

    /// Walk `segments` from `root`, one lookup per segment.
    ///
    /// Each segment is looked up under the folder resolved for the previous
    /// one. Without `create_if_missing`, the first missing segment fails the
    /// whole resolution.
    pub async fn resolve(
        &self,
        root: FolderRef,
        segments: &[String],
        create_if_missing: bool,
    ) -> Result<ResolvedChain> {
        let mut folders: Vec<FolderRef> = Vec::with_capacity(segments.len());

        for segment in segments {
            let parent = folders.last().unwrap_or(&root);

            let folder = if create_if_missing {
                self.store.find_or_create_folder(&parent.id, segment).await?
            } else {
                match self
                    .store
                    .find_item(&parent.id, segment, ItemType::Folder)
                    .await?
                {
                    Some(item) => FolderRef::found(item.id, item.name),
                    None => {
                        return Err(SyncError::FolderNotFound {
                            segment: segment.clone(),
                            path: segments.join("/"),
                        })
                    }
                }
            };

            if folder.created {
                info!(folder = %folder.name, id = %folder.id, parent = %parent.id, "Created folder");
            } else {
                debug!(folder = %folder.name, id = %folder.id, "Found folder");
            }
            folders.push(folder);
        }

        Ok(ResolvedChain { root, folders })
    }

    /// Resolve a whole path: its root, then its segments
    pub async fn resolve_path(&self, spec: &PathSpec, create_if_missing: bool) -> Result<ResolvedChain> {
        let root = self.resolve_root(spec).await?;
        self.resolve(root, spec.segments(), create_if_missing).await
    }
}
