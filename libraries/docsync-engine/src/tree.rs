//! Recursive enumeration of remote folder trees

use crate::error::Result;
use docsync_core::{DocumentStore, FileDescriptor, ItemId, ItemType};
use futures_util::future::{join_all, BoxFuture};
use tracing::debug;

/// Page size hint used when listing a folder
pub const LIST_LIMIT: usize = 9999;

/// Lists every file below a folder, with its path relative to the start
pub struct TreeEnumerator<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> TreeEnumerator<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Enumerate all files under `root`.
    ///
    /// Files directly in a folder come before the files of its subfolders;
    /// subfolders are listed concurrently and concatenated in listing order.
    pub async fn enumerate(
        &self,
        root: &ItemId,
        root_relative_path: &[String],
    ) -> Result<Vec<FileDescriptor>> {
        let files = self.walk(root.clone(), root_relative_path.to_vec()).await?;
        debug!(root = %root, files = files.len(), "Enumerated folder tree");
        Ok(files)
    }

    fn walk(&self, folder: ItemId, path: Vec<String>) -> BoxFuture<'_, Result<Vec<FileDescriptor>>> {
        Box::pin(async move {
            let children = self.store.list_children(&folder, LIST_LIMIT).await?;

            let mut files = Vec::new();
            let mut subfolders = Vec::new();
            for child in children {
                match child.item_type {
                    ItemType::File => {
                        files.push(FileDescriptor::new(child.id, child.name, path.clone()));
                    }
                    ItemType::Folder => {
                        let mut child_path = path.clone();
                        child_path.push(child.name);
                        subfolders.push(self.walk(child.id, child_path));
                    }
                    ItemType::Other(ref kind) => {
                        debug!(name = %child.name, kind = %kind, "Skipping unsupported item");
                    }
                }
            }

            for subtree in join_all(subfolders).await {
                files.extend(subtree?);
            }
            Ok(files)
        })
    }
}
