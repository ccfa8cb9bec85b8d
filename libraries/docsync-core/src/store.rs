//! Remote document store trait

use crate::error::Result;
use crate::types::{CreatedFile, FolderRef, Item, ItemId, ItemType, Member, ResourceKind, Role, User};
use async_trait::async_trait;

/// Operations docsync needs from a remote document store
///
/// This trait abstracts the store so the sync engine runs unchanged against
/// the REST client and against in-memory stores.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // ========================================================================
    // Folders
    // ========================================================================

    /// Find a child folder by exact name, creating it when absent.
    ///
    /// The returned `FolderRef` has `created` set iff this call created it.
    async fn find_or_create_folder(&self, parent: &ItemId, name: &str) -> Result<FolderRef>;

    /// Find a child by exact, case-sensitive name and type
    async fn find_item(
        &self,
        parent: &ItemId,
        name: &str,
        item_type: ItemType,
    ) -> Result<Option<Item>>;

    /// List the children of a folder (at most `limit` per page)
    async fn list_children(&self, parent: &ItemId, limit: usize) -> Result<Vec<Item>>;

    /// Delete a folder and everything under it
    async fn delete_folder(&self, id: &ItemId) -> Result<()>;

    // ========================================================================
    // Files
    // ========================================================================

    /// Read the whole content of a file
    async fn read_file_data(&self, id: &ItemId) -> Result<Vec<u8>>;

    /// Create a file, or a new version when the name already exists
    async fn create_file(&self, parent: &ItemId, name: &str, contents: Vec<u8>)
        -> Result<CreatedFile>;

    // ========================================================================
    // Resources
    // ========================================================================

    /// Root folder id of a named site, theme or component
    async fn get_resource_id(&self, kind: ResourceKind, name: &str) -> Result<Option<ItemId>>;

    // ========================================================================
    // Sharing
    // ========================================================================

    /// Users whose name matches the query
    async fn get_users_by_name(&self, name: &str) -> Result<Vec<User>>;

    /// Current members of a folder
    async fn list_folder_members(&self, folder: &ItemId) -> Result<Vec<Member>>;

    /// Grant `role` to `user`; `new_member` selects grant vs. role change
    async fn grant_access(
        &self,
        folder: &ItemId,
        user: &User,
        role: Role,
        new_member: bool,
    ) -> Result<()>;

    /// Remove `user`'s access to a folder
    async fn revoke_access(&self, folder: &ItemId, user: &User) -> Result<()>;
}
