//! Folder operations for the documents REST API.

use crate::client::{check_status, parse_json, Session};
use crate::error::Result;
use crate::types::{CreateFolderRequest, FolderResponse, ItemsResponse};
use docsync_core::{FolderRef, Item, ItemId, ItemType};
use reqwest::Method;
use tracing::{debug, info};

/// Page size for name lookups
const FIND_PAGE_SIZE: usize = 100;

/// Folder client for a documents server.
pub struct FolderClient<'a> {
    session: Session<'a>,
}

impl<'a> FolderClient<'a> {
    pub(crate) fn new(session: Session<'a>) -> Self {
        Self { session }
    }

    /// List every child of a folder, following `hasMore` paging.
    ///
    /// # Arguments
    /// * `parent` - Folder to list (`self` for the home folder)
    /// * `limit` - Page size requested from the server
    pub async fn list_children(&self, parent: &ItemId, limit: usize) -> Result<Vec<Item>> {
        let limit = limit.max(1);
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.page(parent, None, limit, offset).await?;
            let received = page.items.len();
            items.extend(page.items);
            offset += received;

            if !page.has_more || received == 0 {
                break;
            }
        }

        debug!(parent = %parent, count = items.len(), "Listed folder items");
        Ok(items)
    }

    /// Find a child by exact name and type.
    ///
    /// The server filter is a substring match, so candidates are checked
    /// again here with case-sensitive equality. Pages are read until a match
    /// turns up or the server has no more.
    pub async fn find_item(
        &self,
        parent: &ItemId,
        name: &str,
        item_type: &ItemType,
    ) -> Result<Option<Item>> {
        debug!(parent = %parent, name = %name, item_type = %item_type, "Finding item");
        let mut offset = 0;

        loop {
            let page = self.page(parent, Some(name), FIND_PAGE_SIZE, offset).await?;
            let received = page.items.len();
            let has_more = page.has_more;

            if let Some(item) = page
                .items
                .into_iter()
                .find(|item| item.name == name && &item.item_type == item_type)
            {
                return Ok(Some(item));
            }

            offset += received;
            if !has_more || received == 0 {
                return Ok(None);
            }
        }
    }

    /// Fetch one page of a folder's children, optionally filtered by name.
    async fn page(
        &self,
        parent: &ItemId,
        filter: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<ItemsResponse> {
        let url = self.session.documents(&["folders", parent.as_str(), "items"])?;
        debug!(parent = %parent, offset, limit, "Listing folder items");

        let mut request = self
            .session
            .request(Method::GET, url)
            .query(&[("limit", limit), ("offset", offset)]);
        if let Some(name) = filter {
            request = request.query(&[("filterName", name)]);
        }

        let response = self.session.send(request).await?;
        let response = check_status(response, "folder", parent.as_str()).await?;
        parse_json(response, "folder items").await
    }

    /// Create a child folder.
    pub async fn create(&self, parent: &ItemId, name: &str) -> Result<FolderRef> {
        let url = self.session.documents(&["folders", parent.as_str()])?;
        let body = CreateFolderRequest {
            name,
            description: "",
        };

        let request = self.session.request(Method::POST, url).json(&body);
        let response = self.session.send(request).await?;
        let response = check_status(response, "folder", parent.as_str()).await?;
        let folder: FolderResponse = parse_json(response, "created folder").await?;

        info!(parent = %parent, id = %folder.id, name = %folder.name, "Folder created");
        Ok(FolderRef::created(ItemId::new(folder.id), folder.name))
    }

    /// Find a child folder, creating it when it does not exist.
    pub async fn find_or_create(&self, parent: &ItemId, name: &str) -> Result<FolderRef> {
        match self.find_item(parent, name, &ItemType::Folder).await? {
            Some(item) => Ok(FolderRef::found(item.id, item.name)),
            None => self.create(parent, name).await,
        }
    }

    /// Delete a folder.
    pub async fn delete(&self, id: &ItemId) -> Result<()> {
        let url = self.session.documents(&["folders", id.as_str()])?;
        debug!(id = %id, "Deleting folder");

        let request = self.session.request(Method::DELETE, url);
        let response = self.session.send(request).await?;
        check_status(response, "folder", id.as_str()).await?;

        info!(id = %id, "Folder deleted");
        Ok(())
    }
}
