//! Main documents server client.

use crate::error::{ClientError, Result};
use crate::files::FileClient;
use crate::folders::FolderClient;
use crate::resources::ResourceClient;
use crate::sharing::ShareClient;
use crate::types::{Credentials, ServerConfig};
use async_trait::async_trait;
use docsync_core::{
    CreatedFile, DocumentStore, FolderRef, Item, ItemId, ItemType, Member, ResourceKind, Role,
    User,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Path prefix of the documents REST API.
const DOCUMENTS_API: [&str; 3] = ["documents", "api", "1.2"];

/// Client for a documents server.
///
/// Implements [`DocumentStore`] on top of the documents REST API, so the
/// sync engine can drive a real server through it.
///
/// # Example
///
/// ```ignore
/// use docsync_client::{DocsClient, ServerConfig};
/// use docsync_core::{DocumentStore, ItemId};
///
/// let config = ServerConfig::with_basic_auth("https://content.example.com", "user", "secret");
/// let client = DocsClient::new(config)?;
///
/// let children = client.list_children(&ItemId::home(), 100).await?;
/// println!("Home folder has {} items", children.len());
/// ```
pub struct DocsClient {
    http: Client,
    base_url: Url,
    credentials: Credentials,
}

impl DocsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        let base_url = Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("docsync/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials,
        })
    }

    /// Get the server URL, without a trailing slash.
    pub fn url(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    fn session(&self) -> Session<'_> {
        Session {
            http: &self.http,
            base_url: &self.base_url,
            credentials: &self.credentials,
        }
    }

    /// Folder operations.
    pub fn folders(&self) -> FolderClient<'_> {
        FolderClient::new(self.session())
    }

    /// File content operations.
    pub fn files(&self) -> FileClient<'_> {
        FileClient::new(self.session())
    }

    /// Site, theme and component lookups.
    pub fn resources(&self) -> ResourceClient<'_> {
        ResourceClient::new(self.session())
    }

    /// User lookup and folder sharing.
    pub fn sharing(&self) -> ShareClient<'_> {
        ShareClient::new(self.session())
    }
}

#[async_trait]
impl DocumentStore for DocsClient {
    async fn find_or_create_folder(
        &self,
        parent: &ItemId,
        name: &str,
    ) -> docsync_core::Result<FolderRef> {
        Ok(self.folders().find_or_create(parent, name).await?)
    }

    async fn find_item(
        &self,
        parent: &ItemId,
        name: &str,
        item_type: ItemType,
    ) -> docsync_core::Result<Option<Item>> {
        Ok(self.folders().find_item(parent, name, &item_type).await?)
    }

    async fn list_children(&self, parent: &ItemId, limit: usize) -> docsync_core::Result<Vec<Item>> {
        Ok(self.folders().list_children(parent, limit).await?)
    }

    async fn delete_folder(&self, id: &ItemId) -> docsync_core::Result<()> {
        Ok(self.folders().delete(id).await?)
    }

    async fn read_file_data(&self, id: &ItemId) -> docsync_core::Result<Vec<u8>> {
        Ok(self.files().read_data(id).await?)
    }

    async fn create_file(
        &self,
        parent: &ItemId,
        name: &str,
        contents: Vec<u8>,
    ) -> docsync_core::Result<CreatedFile> {
        Ok(self.files().create(parent, name, contents).await?)
    }

    async fn get_resource_id(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> docsync_core::Result<Option<ItemId>> {
        Ok(self.resources().get_id(kind, name).await?)
    }

    async fn get_users_by_name(&self, name: &str) -> docsync_core::Result<Vec<User>> {
        Ok(self.sharing().find_users(name).await?)
    }

    async fn list_folder_members(&self, folder: &ItemId) -> docsync_core::Result<Vec<Member>> {
        Ok(self.sharing().list_members(folder).await?)
    }

    async fn grant_access(
        &self,
        folder: &ItemId,
        user: &User,
        role: Role,
        new_member: bool,
    ) -> docsync_core::Result<()> {
        Ok(self.sharing().grant(folder, user, role, new_member).await?)
    }

    async fn revoke_access(&self, folder: &ItemId, user: &User) -> docsync_core::Result<()> {
        Ok(self.sharing().revoke(folder, user).await?)
    }
}

/// Borrowed connection state shared by the sub-clients.
#[derive(Clone, Copy)]
pub(crate) struct Session<'a> {
    http: &'a Client,
    base_url: &'a Url,
    credentials: &'a Credentials,
}

impl<'a> Session<'a> {
    /// URL of `segments` under the server base, each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of `segments` under the documents API.
    pub(crate) fn documents(&self, segments: &[&str]) -> Result<Url> {
        let all: Vec<&str> = DOCUMENTS_API.iter().chain(segments).copied().collect();
        self.endpoint(&all)
    }

    /// Start a request carrying the configured credentials.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "Sending request");
        let builder = self.http.request(method, url);
        match self.credentials {
            Credentials::None => builder,
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            Credentials::Bearer(token) => builder.bearer_auth(token),
        }
    }

    /// Send a request, telling unreachable servers apart from other failures.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })
    }
}

/// Map a non-success response to an error, naming `entity`/`id` on 404.
pub(crate) async fn check_status(
    response: Response,
    entity: &'static str,
    id: &str,
) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status.as_u16() == 401 || status.as_u16() == 403 {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::AuthFailed(if error_text.is_empty() {
            status.to_string()
        } else {
            error_text
        }))
    } else if status.as_u16() == 404 {
        Err(ClientError::NotFound {
            entity,
            id: id.to_string(),
        })
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

/// Decode a JSON body, reporting what was being parsed on failure.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}
