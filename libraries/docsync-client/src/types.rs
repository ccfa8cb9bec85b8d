//! Types for documents REST API requests and responses.

use docsync_core::{Item, User};
use serde::{Deserialize, Serialize};

/// How requests authenticate against the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication header
    #[default]
    None,
    /// HTTP basic authentication
    Basic { username: String, password: String },
    /// OAuth bearer token
    Bearer(String),
}

/// Configuration for connecting to a documents server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://content.example.com")
    pub url: String,
    pub credentials: Credentials,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::None,
        }
    }

    /// Create a config using basic authentication.
    pub fn with_basic_auth(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::Basic {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    /// Create a config using a bearer token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::Bearer(token.into()),
        }
    }
}

// =============================================================================
// Folder Types
// =============================================================================

/// A page of folder children.
#[derive(Debug, Deserialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
}

/// Request body for folder creation.
#[derive(Debug, Serialize)]
pub struct CreateFolderRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// Folder returned by folder creation.
#[derive(Debug, Deserialize)]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
}

// =============================================================================
// File Types
// =============================================================================

/// `jsonInputParameters` part of a file upload.
#[derive(Debug, Serialize)]
pub struct UploadParameters<'a> {
    #[serde(rename = "parentID")]
    pub parent_id: &'a str,
}

// =============================================================================
// Resource Types
// =============================================================================

/// Site, theme or component looked up by name.
#[derive(Debug, Deserialize)]
pub struct ResourceResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Sharing Types
// =============================================================================

/// Result of a user search.
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub items: Vec<User>,
}

/// One folder member as listed by the shares endpoint.
#[derive(Debug, Deserialize)]
pub struct MemberEntry {
    pub user: User,
    #[serde(default)]
    pub role: Option<String>,
}

/// Members of a shared folder.
#[derive(Debug, Deserialize)]
pub struct MembersResponse {
    #[serde(default)]
    pub items: Vec<MemberEntry>,
}

/// Request body for grant and role change.
#[derive(Debug, Serialize)]
pub struct ShareRequest<'a> {
    #[serde(rename = "userID")]
    pub user_id: &'a str,
    pub role: &'a str,
}

/// Request body for revoke.
#[derive(Debug, Serialize)]
pub struct RevokeRequest<'a> {
    #[serde(rename = "userID")]
    pub user_id: &'a str,
}

/// Outcome envelope of share operations; `"0"` means success.
#[derive(Debug, Deserialize)]
pub struct ShareResponse {
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ShareResponse {
    pub fn is_success(&self) -> bool {
        self.error_code.as_deref().map_or(true, |code| code == "0")
    }
}
