//! Domain types for remote folders, files and sharing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a remote folder or file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Identity the store uses for the caller's home folder
    pub const HOME: &'static str = "self";

    /// Create a new item ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The synthetic home folder identity
    pub fn home() -> Self {
        Self(Self::HOME.to_string())
    }

    pub fn is_home(&self) -> bool {
        self.0 == Self::HOME
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of a child entry in a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemType {
    File,
    Folder,
    /// Anything the store reports that is neither a file nor a folder
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::File => "file",
            ItemType::Folder => "folder",
            ItemType::Other(kind) => kind,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ItemType {
    fn from(kind: &str) -> Self {
        match kind {
            "file" => ItemType::File,
            "folder" => ItemType::Folder,
            other => ItemType::Other(other.to_string()),
        }
    }
}

impl Serialize for ItemType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kind = String::deserialize(deserializer)?;
        Ok(ItemType::from(kind.as_str()))
    }
}

/// One entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

impl Item {
    pub fn is_file(&self) -> bool {
        self.item_type == ItemType::File
    }

    pub fn is_folder(&self) -> bool {
        self.item_type == ItemType::Folder
    }
}

/// Named container that can act as a sync root instead of the home folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Site,
    Theme,
    Component,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Site,
        ResourceKind::Theme,
        ResourceKind::Component,
    ];

    /// Scope prefix used in symbolic paths (`site:mySite/images`)
    pub fn prefix(&self) -> &'static str {
        match self {
            ResourceKind::Site => "site:",
            ResourceKind::Theme => "theme:",
            ResourceKind::Component => "component:",
        }
    }

    /// Label shown in target breadcrumbs
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Site => "Sites",
            ResourceKind::Theme => "Themes",
            ResourceKind::Component => "Components",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Site => "site",
            ResourceKind::Theme => "theme",
            ResourceKind::Component => "component",
        }
    }

    /// Match an exact scope prefix such as `"site:"`
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved identity of a remote folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    pub id: ItemId,
    pub name: String,
    /// Home folder or resource root; never a lookup target itself
    pub is_root: bool,
    /// This invocation created the folder
    pub created: bool,
}

impl FolderRef {
    /// The caller's home folder
    pub fn home() -> Self {
        Self {
            id: ItemId::home(),
            name: "Home folder".to_string(),
            is_root: true,
            created: false,
        }
    }

    /// Root folder of a site, theme or component
    pub fn resource_root(kind: ResourceKind, name: impl Into<String>, id: ItemId) -> Self {
        let name = name.into();
        Self {
            id,
            name: format!("{} > {}", kind.label(), name),
            is_root: true,
            created: false,
        }
    }

    /// A folder that already existed in the store
    pub fn found(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_root: false,
            created: false,
        }
    }

    /// A folder created by this invocation
    pub fn created(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_root: false,
            created: true,
        }
    }
}

/// A remote file found while enumerating a folder tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileDescriptor {
    pub id: ItemId,
    pub name: String,
    /// Folder segments relative to the enumerated root
    pub remote_folder_path: Vec<String>,
}

impl FileDescriptor {
    pub fn new(id: ItemId, name: impl Into<String>, remote_folder_path: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            remote_folder_path,
        }
    }

    /// `a/b/name` relative to the enumerated root
    pub fn relative_path(&self) -> String {
        let mut parts: Vec<&str> = self.remote_folder_path.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join("/")
    }
}

/// A file created in the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFile {
    pub id: ItemId,
    pub name: String,
    pub version: String,
}

/// A store user, as returned by a user search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "loginName")]
    pub login_name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// Access role on a shared folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Downloader,
    Contributor,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Downloader => "downloader",
            Role::Contributor => "contributor",
            Role::Manager => "manager",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "downloader" => Ok(Role::Downloader),
            "contributor" => Ok(Role::Contributor),
            "manager" => Ok(Role::Manager),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user with access to a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user: User,
    pub role: Option<Role>,
}
