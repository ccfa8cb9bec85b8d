//! docsync Client
//!
//! HTTP client library for the documents REST API of a content server.
//!
//! # Features
//!
//! - **Folders**: list (paged), find by name, create, delete
//! - **Files**: whole-buffer read and multipart upload
//! - **Resources**: site, theme and component root lookup by name
//! - **Sharing**: user search, folder members, grant and revoke
//!
//! [`DocsClient`] implements [`docsync_core::DocumentStore`], which is the
//! only surface the sync engine uses.
//!
//! # Example
//!
//! ```ignore
//! use docsync_client::{DocsClient, ServerConfig};
//! use docsync_core::{DocumentStore, ItemId, ItemType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::with_basic_auth("https://content.example.com", "user", "secret");
//!     let client = DocsClient::new(config)?;
//!
//!     let images = client
//!         .find_item(&ItemId::home(), "images", ItemType::Folder)
//!         .await?;
//!     println!("images folder: {:?}", images.map(|f| f.id));
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod files;
mod folders;
mod resources;
mod sharing;
mod types;

// Re-export main types
pub use client::DocsClient;
pub use error::{ClientError, Result};
pub use types::{Credentials, ServerConfig};

// Re-export sub-clients for direct use if needed
pub use files::FileClient;
pub use folders::FolderClient;
pub use resources::ResourceClient;
pub use sharing::ShareClient;
