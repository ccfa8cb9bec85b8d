//! docsync Core
//!
//! Domain types, the remote store trait and store errors shared by the
//! docsync client, engine and CLI.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Identities**: `ItemId`, `FolderRef`, `FileDescriptor`
//! - **Store seam**: the `DocumentStore` trait implemented by the REST client
//!   and by in-memory stores in tests
//! - **Error Handling**: `StoreError` and its `Result` alias
//!
//! # Example
//!
//! ```rust
//! use docsync_core::{FolderRef, ItemId, ResourceKind};
//!
//! let home = FolderRef::home();
//! assert!(home.is_root);
//! assert_eq!(home.id, ItemId::home());
//!
//! assert_eq!(ResourceKind::from_prefix("theme:"), Some(ResourceKind::Theme));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::DocumentStore;
pub use types::{
    CreatedFile, FileDescriptor, FolderRef, Item, ItemId, ItemType, Member, ResourceKind, Role,
    User,
};
