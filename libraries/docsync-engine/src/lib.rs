//! docsync Engine
//!
//! Moves folder trees between the local filesystem and a remote document
//! store.
//!
//! # Pipeline
//!
//! 1. **Path**: parse a symbolic path (`site:mySite/images`) into a [`PathSpec`]
//! 2. **Chain**: resolve the root and walk the folder chain, creating missing
//!    folders when asked to ([`FolderChainResolver`])
//! 3. **Tree**: list every file below a remote folder ([`TreeEnumerator`])
//! 4. **Transfer**: move files in bounded batch groups ([`TransferScheduler`])
//!    through the local layout mapper ([`LocalLayout`])
//!
//! [`DocumentSync`] bundles these into one operation per command.
//!
//! # Example
//!
//! ```rust
//! use docsync_engine::PathSpec;
//! use docsync_core::ResourceKind;
//!
//! let spec = PathSpec::parse("site:mySite/images/banner.png").unwrap();
//! assert_eq!(spec.resource(), Some((ResourceKind::Site, "mySite")));
//!
//! let (folder, file) = spec.split_file().unwrap();
//! assert_eq!(folder.describe(), "Sites > mySite > images");
//! assert_eq!(file, "banner.png");
//! ```

#![forbid(unsafe_code)]

pub mod chain;
pub mod error;
pub mod layout;
pub mod ops;
pub mod path;
pub mod scheduler;
pub mod tree;
pub mod types;

pub use chain::{FolderChainResolver, ResolvedChain};
pub use error::{Result, SyncError};
pub use layout::LocalLayout;
pub use ops::DocumentSync;
pub use path::PathSpec;
pub use scheduler::TransferScheduler;
pub use tree::TreeEnumerator;
pub use types::*;
