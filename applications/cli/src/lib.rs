//! docsync CLI
//!
//! Configuration, errors and command handlers behind the `docsync` binary.

pub mod commands;
pub mod config;
pub mod error;

pub use config::{CliConfig, CredentialOverrides};
pub use error::{CliError, Result};
