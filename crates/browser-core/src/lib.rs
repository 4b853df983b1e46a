//! browser-core - Shared functionality for the Infisical secrets browser
//!
//! Paths, configuration, formatting helpers and the secret record model
//! used by the client, the tree builder and the terminal UI.

pub mod config;
pub mod format;
pub mod paths;
pub mod secret;

pub use config::{Config, ConfigError, Region};
pub use paths::Paths;
pub use secret::Secret;
