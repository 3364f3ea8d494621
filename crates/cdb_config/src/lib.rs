//! Parsing and validation of `cdb.toml` ingestion configuration files.
//!
//! This crate reads the configuration file into a strongly-typed
//! [`CdbConfig`] and resolves it against the file's directory into a
//! [`ResolvedProject`]: absolute paths, the chosen host, and a
//! [`StaticRegistry`](cdb_toolchain::StaticRegistry) holding the configured
//! toolchains and defaults.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_project, ResolvedProject};
pub use types::*;
