//! Resolving a parsed configuration against the directory it was loaded from.

use std::path::{Path, PathBuf};

use cdb_common::path::absolutize;
use cdb_toolchain::{HostOs, Language, StaticRegistry, ToolchainId};

use crate::error::ConfigError;
use crate::types::{CdbConfig, ScanSection};

/// A configuration with every path made absolute and the toolchains loaded
/// into a registry.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    /// The compilation database.
    pub database: PathBuf,
    /// The project root.
    pub root: PathBuf,
    /// Extras file suffix, if overridden.
    pub extras_suffix: Option<String>,
    /// Whether unchanged databases skip the rebuild.
    pub skip_unchanged: bool,
    /// Scanner settings.
    pub scan: ScanSection,
    /// Host conventions for the toolchain heuristics.
    pub host: HostOs,
    /// Toolchains, defaults, and sysroot.
    pub registry: StaticRegistry,
}

/// Resolves relative paths against `base_dir` (the configuration file's
/// directory) and builds the toolchain registry.
///
/// A missing root defaults to the database's directory.
pub fn resolve_project(config: &CdbConfig, base_dir: &Path) -> Result<ResolvedProject, ConfigError> {
    let database = absolutize(Path::new(&config.project.database), base_dir);
    let root = match &config.project.root {
        Some(root) => absolutize(Path::new(root), base_dir),
        None => database
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "database '{}' has no parent directory",
                    database.display()
                ))
            })?,
    };

    let mut registry = StaticRegistry::new(config.toolchains.clone());
    if let Some(id) = &config.environment.default_c {
        registry = registry.with_default(Language::C, ToolchainId::new(id.as_str()));
    }
    if let Some(id) = &config.environment.default_cxx {
        registry = registry.with_default(Language::Cxx, ToolchainId::new(id.as_str()));
    }
    if let Some(sysroot) = &config.environment.sysroot {
        registry = registry.with_sysroot(absolutize(Path::new(sysroot), base_dir));
    }

    Ok(ResolvedProject {
        database,
        root,
        extras_suffix: config.project.extras_suffix.clone(),
        skip_unchanged: config.project.skip_unchanged,
        scan: config.scan.clone(),
        host: config.environment.host.unwrap_or_default(),
        registry,
    })
}
