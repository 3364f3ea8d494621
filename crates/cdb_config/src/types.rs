//! Configuration types deserialized from `cdb.toml`.

use cdb_toolchain::{HostOs, Toolchain};
use serde::Deserialize;

/// The top-level configuration parsed from `cdb.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CdbConfig {
    /// Which database to ingest and how.
    pub project: ProjectSection,
    /// Filesystem scanner settings.
    #[serde(default)]
    pub scan: ScanSection,
    /// Defaults of the build environment.
    #[serde(default)]
    pub environment: EnvironmentSection,
    /// Registered toolchains, searched in file order.
    #[serde(default)]
    pub toolchains: Vec<Toolchain>,
}

/// The `[project]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Path of the compilation database, relative to the configuration file.
    #[serde(default)]
    pub database: String,
    /// Project root override; the database's directory when absent.
    #[serde(default)]
    pub root: Option<String>,
    /// Suffix of the extras file next to the database.
    #[serde(default)]
    pub extras_suffix: Option<String>,
    /// Skip rebuilding when the database bytes are unchanged.
    #[serde(default = "default_true")]
    pub skip_unchanged: bool,
}

/// The `[scan]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanSection {
    /// Whether the root directory is scanned.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Extensions treated as binary in addition to the built-in list.
    #[serde(default)]
    pub extra_binary_extensions: Vec<String>,
    /// Directory names never descended into.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_binary_extensions: Vec::new(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

/// The `[environment]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentSection {
    /// Host conventions to apply; the running host when absent.
    #[serde(default)]
    pub host: Option<HostOs>,
    /// Id of the default C toolchain.
    #[serde(default)]
    pub default_c: Option<String>,
    /// Id of the default C++ toolchain.
    #[serde(default)]
    pub default_cxx: Option<String>,
    /// Sysroot of the environment.
    #[serde(default)]
    pub sysroot: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_exclude_dirs() -> Vec<String> {
    vec![".git".to_string()]
}
