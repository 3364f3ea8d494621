//! Read-only toolchain lookup capabilities.
//!
//! The resolver never owns toolchains. It queries a [`ToolchainRegistry`] for
//! the configured compilers and a [`BuildEnvironment`] for the defaults of the
//! enclosing build, both injected by the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::types::{Language, Toolchain, ToolchainId};

/// The set of toolchains known to the host application.
pub trait ToolchainRegistry: Send + Sync {
    /// Returns every registered toolchain, valid or not.
    fn toolchains(&self) -> &[Toolchain];

    /// Returns the first valid toolchain matching `predicate`.
    fn find(&self, predicate: &dyn Fn(&Toolchain) -> bool) -> Option<&Toolchain> {
        self.toolchains()
            .iter()
            .find(|tc| tc.valid && predicate(tc))
    }
}

/// Defaults of the build environment the project is opened in.
pub trait BuildEnvironment: Send + Sync {
    /// The toolchain configured for `language`, if any.
    fn default_toolchain(&self, language: Language) -> Option<&Toolchain>;

    /// The sysroot passed to the code model, if the environment has one.
    fn sysroot(&self) -> Option<&Path> {
        None
    }
}

/// A vector-backed registry that also carries per-language defaults.
///
/// Used by the configuration loader, the command-line driver, and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    toolchains: Vec<Toolchain>,
    defaults: BTreeMap<Language, ToolchainId>,
    sysroot: Option<PathBuf>,
}

impl StaticRegistry {
    /// Creates a registry from a list of toolchains with no defaults.
    pub fn new(toolchains: Vec<Toolchain>) -> Self {
        Self {
            toolchains,
            defaults: BTreeMap::new(),
            sysroot: None,
        }
    }

    /// Sets the default toolchain for a language by id.
    ///
    /// An id that names no registered toolchain leaves the language without a
    /// default.
    pub fn with_default(mut self, language: Language, id: ToolchainId) -> Self {
        self.defaults.insert(language, id);
        self
    }

    /// Sets the environment sysroot.
    pub fn with_sysroot(mut self, sysroot: impl Into<PathBuf>) -> Self {
        self.sysroot = Some(sysroot.into());
        self
    }

    /// Returns the toolchain with the given id.
    pub fn get(&self, id: &ToolchainId) -> Option<&Toolchain> {
        self.toolchains.iter().find(|tc| &tc.id == id)
    }
}

impl ToolchainRegistry for StaticRegistry {
    fn toolchains(&self) -> &[Toolchain] {
        &self.toolchains
    }
}

impl BuildEnvironment for StaticRegistry {
    fn default_toolchain(&self, language: Language) -> Option<&Toolchain> {
        let id = self.defaults.get(&language)?;
        self.get(id)
    }

    fn sysroot(&self) -> Option<&Path> {
        self.sysroot.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolchainFamily;

    fn registry() -> StaticRegistry {
        let mut broken = Toolchain::new("old-gcc", ToolchainFamily::Gcc, Language::C, "/old/gcc");
        broken.valid = false;
        StaticRegistry::new(vec![
            broken,
            Toolchain::new("gcc-c", ToolchainFamily::Gcc, Language::C, "/usr/bin/gcc"),
            Toolchain::new("gcc-cxx", ToolchainFamily::Gcc, Language::Cxx, "/usr/bin/g++"),
        ])
    }

    #[test]
    fn find_skips_invalid() {
        let reg = registry();
        let tc = reg
            .find(&|tc| tc.family == ToolchainFamily::Gcc && tc.language == Language::C)
            .unwrap();
        assert_eq!(tc.id.as_str(), "gcc-c");
    }

    #[test]
    fn defaults_by_language() {
        let reg = registry().with_default(Language::Cxx, ToolchainId::new("gcc-cxx"));
        assert_eq!(
            reg.default_toolchain(Language::Cxx).map(|tc| tc.id.as_str()),
            Some("gcc-cxx")
        );
        assert!(reg.default_toolchain(Language::C).is_none());
    }

    #[test]
    fn unknown_default_id_is_none() {
        let reg = registry().with_default(Language::C, ToolchainId::new("nope"));
        assert!(reg.default_toolchain(Language::C).is_none());
    }

    #[test]
    fn sysroot_roundtrip() {
        let reg = registry().with_sysroot("/opt/sysroot");
        assert_eq!(reg.sysroot(), Some(Path::new("/opt/sysroot")));
        assert!(registry().sysroot().is_none());
    }
}
