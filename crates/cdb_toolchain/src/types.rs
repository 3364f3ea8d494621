//! Toolchain identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The source language a toolchain compiles.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C (and C headers).
    C,
    /// C++, also used for Objective-C++ and ambiguous headers.
    Cxx,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cxx => write!(f, "C++"),
        }
    }
}

/// A compiler family. Resolution heuristics classify invocations into one of
/// these and then look for any registered toolchain of the family.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolchainFamily {
    /// GCC on Unix-like hosts.
    Gcc,
    /// GCC-compatible MinGW on Windows-like hosts.
    #[serde(rename = "mingw")]
    MinGw,
    /// Clang with the GCC-style driver.
    Clang,
    /// Clang with the MSVC-compatible `cl` driver.
    ClangCl,
    /// Microsoft's own compiler. Never produced by the name heuristics, only
    /// matched exactly.
    Msvc,
}

impl ToolchainFamily {
    /// Returns `true` for the Clang families, which are tried as a second
    /// chance when no toolchain of the classified family exists.
    pub fn is_clang(self) -> bool {
        matches!(self, ToolchainFamily::Clang | ToolchainFamily::ClangCl)
    }
}

impl fmt::Display for ToolchainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolchainFamily::Gcc => "gcc",
            ToolchainFamily::MinGw => "mingw",
            ToolchainFamily::Clang => "clang",
            ToolchainFamily::ClangCl => "clang-cl",
            ToolchainFamily::Msvc => "msvc",
        };
        f.write_str(name)
    }
}

/// Opaque identifier of a registered toolchain.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolchainId(String);

impl ToolchainId {
    /// Creates an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolchainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered toolchain: one compiler, for one language.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Toolchain {
    /// Registry identifier.
    pub id: ToolchainId,
    /// Compiler family, used by the name heuristics.
    pub family: ToolchainFamily,
    /// The language this toolchain compiles.
    pub language: Language,
    /// Absolute path of the compiler executable.
    pub compiler: PathBuf,
    /// Invalid toolchains (e.g. whose compiler vanished) are never matched.
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl Toolchain {
    /// Creates a valid toolchain.
    pub fn new(
        id: impl Into<String>,
        family: ToolchainFamily,
        language: Language,
        compiler: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: ToolchainId::new(id),
            family,
            language,
            compiler: compiler.into(),
            valid: true,
        }
    }
}

/// The host flavour the heuristics run under.
///
/// Kept as a value rather than read from `cfg!` at each use so the
/// Windows-specific rules can be exercised from any host.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    /// Linux, macOS, and other Unix-like hosts.
    Unix,
    /// Windows-like hosts: `.exe` suffixes, MinGW, `cl`-style drivers.
    Windows,
}

impl HostOs {
    /// Returns the host this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Unix
        }
    }

    /// Returns `true` for [`HostOs::Windows`].
    pub fn is_windows(self) -> bool {
        self == HostOs::Windows
    }
}

impl Default for HostOs {
    fn default() -> Self {
        Self::current()
    }
}
