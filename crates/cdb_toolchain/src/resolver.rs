//! Toolchain resolution from a compiler invocation.
//!
//! Resolution walks a fixed chain and stops at the first hit:
//!
//! 1. no compiler token: the environment default for the language;
//! 2. a registered toolchain whose compiler path equals the token;
//! 3. any toolchain of the family guessed from the compiler's file name;
//! 4. for non-Clang guesses, any Clang toolchain (Clang-CL on Windows);
//! 5. the environment default, with a warning.
//!
//! The chain is deterministic: the same token and language always select the
//! same registry entry.

use std::path::{Path, PathBuf};

use cdb_common::path::{from_native_separators, normalize_lexically};
use cdb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::registry::{BuildEnvironment, ToolchainRegistry};
use crate::types::{HostOs, Language, Toolchain, ToolchainFamily};

/// Flag prepended when a Clang-CL toolchain has to drive a GCC-style command line.
pub const DRIVER_MODE_FLAG: &str = "--driver-mode=g++";

/// Which step of the chain produced a [`Resolution`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResolutionStep {
    /// The invocation was empty; the environment default was used.
    EnvironmentDefault,
    /// A registered compiler path matched the invocation exactly.
    ExactMatch,
    /// A toolchain of the family guessed from the file name was found.
    FamilyMatch,
    /// No toolchain of the guessed family existed; a Clang one was substituted.
    ClangFallback,
    /// Nothing matched; the environment default was used.
    DefaultFallback,
}

/// The outcome of resolving one invocation.
#[derive(Clone, Copy, Debug)]
pub struct Resolution<'a> {
    /// The selected toolchain. `None` only when nothing matched and the
    /// environment has no default for the language.
    pub toolchain: Option<&'a Toolchain>,
    /// The step that produced the selection.
    pub step: ResolutionStep,
}

/// Maps compiler invocations to registered toolchains.
pub struct ToolchainResolver<'a> {
    registry: &'a dyn ToolchainRegistry,
    environment: &'a dyn BuildEnvironment,
    host: HostOs,
}

impl<'a> ToolchainResolver<'a> {
    /// Creates a resolver over the given registry and environment.
    pub fn new(
        registry: &'a dyn ToolchainRegistry,
        environment: &'a dyn BuildEnvironment,
        host: HostOs,
    ) -> Self {
        Self {
            registry,
            environment,
            host,
        }
    }

    /// Returns the host flavour the heuristics use.
    pub fn host(&self) -> HostOs {
        self.host
    }

    /// The environment's sysroot, if it has one.
    pub fn sysroot(&self) -> Option<&'a Path> {
        self.environment.sysroot()
    }

    /// Resolves the toolchain for an invocation whose leading argument is
    /// `compiler` (the first flag of the record, usually the compiler path).
    pub fn resolve(
        &self,
        compiler: Option<&str>,
        language: Language,
        sink: &DiagnosticSink,
    ) -> Resolution<'a> {
        let Some(token) = compiler.filter(|c| !c.is_empty()) else {
            return self.environment_default(language, ResolutionStep::EnvironmentDefault, sink);
        };

        let compiler = compiler_path(token, self.host);
        let host = self.host;
        if let Some(tc) = self.registry.find(&|tc| {
            tc.language == language && same_compiler(&tc.compiler, &compiler, host)
        }) {
            tracing::debug!(compiler = %compiler.display(), toolchain = %tc.id, "exact toolchain match");
            return Resolution {
                toolchain: Some(tc),
                step: ResolutionStep::ExactMatch,
            };
        }

        let file_name = compiler
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let family = classify_compiler(&file_name, self.host);
        if let Some(tc) = self.find_family(family, language) {
            tracing::debug!(%family, toolchain = %tc.id, "toolchain matched by family");
            return Resolution {
                toolchain: Some(tc),
                step: ResolutionStep::FamilyMatch,
            };
        }

        if !family.is_clang() {
            let fallback = if self.host.is_windows() {
                ToolchainFamily::ClangCl
            } else {
                ToolchainFamily::Clang
            };
            if let Some(tc) = self.find_family(fallback, language) {
                tracing::debug!(%family, toolchain = %tc.id, "substituting clang toolchain");
                return Resolution {
                    toolchain: Some(tc),
                    step: ResolutionStep::ClangFallback,
                };
            }
        }

        let resolution = self.environment_default(language, ResolutionStep::DefaultFallback, sink);
        if let Some(tc) = resolution.toolchain {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::TOOLCHAIN_DEFAULTED,
                    format!(
                        "no {language} toolchain matches `{}`; using the default `{}`",
                        compiler.display(),
                        tc.id
                    ),
                )
                .with_subject(&compiler),
            );
        }
        resolution
    }

    fn find_family(&self, family: ToolchainFamily, language: Language) -> Option<&'a Toolchain> {
        self.registry
            .find(&|tc| tc.language == language && tc.family == family)
    }

    fn environment_default(
        &self,
        language: Language,
        step: ResolutionStep,
        sink: &DiagnosticSink,
    ) -> Resolution<'a> {
        let toolchain = self.environment.default_toolchain(language);
        if toolchain.is_none() {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::TOOLCHAIN_MISSING,
                    format!("no {language} toolchain is available"),
                )
                .with_help("register a toolchain or configure a default for the environment"),
            );
        }
        Resolution { toolchain, step }
    }
}

/// Guesses a compiler family from an executable's file name.
///
/// Names containing `gcc`, or `g++` but not `clang`, are GCC (MinGW on
/// Windows). On Windows, names ending in `cl` once `.exe` is stripped are
/// Clang-CL. Everything else is Clang.
pub fn classify_compiler(file_name: &str, host: HostOs) -> ToolchainFamily {
    if host.is_windows() {
        let lowered = file_name.to_ascii_lowercase();
        let name = lowered.strip_suffix(".exe").unwrap_or(&lowered);
        if is_gcc_compiler(name) {
            return ToolchainFamily::MinGw;
        }
        if name.ends_with("cl") {
            return ToolchainFamily::ClangCl;
        }
        return ToolchainFamily::Clang;
    }
    if is_gcc_compiler(file_name) {
        return ToolchainFamily::Gcc;
    }
    ToolchainFamily::Clang
}

fn is_gcc_compiler(name: &str) -> bool {
    name.contains("gcc") || (name.contains("g++") && !name.contains("clang"))
}

/// Returns `true` when a Clang-CL toolchain was chosen for an invocation that
/// is not itself a `cl`-style driver, so its flags are GCC-style and need
/// [`DRIVER_MODE_FLAG`].
pub fn needs_driver_mode(toolchain: &Toolchain, first_flag: Option<&str>) -> bool {
    if toolchain.family != ToolchainFamily::ClangCl {
        return false;
    }
    let Some(first) = first_flag.filter(|f| !f.is_empty()) else {
        return false;
    };
    let lowered = first.to_ascii_lowercase();
    !lowered.ends_with("cl") && !lowered.ends_with("cl.exe")
}

/// Turns the leading token of an invocation into a comparable path.
fn compiler_path(token: &str, host: HostOs) -> PathBuf {
    let token = if host.is_windows() {
        long_path_name(token).unwrap_or_else(|| token.to_string())
    } else {
        token.to_string()
    };
    normalize_lexically(Path::new(&from_native_separators(&token)))
}

fn same_compiler(registered: &Path, invoked: &Path, host: HostOs) -> bool {
    if host.is_windows() {
        let a = from_native_separators(&registered.to_string_lossy()).to_ascii_lowercase();
        let b = from_native_separators(&invoked.to_string_lossy()).to_ascii_lowercase();
        return a == b;
    }
    registered == invoked
}

/// Expands 8.3 short names (which CMake sometimes emits) to the long form.
/// Only works for paths that exist.
#[cfg(windows)]
fn long_path_name(path: &str) -> Option<String> {
    use std::ffi::{OsStr, OsString};
    use std::os::windows::ffi::{OsStrExt, OsStringExt};
    use windows_sys::Win32::Storage::FileSystem::GetLongPathNameW;

    let wide: Vec<u16> = OsStr::new(path).encode_wide().chain(Some(0)).collect();
    // SAFETY: `wide` is NUL-terminated; a null buffer with size 0 asks for
    // the required length.
    let needed = unsafe { GetLongPathNameW(wide.as_ptr(), std::ptr::null_mut(), 0) };
    if needed == 0 {
        return None;
    }
    let mut buffer = vec![0u16; needed as usize];
    // SAFETY: `buffer` holds `needed` u16s, as reported by the first call.
    let written = unsafe { GetLongPathNameW(wide.as_ptr(), buffer.as_mut_ptr(), needed) };
    if written == 0 || written >= needed {
        return None;
    }
    buffer.truncate(written as usize);
    Some(OsString::from_wide(&buffer).to_string_lossy().into_owned())
}

#[cfg(not(windows))]
fn long_path_name(_path: &str) -> Option<String> {
    None
}
