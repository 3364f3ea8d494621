//! Per-record flag processing.
//!
//! Two passes run over a record's arguments. [`filter_from_file_name`] runs at
//! parse time and drops the tokens that name the compilation unit's own input
//! and outputs, so that records differing only in those compare equal and
//! group into one build part. [`analyze_flags`] runs when a build part is
//! created and splits the remaining flags into header search paths, macros,
//! a sysroot and the source kind, keeping only the flags a code model needs.

use std::fmt;
use std::path::{Path, PathBuf};

use cdb_common::path::{absolutize, from_native_separators};
use cdb_toolchain::HostOs;
use serde::{Deserialize, Serialize};

use crate::source_kind::SourceKind;

/// Options whose separate argument names an output of the unit. Both passes
/// drop them along with that argument.
const OUTPUT_OPTIONS: &[&str] = &["-o", "-MF", "-MT", "-MQ"];

/// Options whose argument is a user include directory.
const USER_INCLUDE_OPTIONS: &[&str] = &["-I", "-iquote", "/I"];
/// Options whose argument is a system include directory.
const SYSTEM_INCLUDE_OPTIONS: &[&str] = &["-isystem", "-idirafter", "-imsvc", "/imsvc"];
/// Options whose argument is a framework directory.
const FRAMEWORK_OPTIONS: &[&str] = &["-F", "-iframework"];

/// Drops the tokens that mention the unit's own files.
///
/// A token mentions the unit when its last path component starts with
/// `base_name` followed by a dot (`foo.cpp`, `CMakeFiles/x.dir/foo.cpp.o`,
/// `deps/foo.d`). When such a token is the argument of an output option
/// (`-o`, `-MF`, `-MT`, `-MQ`), the option goes too.
pub fn filter_from_file_name(flags: Vec<String>, base_name: &str) -> Vec<String> {
    if base_name.is_empty() {
        return flags;
    }
    let needle = format!("{base_name}.");
    let mut result: Vec<String> = Vec::with_capacity(flags.len());
    for flag in flags {
        let last_component = flag.rsplit(['/', '\\']).next().unwrap_or(&flag);
        if last_component.starts_with(&needle) {
            if result
                .last()
                .is_some_and(|prev| OUTPUT_OPTIONS.contains(&prev.as_str()))
            {
                result.pop();
            }
            continue;
        }
        result.push(flag);
    }
    result
}

/// What kind of directory a header search path is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPathKind {
    /// `-I`, `-iquote`, `/I`.
    User,
    /// `-isystem`, `-idirafter`, `-imsvc`.
    System,
    /// `-F`, `-iframework`.
    Framework,
}

/// One header search path, in command-line order.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HeaderPath {
    /// Absolute directory.
    pub path: PathBuf,
    /// How the directory was passed.
    pub kind: HeaderPathKind,
}

/// Whether a macro is defined or undefined.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroKind {
    /// `-D`.
    Define,
    /// `-U`.
    Undefine,
}

/// A macro from `-D`/`-U`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Macro {
    /// The macro name.
    pub key: String,
    /// The value; `1` for a define given without `=`, empty for an undefine.
    pub value: String,
    /// Define or undefine.
    pub kind: MacroKind,
}

impl Macro {
    fn parse(text: &str, kind: MacroKind) -> Self {
        let (key, value) = match text.split_once('=') {
            Some((key, value)) => (key, value),
            None if kind == MacroKind::Define => (text, "1"),
            None => (text, ""),
        };
        Self {
            key: key.to_string(),
            value: value.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MacroKind::Define => write!(f, "#define {} {}", self.key, self.value),
            MacroKind::Undefine => write!(f, "#undef {}", self.key),
        }
    }
}

/// The result of [`analyze_flags`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagAnalysis {
    /// Flags left after removing the compiler, outputs, warnings, optimization
    /// levels, include paths, macros and MSVC switches.
    pub flags: Vec<String>,
    /// Header search paths in command-line order.
    pub header_paths: Vec<HeaderPath>,
    /// Macros in command-line order.
    pub macros: Vec<Macro>,
    /// The source kind from `-x`, `-std=`, `/TC`, `/TP`, else from the
    /// extension.
    pub kind: SourceKind,
    /// The first `--sysroot=` seen.
    pub sysroot: Option<PathBuf>,
}

enum Pending {
    HeaderPath(HeaderPathKind),
    Macro(MacroKind),
    Language,
    Skip,
}

/// Splits a record's flags into the pieces a code model consumes.
///
/// `file` is the record's source file and `working_dir` its directory;
/// relative include directories and sysroots are resolved against the latter.
pub fn analyze_flags(
    file: &Path,
    working_dir: &Path,
    flags: &[String],
    host: HostOs,
) -> FlagAnalysis {
    let mut analysis = FlagAnalysis::default();
    let mut iter = flags.iter();

    // The leading token is the compiler unless it already looks like an option.
    if let Some(first) = flags.first() {
        let is_option = first.starts_with('-') || (host.is_windows() && first.starts_with('/'));
        if !is_option {
            iter.next();
        }
    }

    let mut pending: Option<Pending> = None;
    for flag in iter {
        if let Some(p) = pending.take() {
            match p {
                Pending::HeaderPath(kind) => analysis.header_paths.push(HeaderPath {
                    path: resolve_dir(flag, working_dir),
                    kind,
                }),
                Pending::Macro(kind) => analysis.macros.push(Macro::parse(flag, kind)),
                Pending::Language => {
                    if analysis.kind == SourceKind::Unclassified {
                        analysis.kind = SourceKind::from_language_flag(flag, file);
                    }
                    analysis.flags.push(flag.clone());
                }
                Pending::Skip => {}
            }
            continue;
        }

        let flag_str = flag.as_str();

        if OUTPUT_OPTIONS.contains(&flag_str) {
            pending = Some(Pending::Skip);
            continue;
        }
        if is_dropped_option(flag_str) {
            continue;
        }
        if flag_str == "-x" {
            pending = Some(Pending::Language);
            analysis.flags.push(flag.clone());
            continue;
        }

        let slash_ok = !flag_str.starts_with('/') || is_msvc_switch(flag_str, host);

        if let Some((kind, path)) = joined_header_path(flag_str).filter(|_| slash_ok) {
            analysis.header_paths.push(HeaderPath {
                path: resolve_dir(path, working_dir),
                kind,
            });
            continue;
        }
        if let Some(kind) = separate_header_path(flag_str) {
            pending = Some(Pending::HeaderPath(kind));
            continue;
        }

        if let Some(kind) = macro_option(flag_str).filter(|_| slash_ok) {
            if flag_str.len() == 2 {
                pending = Some(Pending::Macro(kind));
            } else {
                analysis.macros.push(Macro::parse(&flag_str[2..], kind));
            }
            continue;
        }

        if let Some(sysroot) = flag_str.strip_prefix("--sysroot=") {
            if analysis.sysroot.is_none() {
                analysis.sysroot = Some(resolve_dir(sysroot, working_dir));
            }
            continue;
        }

        if analysis.kind == SourceKind::Unclassified {
            analysis.kind = kind_from_flag(flag_str, file);
        }

        if is_msvc_switch(flag_str, host) && !flag_str.starts_with("/Z") {
            continue;
        }
        analysis.flags.push(flag.clone());
    }

    if analysis.kind == SourceKind::Unclassified {
        analysis.kind = SourceKind::classify(file);
    }
    analysis
}

fn is_dropped_option(flag: &str) -> bool {
    flag == "-c"
        || flag == "-pedantic"
        || flag.starts_with("-O")
        || flag.starts_with("-W")
        || flag.starts_with("-w")
        || flag.eq_ignore_ascii_case("-fpic")
        || flag.eq_ignore_ascii_case("-fpie")
}

fn joined_header_path(flag: &str) -> Option<(HeaderPathKind, &str)> {
    let groups = [
        (USER_INCLUDE_OPTIONS, HeaderPathKind::User),
        (SYSTEM_INCLUDE_OPTIONS, HeaderPathKind::System),
        (FRAMEWORK_OPTIONS, HeaderPathKind::Framework),
    ];
    // Longest option first, so `-isystem/x` is not read as `-i` + `system/x`.
    let mut best: Option<(usize, HeaderPathKind)> = None;
    for (options, kind) in groups {
        for opt in options {
            if flag.len() > opt.len()
                && flag.starts_with(opt)
                && best.map_or(true, |(len, _)| opt.len() > len)
            {
                best = Some((opt.len(), kind));
            }
        }
    }
    best.map(|(len, kind)| (kind, &flag[len..]))
}

fn separate_header_path(flag: &str) -> Option<HeaderPathKind> {
    if USER_INCLUDE_OPTIONS.contains(&flag) {
        Some(HeaderPathKind::User)
    } else if SYSTEM_INCLUDE_OPTIONS.contains(&flag) {
        Some(HeaderPathKind::System)
    } else if FRAMEWORK_OPTIONS.contains(&flag) {
        Some(HeaderPathKind::Framework)
    } else {
        None
    }
}

fn macro_option(flag: &str) -> Option<MacroKind> {
    match flag.get(..2)? {
        "-D" | "/D" => Some(MacroKind::Define),
        "-U" | "/U" => Some(MacroKind::Undefine),
        _ => None,
    }
}

fn kind_from_flag(flag: &str, file: &Path) -> SourceKind {
    match flag {
        "/TC" => return SourceKind::CSource,
        "/TP" => return SourceKind::CxxSource,
        _ => {}
    }
    let Some(std) = flag
        .strip_prefix("-std=")
        .or_else(|| flag.strip_prefix("/std:"))
    else {
        return SourceKind::Unclassified;
    };
    let cxx = std.contains("c++") || std.contains("gnu++");
    let header = SourceKind::classify(file).is_header();
    match (cxx, header) {
        (true, true) => SourceKind::CxxHeader,
        (true, false) => SourceKind::CxxSource,
        (false, true) => SourceKind::CHeader,
        (false, false) => SourceKind::CSource,
    }
}

/// An MSVC-style `/switch`. On Unix hosts an absolute path also starts with
/// `/`, so there only single-segment tokens count.
fn is_msvc_switch(flag: &str, host: HostOs) -> bool {
    match flag.strip_prefix('/') {
        Some(rest) => host.is_windows() || !rest.contains('/'),
        None => false,
    }
}

fn resolve_dir(path: &str, working_dir: &Path) -> PathBuf {
    absolutize(Path::new(&from_native_separators(path)), working_dir)
}
