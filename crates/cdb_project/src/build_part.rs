//! Grouping compile records into build parts.
//!
//! Records arrive sorted by flags, so all records sharing a flag sequence are
//! adjacent and one linear pass groups them: a record whose flags equal the
//! previous record's joins the current part, anything else starts a new one.
//! Flag analysis and toolchain resolution run once per part, not per file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use cdb_common::path::{absolutize, file_name_or_path};
use cdb_diagnostics::DiagnosticSink;
use cdb_parser::{analyze_flags, CompileRecord, DatabaseContents, HeaderPath, Macro};
use cdb_toolchain::{
    needs_driver_mode, Language, Toolchain, ToolchainId, ToolchainResolver, DRIVER_MODE_FLAG,
};
use serde::Serialize;

/// The flags of a part for one language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompilerFlags {
    /// The resolved toolchain; `None` when nothing, not even a default, was
    /// available.
    pub toolchain: Option<ToolchainId>,
    /// The analyzed flags, with the driver-mode flag prepended when needed.
    pub flags: Vec<String>,
    /// The directory the compiler ran in.
    pub working_directory: PathBuf,
}

/// A set of files that share one compiler configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildPart {
    /// The database this part came from.
    pub location_hint: PathBuf,
    /// The working directory of the part's first record.
    pub target_hint: PathBuf,
    /// The file name of the part's first file.
    pub display_name: String,
    /// Absolute paths of every file in the part.
    pub files: BTreeSet<PathBuf>,
    /// Header search paths, in command-line order.
    pub header_paths: Vec<HeaderPath>,
    /// Macro definitions and undefinitions, in command-line order.
    pub macros: Vec<Macro>,
    /// Flags for C files, when the part is C.
    pub c_flags: Option<CompilerFlags>,
    /// Flags for C++ files, when the part is anything but plain C.
    pub cxx_flags: Option<CompilerFlags>,
}

/// All parts of a project, with the toolchains chosen for it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildDescription {
    /// Parts in record order, the extras part (if any) last.
    pub parts: Vec<BuildPart>,
    /// The C toolchain, if any part needed one.
    pub c_toolchain: Option<ToolchainId>,
    /// The C++ toolchain, if any part needed one.
    pub cxx_toolchain: Option<ToolchainId>,
    /// The environment's sysroot, else the first `--sysroot=` seen.
    pub sysroot: Option<PathBuf>,
}

impl BuildDescription {
    /// Number of files across all parts.
    pub fn file_count(&self) -> usize {
        self.parts.iter().map(|p| p.files.len()).sum()
    }
}

/// Per-pass toolchain choices. Each language keeps the first toolchain
/// resolved for it; a part whose lookup finds nothing leaves the slot empty,
/// so a later part can still fill it.
#[derive(Default)]
struct ToolchainCache<'a> {
    c: Option<&'a Toolchain>,
    cxx: Option<&'a Toolchain>,
}

impl<'a> ToolchainCache<'a> {
    fn get(
        &mut self,
        language: Language,
        first_flag: Option<&str>,
        resolver: &ToolchainResolver<'a>,
        sink: &DiagnosticSink,
    ) -> Option<&'a Toolchain> {
        let slot = match language {
            Language::C => &mut self.c,
            Language::Cxx => &mut self.cxx,
        };
        if slot.is_none() {
            let resolution = resolver.resolve(first_flag, language, sink);
            tracing::debug!(
                %language,
                toolchain = ?resolution.toolchain.map(|tc| tc.id.as_str()),
                step = ?resolution.step,
                "resolved project toolchain"
            );
            *slot = resolution.toolchain;
        }
        *slot
    }
}

/// Groups the sorted records of `contents` into build parts and appends the
/// extras part.
///
/// `database` is the database file; extras paths are resolved against its
/// directory.
pub fn build_parts(
    database: &Path,
    contents: &DatabaseContents,
    resolver: &ToolchainResolver<'_>,
    sink: &DiagnosticSink,
) -> BuildDescription {
    let mut description = BuildDescription {
        sysroot: resolver.sysroot().map(Path::to_path_buf),
        ..BuildDescription::default()
    };
    let mut cache = ToolchainCache::default();
    let mut previous: Option<&CompileRecord> = None;

    for entry in &contents.entries {
        if let Some(prev) = previous {
            if prev.flags == entry.flags {
                if let Some(part) = description.parts.last_mut() {
                    part.files.insert(entry.source_file.clone());
                }
                continue;
            }
        }
        previous = Some(entry);
        let part = make_part(
            database,
            entry,
            contents,
            resolver,
            &mut cache,
            &mut description,
            sink,
        );
        description.parts.push(part);
    }

    if !contents.extra_files.is_empty() {
        let base = database.parent().unwrap_or(Path::new(""));
        description.parts.push(BuildPart {
            location_hint: database.to_path_buf(),
            display_name: file_name_or_path(&contents.extra_files_source),
            files: contents
                .extra_files
                .iter()
                .map(|extra| absolutize(Path::new(extra), base))
                .collect(),
            ..BuildPart::default()
        });
    }

    description.c_toolchain = cache.c.map(|tc| tc.id.clone());
    description.cxx_toolchain = cache.cxx.map(|tc| tc.id.clone());
    tracing::debug!(
        parts = description.parts.len(),
        files = description.file_count(),
        "grouped build parts"
    );
    description
}

fn make_part<'a>(
    database: &Path,
    entry: &CompileRecord,
    contents: &DatabaseContents,
    resolver: &ToolchainResolver<'a>,
    cache: &mut ToolchainCache<'a>,
    description: &mut BuildDescription,
    sink: &DiagnosticSink,
) -> BuildPart {
    let original = contents.flags_of(entry);
    let analysis = analyze_flags(
        &entry.source_file,
        &entry.working_directory,
        &original,
        resolver.host(),
    );
    if description.sysroot.is_none() {
        description.sysroot = analysis.sysroot.clone();
    }

    let first_flag = original.first().map(String::as_str);
    let language = analysis.kind.language();
    let toolchain = cache.get(language, first_flag, resolver, sink);

    let mut flags = analysis.flags;
    if let Some(tc) = toolchain {
        if needs_driver_mode(tc, first_flag) {
            flags.insert(0, DRIVER_MODE_FLAG.to_string());
        }
    }
    let compiler_flags = CompilerFlags {
        toolchain: toolchain.map(|tc| tc.id.clone()),
        flags,
        working_directory: entry.working_directory.clone(),
    };

    let mut part = BuildPart {
        location_hint: database.to_path_buf(),
        target_hint: entry.working_directory.clone(),
        display_name: file_name_or_path(&entry.source_file),
        files: BTreeSet::from([entry.source_file.clone()]),
        header_paths: analysis.header_paths,
        macros: analysis.macros,
        ..BuildPart::default()
    };
    match language {
        Language::C => part.c_flags = Some(compiler_flags),
        Language::Cxx => part.cxx_flags = Some(compiler_flags),
    }
    part
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdb_diagnostics::DiagnosticCode;
    use cdb_parser::parse_records;
    use cdb_toolchain::{HostOs, StaticRegistry, ToolchainFamily};

    fn contents(json: &str, extras: &[&str]) -> DatabaseContents {
        let mut contents = DatabaseContents::empty("/proj/build/compile_commands.json.files");
        let sink = DiagnosticSink::new();
        contents.entries = parse_records(
            json.as_bytes(),
            Path::new("/proj/build/compile_commands.json"),
            &contents.interner,
            &sink,
        );
        contents.extra_files = extras.iter().map(|s| s.to_string()).collect();
        contents.sort_entries();
        contents
    }

    fn registry() -> StaticRegistry {
        StaticRegistry::new(vec![
            Toolchain::new("gcc-c", ToolchainFamily::Gcc, Language::C, "/usr/bin/gcc"),
            Toolchain::new("gcc-cxx", ToolchainFamily::Gcc, Language::Cxx, "/usr/bin/g++"),
        ])
    }

    fn build(
        contents: &DatabaseContents,
        registry: &StaticRegistry,
        host: HostOs,
    ) -> (BuildDescription, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let resolver = ToolchainResolver::new(registry, registry, host);
        let description = build_parts(
            Path::new("/proj/build/compile_commands.json"),
            contents,
            &resolver,
            &sink,
        );
        (description, sink)
    }

    #[test]
    fn identical_flags_share_a_part() {
        let contents = contents(
            r#"[
  {"directory": "/proj", "file": "/proj/a.cpp", "arguments": ["-Wall"]},
  {"directory": "/proj", "file": "/proj/b.cpp", "arguments": ["-Wall"]}
]"#,
            &[],
        );
        let (description, _) = build(&contents, &registry(), HostOs::Unix);
        assert_eq!(description.parts.len(), 1);
        let files: Vec<_> = description.parts[0].files.iter().cloned().collect();
        assert_eq!(files, vec![PathBuf::from("/proj/a.cpp"), PathBuf::from("/proj/b.cpp")]);
    }

    #[test]
    fn one_part_per_distinct_flag_set() {
        let contents = contents(
            r#"[
  {"directory": "/proj", "file": "/proj/a.c", "arguments": ["/usr/bin/gcc", "-DA", "-c", "a.c"]},
  {"directory": "/proj", "file": "/proj/b.cpp", "arguments": ["/usr/bin/g++", "-c", "b.cpp"]},
  {"directory": "/proj", "file": "/proj/c.c", "arguments": ["/usr/bin/gcc", "-DA", "-c", "c.c"]},
  {"directory": "/proj", "file": "/proj/d.cpp", "arguments": ["/usr/bin/g++", "-DB", "-c", "d.cpp"]}
]"#,
            &[],
        );
        let (description, sink) = build(&contents, &registry(), HostOs::Unix);
        assert_eq!(description.parts.len(), 3);

        let mut all: Vec<PathBuf> = Vec::new();
        for part in &description.parts {
            all.extend(part.files.iter().cloned());
        }
        all.sort();
        let before = all.len();
        all.dedup();
        assert_eq!(before, all.len(), "a file landed in two parts");
        assert_eq!(all.len(), 4);

        assert_eq!(description.c_toolchain.as_ref().map(|t| t.as_str()), Some("gcc-c"));
        assert_eq!(description.cxx_toolchain.as_ref().map(|t| t.as_str()), Some("gcc-cxx"));
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn single_record_without_flags() {
        let contents = contents(r#"{"directory": "/proj/src", "file": "a.cpp"}"#, &[]);
        let registry = registry().with_default(Language::Cxx, ToolchainId::new("gcc-cxx"));
        let (description, _) = build(&contents, &registry, HostOs::Unix);
        assert_eq!(description.parts.len(), 1);
        let part = &description.parts[0];
        assert_eq!(part.files, BTreeSet::from([PathBuf::from("/proj/src/a.cpp")]));
        assert_eq!(part.display_name, "a.cpp");
        assert_eq!(part.target_hint, PathBuf::from("/proj/src"));
        let cxx = part.cxx_flags.as_ref().unwrap();
        assert_eq!(cxx.toolchain.as_ref().map(|t| t.as_str()), Some("gcc-cxx"));
        assert!(cxx.flags.is_empty());
        assert!(part.c_flags.is_none());
    }

    #[test]
    fn part_carries_analysis() {
        let contents = contents(
            r#"{"directory": "/proj/build", "file": "/proj/src/a.c",
                "arguments": ["/usr/bin/gcc", "-I../include", "-DDEBUG=1", "-O2", "-std=c99", "-c", "/proj/src/a.c", "-o", "a.o"]}"#,
            &[],
        );
        let (description, _) = build(&contents, &registry(), HostOs::Unix);
        let part = &description.parts[0];
        assert_eq!(part.header_paths[0].path, PathBuf::from("/proj/include"));
        assert_eq!(part.macros[0].key, "DEBUG");
        let c = part.c_flags.as_ref().unwrap();
        assert_eq!(c.flags, vec!["-std=c99"]);
        assert_eq!(c.toolchain.as_ref().map(|t| t.as_str()), Some("gcc-c"));
        assert_eq!(c.working_directory, PathBuf::from("/proj/build"));
    }

    #[test]
    fn toolchain_is_resolved_once_per_language() {
        let contents = contents(
            r#"[
  {"directory": "/p", "file": "/p/a.cpp", "arguments": ["/opt/xcc/bin/xc++", "-DA"]},
  {"directory": "/p", "file": "/p/b.cpp", "arguments": ["/opt/xcc/bin/xc++", "-DB"]}
]"#,
            &[],
        );
        let registry = StaticRegistry::new(vec![Toolchain::new(
            "msvc-cxx",
            ToolchainFamily::Msvc,
            Language::Cxx,
            "/opt/msvc/cl",
        )])
        .with_default(Language::Cxx, ToolchainId::new("msvc-cxx"));
        let (description, sink) = build(&contents, &registry, HostOs::Unix);
        assert_eq!(description.parts.len(), 2);
        for part in &description.parts {
            let toolchain = part.cxx_flags.as_ref().unwrap().toolchain.as_ref();
            assert_eq!(toolchain.map(|id| id.as_str()), Some("msvc-cxx"));
        }
        assert_eq!(sink.count_code(DiagnosticCode::TOOLCHAIN_DEFAULTED), 1);
    }

    #[test]
    fn unresolved_part_does_not_block_later_ones() {
        let contents = contents(
            r#"[
  {"directory": "/p", "file": "/p/a.cpp", "arguments": ["/opt/icx/bin/icpx", "-DA"]},
  {"directory": "/p", "file": "/p/b.cpp", "arguments": ["/usr/bin/g++", "-DB"]}
]"#,
            &[],
        );
        let registry = StaticRegistry::new(vec![Toolchain::new(
            "gcc-cxx",
            ToolchainFamily::Gcc,
            Language::Cxx,
            "/usr/bin/g++",
        )]);
        let (description, sink) = build(&contents, &registry, HostOs::Unix);
        let toolchain_of = |file: &str| {
            description
                .parts
                .iter()
                .find(|p| p.files.contains(Path::new(file)))
                .and_then(|p| p.cxx_flags.as_ref())
                .and_then(|f| f.toolchain.clone())
        };
        assert_eq!(toolchain_of("/p/a.cpp"), None);
        assert_eq!(toolchain_of("/p/b.cpp"), Some(ToolchainId::new("gcc-cxx")));
        assert_eq!(description.cxx_toolchain, Some(ToolchainId::new("gcc-cxx")));
        assert_eq!(sink.count_code(DiagnosticCode::TOOLCHAIN_MISSING), 1);
    }

    #[test]
    fn clang_cl_with_gcc_style_invocation_gets_driver_mode() {
        let registry = StaticRegistry::new(vec![Toolchain::new(
            "clang-cl-cxx",
            ToolchainFamily::ClangCl,
            Language::Cxx,
            "C:/LLVM/bin/clang-cl.exe",
        )]);
        let contents = contents(
            r#"{"directory": "C:/p", "file": "C:/p/a.cpp", "arguments": ["C:/mingw/bin/g++.exe", "-fno-rtti"]}"#,
            &[],
        );
        let (description, _) = build(&contents, &registry, HostOs::Windows);
        let cxx = description.parts[0].cxx_flags.as_ref().unwrap();
        assert_eq!(cxx.flags, vec![DRIVER_MODE_FLAG, "-fno-rtti"]);
    }

    #[test]
    fn extras_become_a_flagless_part() {
        let contents = contents(
            r#"{"directory": "/proj", "file": "/proj/a.cpp", "arguments": ["-Wall"]}"#,
            &["../README.md", "docs/notes.txt"],
        );
        let (description, _) = build(&contents, &registry(), HostOs::Unix);
        assert_eq!(description.parts.len(), 2);
        let extras = &description.parts[1];
        assert_eq!(
            extras.files,
            BTreeSet::from([
                PathBuf::from("/proj/README.md"),
                PathBuf::from("/proj/build/docs/notes.txt"),
            ])
        );
        assert!(extras.c_flags.is_none() && extras.cxx_flags.is_none());
        assert_eq!(extras.target_hint, PathBuf::new());
    }

    #[test]
    fn environment_sysroot_wins() {
        let contents = contents(
            r#"{"directory": "/p", "file": "/p/a.c", "arguments": ["gcc", "--sysroot=/from/flags"]}"#,
            &[],
        );
        let (description, _) = build(&contents, &registry(), HostOs::Unix);
        assert_eq!(description.sysroot, Some(PathBuf::from("/from/flags")));

        let with_env = registry().with_sysroot("/from/env");
        let (description, _) = build(&contents, &with_env, HostOs::Unix);
        assert_eq!(description.sysroot, Some(PathBuf::from("/from/env")));
    }
}
