//! Conformance test helpers for the ingestion pipeline.
//!
//! Provides shared functions that run database text through the synchronous
//! half of the pipeline (parse → group → tree) and return structured results
//! for assertion, plus an on-disk [`ProjectFixture`] for tests that drive the
//! asynchronous coordinator.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cdb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, SeverityCounts};
use cdb_parser::{parse_contents, DatabaseContents};
use cdb_project::{
    build_parts, build_tree, BuildDescription, FolderNode, IngestionCoordinator, ProjectSettings,
    TreeInputs,
};
use cdb_toolchain::{
    HostOs, Language, StaticRegistry, Toolchain, ToolchainFamily, ToolchainId, ToolchainResolver,
};
use tempfile::TempDir;

/// Database path used by the in-memory pipeline.
pub const DATABASE: &str = "/proj/build/compile_commands.json";

/// Result of running the synchronous pipeline.
pub struct PipelineResult {
    /// The parsed, sorted database.
    pub contents: DatabaseContents,
    /// Build parts and resolved toolchains.
    pub build: BuildDescription,
    /// The tree, rooted at `/proj`, without scanned files.
    pub tree: FolderNode,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// Number of diagnostics with the given code.
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    /// Every file of every part, sorted, duplicates kept.
    pub fn part_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .build
            .parts
            .iter()
            .flat_map(|p| p.files.iter().cloned())
            .collect();
        files.sort();
        files
    }
}

/// A registry with GCC and Clang for both languages and GCC defaults.
pub fn gcc_and_clang() -> StaticRegistry {
    StaticRegistry::new(vec![
        Toolchain::new("gcc-c", ToolchainFamily::Gcc, Language::C, "/usr/bin/gcc"),
        Toolchain::new("gcc-cxx", ToolchainFamily::Gcc, Language::Cxx, "/usr/bin/g++"),
        Toolchain::new("clang-c", ToolchainFamily::Clang, Language::C, "/usr/bin/clang"),
        Toolchain::new("clang-cxx", ToolchainFamily::Clang, Language::Cxx, "/usr/bin/clang++"),
    ])
    .with_default(Language::C, ToolchainId::new("gcc-c"))
    .with_default(Language::Cxx, ToolchainId::new("gcc-cxx"))
}

/// Formats one database record with an `arguments` array.
pub fn record(directory: &str, file: &str, arguments: &[&str]) -> String {
    serde_json::json!({
        "directory": directory,
        "file": file,
        "arguments": arguments,
    })
    .to_string()
}

/// Joins records into a JSON array.
pub fn database(records: &[String]) -> String {
    format!("[\n{}\n]", records.join(",\n"))
}

/// Runs parse → group → tree on database text with the default registry on
/// a Unix host.
pub fn pipeline(text: &str) -> PipelineResult {
    pipeline_with(text, &gcc_and_clang(), HostOs::Unix)
}

/// Runs parse → group → tree with an explicit registry and host.
pub fn pipeline_with(text: &str, registry: &StaticRegistry, host: HostOs) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let database = Path::new(DATABASE);
    let contents = parse_contents(text.as_bytes(), database, ".files", &sink);
    let resolver = ToolchainResolver::new(registry, registry, host);
    let build = build_parts(database, &contents, &resolver, &sink);
    let tree = build_tree(TreeInputs {
        root: Path::new("/proj"),
        database,
        extras_file: &contents.extra_files_source,
        parts: &build.parts,
        scanned: &[],
    });
    let diagnostics = sink.take_all();
    let warning_count = SeverityCounts::of(&diagnostics).warnings;
    PipelineResult {
        contents,
        build,
        tree,
        diagnostics,
        warning_count,
    }
}

/// A project directory on disk with a database at its root.
pub struct ProjectFixture {
    _dir: TempDir,
    root: PathBuf,
}

impl ProjectFixture {
    /// Creates an empty project directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create a temporary directory");
        // Parsed file paths are canonical; so must the root be.
        let root = dir.path().canonicalize().expect("failed to canonicalize");
        Self { _dir: dir, root }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a project-relative path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// The database path.
    pub fn database(&self) -> PathBuf {
        self.path("compile_commands.json")
    }

    /// Writes a file, creating its directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create directories");
        }
        std::fs::write(&path, content).expect("failed to write fixture file");
        path
    }

    /// Writes the database from records whose `file` values are relative to
    /// the root, running in the root.
    pub fn write_database(&self, files: &[(&str, &[&str])]) -> PathBuf {
        let root = self.root().to_string_lossy().into_owned();
        let records: Vec<String> = files
            .iter()
            .map(|(file, arguments)| record(&root, file, arguments))
            .collect();
        self.write("compile_commands.json", &database(&records))
    }

    /// A coordinator over this project with the default registry on a Unix
    /// host.
    pub fn coordinator(&self) -> IngestionCoordinator {
        let registry = Arc::new(gcc_and_clang());
        IngestionCoordinator::new(
            ProjectSettings::new(self.database()),
            registry.clone(),
            registry,
        )
        .with_host(HostOs::Unix)
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
