//! Classification of scanned files.

use std::path::Path;

use cdb_parser::SourceKind;
use serde::{Deserialize, Serialize};

/// File names that describe a build rather than being part of one.
const PROJECT_FILE_NAMES: &[&str] = &[
    "CMakeLists.txt",
    "Makefile",
    "GNUmakefile",
    "meson.build",
    "BUILD",
    "BUILD.bazel",
    "compile_commands.json",
];

/// Extensions of build description files.
const PROJECT_EXTENSIONS: &[&str] = &["cmake", "pro", "pri", "qbs", "gn", "gni", "mk"];

/// What a file in the project tree is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// A C-family header.
    Header,
    /// A C-family source file.
    Source,
    /// A build description: the database itself, its extras file, a
    /// `CMakeLists.txt`.
    Project,
    /// Anything else.
    Unknown,
}

impl FileType {
    /// Classifies a scanned file by its name.
    pub fn of_scanned(path: &Path) -> FileType {
        let kind = SourceKind::classify(path);
        if kind.is_header() {
            return FileType::Header;
        }
        if kind.is_source() {
            return FileType::Source;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if PROJECT_FILE_NAMES.contains(&name) || PROJECT_EXTENSIONS.contains(&ext) {
            return FileType::Project;
        }
        FileType::Unknown
    }

    /// Classifies a file named by a compile record or the extras list: a
    /// header if it looks like one, otherwise a source.
    pub fn of_part_file(path: &Path) -> FileType {
        if SourceKind::classify(path).is_header() {
            FileType::Header
        } else {
            FileType::Source
        }
    }
}
