//! Tolerant parsing of compilation databases.
//!
//! A compilation database is a JSON array of `{directory, file, arguments |
//! command}` objects, but real-world files are frequently truncated or
//! hand-edited. [`parse_database`] does not parse the array as a whole: it
//! extracts one brace-delimited object at a time and skips the ones that do
//! not parse, so a single bad record costs only itself.
//!
//! # Architecture
//!
//! - **Stream** ([`stream`]): brace-matching record extraction and resync.
//! - **Command line** ([`command_line`]): shell-style splitting of `command`.
//! - **Flags** ([`flags`]): per-file output filtering and the flag analysis
//!   that derives header paths, macros and the source kind.
//! - **Extras** ([`extras`]): the companion `.files` list.

#![warn(missing_docs)]

pub mod command_line;
pub mod extras;
pub mod flags;
pub mod records;
pub mod source_kind;
pub mod stream;

pub use extras::{extras_path, read_extra_files, DEFAULT_EXTRAS_SUFFIX};
pub use flags::{
    analyze_flags, filter_from_file_name, FlagAnalysis, HeaderPath, HeaderPathKind, Macro,
    MacroKind,
};
pub use records::{CompileRecord, DatabaseContents};
pub use source_kind::SourceKind;
pub use stream::{parse_contents, parse_database, parse_records};
