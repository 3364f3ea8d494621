//! Brace-matching record extraction.
//!
//! The database is never parsed as one JSON document. Instead the parser
//! takes the slice from the next `{` to the next `}` and tries to decode it as
//! a single record. Failures are handled by the kind of error:
//!
//! - the slice ended early (a `}` inside a string or a nested object): extend
//!   the slice to the following `}` and retry;
//! - anything else (broken syntax, the wrong shape, or no `}` left to extend
//!   to): report it and restart at the next `{` after the slice's start. A
//!   record cut off mid-array still spans into its successor, so restarting
//!   after the slice would lose that successor.
//!
//! A malformed record between two valid ones therefore costs only itself.

use std::path::{Path, PathBuf};

use cdb_common::path::{
    base_name, canonicalize_or_keep, from_native_separators, normalize_lexically,
};
use cdb_common::FlagInterner;
use cdb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::Deserialize;

use crate::command_line::split_command_line;
use crate::extras::{extras_path, read_extra_files};
use crate::flags::filter_from_file_name;
use crate::records::{CompileRecord, DatabaseContents};

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    directory: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
    #[serde(default)]
    command: Option<String>,
}

/// Reads and parses a database file, then its extras file.
///
/// An unreadable database is reported as `P003` and yields empty contents;
/// the extras file is still read.
pub fn parse_database(
    database: &Path,
    extras_suffix: &str,
    sink: &DiagnosticSink,
) -> DatabaseContents {
    match std::fs::read(database) {
        Ok(bytes) => parse_contents(&bytes, database, extras_suffix, sink),
        Err(err) => {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::DATABASE_UNREADABLE,
                    format!("cannot read the compilation database: {err}"),
                )
                .with_subject(database)
                .with_note("the project is shown without build information"),
            );
            parse_contents(&[], database, extras_suffix, sink)
        }
    }
}

/// Parses database bytes already read from `database`, loads the extras file
/// next to it, and sorts the records by flags.
pub fn parse_contents(
    bytes: &[u8],
    database: &Path,
    extras_suffix: &str,
    sink: &DiagnosticSink,
) -> DatabaseContents {
    let mut contents = DatabaseContents::empty(extras_path(database, extras_suffix));
    contents.entries = parse_records(bytes, database, &contents.interner, sink);
    contents.extra_files = read_extra_files(&contents.extra_files_source);
    contents.sort_entries();
    tracing::debug!(
        database = %database.display(),
        records = contents.entries.len(),
        distinct_flags = contents.interner.len(),
        extra_files = contents.extra_files.len(),
        "parsed compilation database"
    );
    contents
}

/// Extracts every decodable record from `bytes`, in file order.
///
/// `source` is only used as the subject of diagnostics.
pub fn parse_records(
    bytes: &[u8],
    source: &Path,
    interner: &FlagInterner,
    sink: &DiagnosticSink,
) -> Vec<CompileRecord> {
    let mut records = Vec::new();
    let mut start = find_byte(bytes, b'{', 0);
    let mut end = start.and_then(|s| find_byte(bytes, b'}', s + 1));

    while let (Some(s), Some(e)) = (start, end) {
        match serde_json::from_slice::<RawRecord>(&bytes[s..=e]) {
            Ok(raw) => {
                if let Some(record) = make_record(raw, interner, source, s, sink) {
                    records.push(record);
                }
                start = find_byte(bytes, b'{', e + 1);
            }
            Err(err) if err.is_eof() => {
                if let Some(next) = find_byte(bytes, b'}', e + 1) {
                    end = Some(next);
                    continue;
                }
                report_malformed(source, s, &err, sink);
                start = find_byte(bytes, b'{', s + 1);
            }
            Err(err) => {
                report_malformed(source, s, &err, sink);
                start = find_byte(bytes, b'{', s + 1);
            }
        }
        end = start.and_then(|s| find_byte(bytes, b'}', s + 1));
    }
    records
}

fn make_record(
    raw: RawRecord,
    interner: &FlagInterner,
    source: &Path,
    offset: usize,
    sink: &DiagnosticSink,
) -> Option<CompileRecord> {
    let file = raw.file.unwrap_or_default();
    if file.is_empty() {
        tracing::debug!(offset, "record without a file");
        sink.emit(
            Diagnostic::note(
                DiagnosticCode::RECORD_WITHOUT_FILE,
                format!("skipped the record at byte {offset}: it has no `file`"),
            )
            .with_subject(source),
        );
        return None;
    }

    let working_directory = PathBuf::from(from_native_separators(
        raw.directory.as_deref().unwrap_or_default(),
    ));
    let file = PathBuf::from(from_native_separators(&file));
    let source_file = if file.is_absolute() {
        normalize_lexically(&file)
    } else {
        canonicalize_or_keep(&working_directory.join(&file))
    };

    let arguments = raw.arguments.unwrap_or_default();
    let tokens = if arguments.is_empty() {
        split_command_line(raw.command.as_deref().unwrap_or_default())
    } else {
        arguments
    };
    let tokens = filter_from_file_name(tokens, &base_name(&source_file));
    let flags = tokens.iter().map(|t| interner.get_or_intern(t)).collect();

    Some(CompileRecord {
        flags,
        source_file,
        working_directory,
    })
}

fn report_malformed(source: &Path, offset: usize, err: &serde_json::Error, sink: &DiagnosticSink) {
    tracing::debug!(offset, %err, "skipping malformed record");
    sink.emit(
        Diagnostic::note(
            DiagnosticCode::MALFORMED_RECORD,
            format!("skipped a malformed record at byte {offset}"),
        )
        .with_subject(source)
        .with_note(err.to_string()),
    );
}

fn find_byte(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| i + from)
}
