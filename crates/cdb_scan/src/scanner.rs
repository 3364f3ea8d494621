//! The directory walk.

use std::path::{Path, PathBuf};

use cdb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::file_type::FileType;
use crate::filter::ScanFilter;
use crate::mime::MimeBinaryCache;

/// A file that survived the filter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ScannedFile {
    /// Path below the scan root.
    pub path: PathBuf,
    /// Classification by name.
    pub file_type: FileType,
}

/// A finished scan: its files and the MIME cache handed back
/// to the caller.
#[derive(Debug)]
pub struct ScanResult {
    /// Files in walk order (sorted by file name at each level).
    pub files: Vec<ScannedFile>,
    /// The cache, including verdicts learned during this scan.
    pub cache: MimeBinaryCache,
}

/// Walks `root` and returns every file the filter keeps.
///
/// `cancel` is checked before each entry; on cancellation the partial file
/// list and the cache are dropped. Symlinks are not followed. Unreadable
/// entries are reported as `S002` and skipped; a missing root is reported as
/// `S001` and returned as an error that carries the cache back.
pub fn scan_tree(
    root: &Path,
    filter: &ScanFilter,
    mut cache: MimeBinaryCache,
    cancel: &CancellationToken,
    sink: &DiagnosticSink,
) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        let path = root.to_path_buf();
        let err = if root.exists() {
            ScanError::NotADirectory { path, cache }
        } else {
            ScanError::RootMissing { path, cache }
        };
        sink.emit(
            Diagnostic::warning(DiagnosticCode::SCAN_ROOT_MISSING, err.to_string())
                .with_subject(root)
                .with_note("only files named by the database are shown"),
        );
        return Err(err);
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !filter.is_excluded_dir(&entry.file_name().to_string_lossy())
        });

    let mut files = Vec::new();
    for entry in walker {
        if cancel.is_cancelled() {
            tracing::debug!(root = %root.display(), scanned = files.len(), "scan cancelled");
            return Err(ScanError::Cancelled);
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let mut diag =
                    Diagnostic::note(DiagnosticCode::SCAN_ENTRY_UNREADABLE, err.to_string());
                if let Some(path) = err.path() {
                    diag = diag.with_subject(path);
                }
                sink.emit(diag);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if filter.is_ignored(path, &mut cache) {
            tracing::trace!(path = %path.display(), "ignored");
            continue;
        }
        files.push(ScannedFile {
            path: path.to_path_buf(),
            file_type: FileType::of_scanned(path),
        });
    }

    tracing::debug!(
        root = %root.display(),
        files = files.len(),
        mime_verdicts = cache.len(),
        "scan finished"
    );
    Ok(ScanResult { files, cache })
}
