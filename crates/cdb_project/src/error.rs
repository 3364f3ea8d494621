//! Error types for driving an ingestion pass.

use std::path::PathBuf;

/// Errors that stop a pass from being started at all.
///
/// Once a pass runs it cannot fail: per-record, per-path and per-lookup
/// problems become diagnostics. These errors only arise when checking settings
/// up front.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The database file does not exist.
    #[error("compilation database {path} does not exist")]
    DatabaseNotFound {
        /// The configured database path.
        path: PathBuf,
    },

    /// The database path names a directory.
    #[error("compilation database {path} is a directory")]
    DatabaseIsDirectory {
        /// The configured database path.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
