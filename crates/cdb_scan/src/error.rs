//! Error types for tree scanning.

use std::path::PathBuf;

use crate::mime::MimeBinaryCache;

/// Why a scan produced no result.
///
/// Problems with individual entries never end a scan; they are reported to
/// the diagnostic sink and the entry is skipped. A scan that never started
/// hands its MIME cache back; a cancelled one drops it.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("scan root {path} does not exist")]
    RootMissing {
        /// The configured root.
        path: PathBuf,
        /// The cache the scan was given, unchanged.
        cache: MimeBinaryCache,
    },

    /// The scan root exists but is not a directory.
    #[error("scan root {path} is not a directory")]
    NotADirectory {
        /// The configured root.
        path: PathBuf,
        /// The cache the scan was given, unchanged.
        cache: MimeBinaryCache,
    },

    /// The scan was cancelled before it finished. Partial results are
    /// discarded.
    #[error("scan cancelled")]
    Cancelled,
}

impl ScanError {
    /// Takes back the MIME cache, if the scan returned it.
    pub fn into_cache(self) -> Option<MimeBinaryCache> {
        match self {
            ScanError::RootMissing { cache, .. } | ScanError::NotADirectory { cache, .. } => {
                Some(cache)
            }
            ScanError::Cancelled => None,
        }
    }
}
