//! Byte-level fingerprints for detecting compilation database changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A 128-bit fingerprint of a compilation database's on-disk bytes, computed
/// with XXH3.
///
/// The hash is taken over raw bytes, not over the parsed records, so two files
/// that differ only in whitespace between objects hash differently. It is used
/// solely to decide whether a reparse can skip rebuilding the project model;
/// it is never used as an identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectFileHash([u8; 16]);

impl ProjectFileHash {
    /// Computes the fingerprint of a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Reads a file and fingerprints its contents.
    ///
    /// Returns `None` if the file cannot be read; a missing database has no
    /// fingerprint rather than the fingerprint of an empty buffer.
    pub fn from_file(path: &Path) -> Option<Self> {
        std::fs::read(path).ok().map(|bytes| Self::from_bytes(&bytes))
    }
}

impl fmt::Display for ProjectFileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ProjectFileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectFileHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
