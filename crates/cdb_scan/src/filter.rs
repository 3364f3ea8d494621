//! Decides which scanned files are dropped.

use std::path::{Path, PathBuf};

use crate::mime::{is_well_known_binary, mime_name, MimeBinaryCache};

/// Suffix of the per-user settings file kept next to a database.
const USER_FILE_SUFFIX: &str = ".user";

/// The ignore rules of one scan.
///
/// Checks run cheapest first: the `.user` sibling, then extensions, and only
/// then a MIME probe whose verdict is memoized per MIME name.
#[derive(Clone, Debug)]
pub struct ScanFilter {
    user_file_prefix: String,
    extra_binary_extensions: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl ScanFilter {
    /// Creates the filter for a project whose database is `database`.
    pub fn new(database: &Path) -> Self {
        let mut user_file_prefix = database.to_string_lossy().into_owned();
        user_file_prefix.push_str(USER_FILE_SUFFIX);
        Self {
            user_file_prefix,
            extra_binary_extensions: Vec::new(),
            exclude_dirs: Vec::new(),
        }
    }

    /// Adds extensions that are treated as binary without probing.
    pub fn with_extra_binary_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extra_binary_extensions = extensions;
        self
    }

    /// Sets directory names that are not descended into.
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    /// Returns `true` if a directory with this name is skipped entirely.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }

    /// Returns `true` if the file is dropped from the scan.
    pub fn is_ignored(&self, path: &Path, cache: &mut MimeBinaryCache) -> bool {
        if path.to_string_lossy().starts_with(&self.user_file_prefix) {
            return true;
        }
        if is_well_known_binary(path, &self.extra_binary_extensions) {
            return true;
        }
        cache.is_binary(&mime_name(path))
    }

    /// The prefix a path must not start with; the `.user` sibling and its
    /// backups share it.
    pub fn user_file(&self) -> PathBuf {
        PathBuf::from(&self.user_file_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_sibling_is_ignored() {
        let filter = ScanFilter::new(Path::new("/p/compile_commands.json"));
        let mut cache = MimeBinaryCache::new();
        assert!(filter.is_ignored(Path::new("/p/compile_commands.json.user"), &mut cache));
        assert!(filter.is_ignored(
            Path::new("/p/compile_commands.json.user.4a1b2c"),
            &mut cache
        ));
        assert!(!filter.is_ignored(Path::new("/p/compile_commands.json"), &mut cache));
        assert_eq!(filter.user_file(), PathBuf::from("/p/compile_commands.json.user"));
    }

    #[test]
    fn binaries_are_ignored_without_probing() {
        let filter = ScanFilter::new(Path::new("/p/db.json"))
            .with_extra_binary_extensions(vec!["bin".to_string()]);
        let mut cache = MimeBinaryCache::new();
        assert!(filter.is_ignored(Path::new("/p/a.o"), &mut cache));
        assert!(filter.is_ignored(Path::new("/p/fw.bin"), &mut cache));
        assert!(cache.is_empty());
    }

    #[test]
    fn mime_verdicts_are_cached() {
        let filter = ScanFilter::new(Path::new("/p/db.json"));
        let mut cache = MimeBinaryCache::new();
        assert!(!filter.is_ignored(Path::new("/nonexistent/a.cpp"), &mut cache));
        assert!(!filter.is_ignored(Path::new("/nonexistent/b.cpp"), &mut cache));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("text/x-c++src"), Some(false));
    }

    #[test]
    fn excluded_dirs() {
        let filter =
            ScanFilter::new(Path::new("/p/db.json")).with_exclude_dirs(vec![".git".to_string()]);
        assert!(filter.is_excluded_dir(".git"));
        assert!(!filter.is_excluded_dir("src"));
    }
}
