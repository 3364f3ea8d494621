//! Parsed compilation-database contents.

use std::fmt;
use std::path::{Path, PathBuf};

use cdb_common::{Flag, FlagInterner};

/// One compile command: a source file, its flags and the directory the
/// compiler ran in.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompileRecord {
    /// Interned flags, after the per-file output filter.
    pub flags: Vec<Flag>,
    /// Absolute path of the compiled file.
    pub source_file: PathBuf,
    /// The directory the compiler ran in, separators normalized.
    pub working_directory: PathBuf,
}

/// Everything one parse pass extracted from a database and its extras file.
///
/// `entries` is stably sorted by flag sequence (string order), so records with
/// identical flags are adjacent.
pub struct DatabaseContents {
    /// Records, sorted by flags.
    pub entries: Vec<CompileRecord>,
    /// Lines of the extras file, unresolved.
    pub extra_files: Vec<String>,
    /// Where the extras file is (or would be).
    pub extra_files_source: PathBuf,
    /// Owner of every [`Flag`] in `entries`.
    pub interner: FlagInterner,
}

impl DatabaseContents {
    /// Creates contents with no records.
    pub fn empty(extra_files_source: impl Into<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            extra_files: Vec::new(),
            extra_files_source: extra_files_source.into(),
            interner: FlagInterner::new(),
        }
    }

    /// Resolves a record's flags to strings.
    pub fn flags_of(&self, record: &CompileRecord) -> Vec<String> {
        self.interner.resolve_all(&record.flags)
    }

    /// Returns the record for `file`, if any.
    pub fn record_for(&self, file: &Path) -> Option<&CompileRecord> {
        self.entries.iter().find(|r| r.source_file == file)
    }

    /// Stable-sorts entries by the string order of their flag sequences.
    pub fn sort_entries(&mut self) {
        let interner = &self.interner;
        self.entries
            .sort_by(|lhs, rhs| interner.compare(&lhs.flags, &rhs.flags));
    }
}

impl fmt::Debug for DatabaseContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseContents")
            .field("entries", &self.entries.len())
            .field("extra_files", &self.extra_files)
            .field("extra_files_source", &self.extra_files_source)
            .field("distinct_flags", &self.interner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(contents: &DatabaseContents, flags: &[&str], file: &str) -> CompileRecord {
        CompileRecord {
            flags: flags
                .iter()
                .map(|f| contents.interner.get_or_intern(f))
                .collect(),
            source_file: PathBuf::from(file),
            working_directory: PathBuf::from("/p"),
        }
    }

    #[test]
    fn sort_is_by_string_not_key_order() {
        let mut contents = DatabaseContents::empty("/p/db.json.files");
        // "-b" is interned first and so gets the smaller key.
        let b = record(&contents, &["cc", "-b"], "/p/b.c");
        let a = record(&contents, &["cc", "-a"], "/p/a.c");
        contents.entries = vec![b, a];
        contents.sort_entries();
        let files: Vec<_> = contents
            .entries
            .iter()
            .map(|r| r.source_file.clone())
            .collect();
        assert_eq!(files, vec![PathBuf::from("/p/a.c"), PathBuf::from("/p/b.c")]);
    }

    #[test]
    fn sort_is_stable_for_equal_flags() {
        let mut contents = DatabaseContents::empty("/p/db.json.files");
        let first = record(&contents, &["cc", "-Wall"], "/p/z.c");
        let second = record(&contents, &["cc", "-Wall"], "/p/a.c");
        let shorter = record(&contents, &["cc"], "/p/m.c");
        contents.entries = vec![first, second, shorter];
        contents.sort_entries();
        let files: Vec<_> = contents
            .entries
            .iter()
            .map(|r| r.source_file.to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec!["/p/m.c", "/p/z.c", "/p/a.c"]);
    }

    #[test]
    fn flags_of_resolves_strings() {
        let mut contents = DatabaseContents::empty("/p/db.json.files");
        let r = record(&contents, &["cc", "-O2"], "/p/a.c");
        contents.entries.push(r);
        assert_eq!(contents.flags_of(&contents.entries[0]), vec!["cc", "-O2"]);
        assert!(contents.record_for(Path::new("/p/a.c")).is_some());
        assert!(contents.record_for(Path::new("/p/b.c")).is_none());
    }
}
