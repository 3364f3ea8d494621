//! What one project ingests and how.

use std::path::{Path, PathBuf};

use cdb_parser::DEFAULT_EXTRAS_SUFFIX;

use crate::error::IngestError;

/// Scanner settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanSettings {
    /// Whether the root directory is scanned at all.
    pub enabled: bool,
    /// Extensions treated as binary in addition to the built-in list.
    pub extra_binary_extensions: Vec<String>,
    /// Directory names that are not descended into.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_binary_extensions: Vec::new(),
            exclude_dirs: vec![".git".to_string()],
        }
    }
}

/// Settings of one project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSettings {
    /// The compilation database.
    pub database: PathBuf,
    /// The declared project root; the database's directory unless overridden.
    pub root: PathBuf,
    /// Suffix of the extras file.
    pub extras_suffix: String,
    /// Skip rebuilding when the database bytes are unchanged.
    pub skip_unchanged: bool,
    /// Scanner settings.
    pub scan: ScanSettings,
}

impl ProjectSettings {
    /// Default settings for a database, rooted at its directory.
    pub fn new(database: impl Into<PathBuf>) -> Self {
        let database = database.into();
        let root = database
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            database,
            root,
            extras_suffix: DEFAULT_EXTRAS_SUFFIX.to_string(),
            skip_unchanged: true,
            scan: ScanSettings::default(),
        }
    }

    /// Overrides the project root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Checks that the database is a file.
    pub fn check(&self) -> Result<(), IngestError> {
        let metadata = std::fs::metadata(&self.database).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                IngestError::DatabaseNotFound {
                    path: self.database.clone(),
                }
            } else {
                IngestError::Io(err)
            }
        })?;
        if metadata.is_dir() {
            return Err(IngestError::DatabaseIsDirectory {
                path: self.database.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_defaults_to_database_dir() {
        let settings = ProjectSettings::new("/p/build/compile_commands.json");
        assert_eq!(settings.root, PathBuf::from("/p/build"));
        assert_eq!(settings.extras_suffix, ".files");
        assert!(settings.skip_unchanged);
        assert!(settings.scan.enabled);
        assert_eq!(settings.scan.exclude_dirs, vec![".git"]);
    }

    #[test]
    fn with_root_overrides() {
        let settings = ProjectSettings::new("/p/build/cc.json").with_root("/p");
        assert_eq!(settings.root, PathBuf::from("/p"));
    }

    #[test]
    fn check_reports_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ProjectSettings::new(dir.path().join("nope.json"));
        assert!(matches!(
            missing.check(),
            Err(IngestError::DatabaseNotFound { .. })
        ));
        let directory = ProjectSettings::new(dir.path());
        assert!(matches!(
            directory.check(),
            Err(IngestError::DatabaseIsDirectory { .. })
        ));
        let file = dir.path().join("cc.json");
        std::fs::write(&file, "[]").unwrap();
        assert!(ProjectSettings::new(&file).check().is_ok());
    }
}
