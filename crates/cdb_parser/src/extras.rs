//! The companion extras file: additional project files, one per line.

use std::path::{Path, PathBuf};

/// Suffix appended to the database file name to locate the extras file.
pub const DEFAULT_EXTRAS_SUFFIX: &str = ".files";

/// Returns the extras file path for a database: its full file name plus
/// `suffix` (`compile_commands.json` → `compile_commands.json.files`).
pub fn extras_path(database: &Path, suffix: &str) -> PathBuf {
    let mut name = database.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Reads the extras file. A missing or unreadable file yields no entries.
pub fn read_extra_files(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_extra_files(&text),
        Err(err) => {
            tracing::trace!(path = %path.display(), %err, "no extras file");
            Vec::new()
        }
    }
}

/// Splits extras text into entries: lines are trimmed, and empty lines and
/// lines starting with `#` are skipped.
pub fn parse_extra_files(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
