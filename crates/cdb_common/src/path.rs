//! Path normalization shared by the parser, scanner, and tree builder.
//!
//! Compilation databases are produced on every platform, so paths arrive with
//! either separator and may be relative to a per-entry working directory.
//! Everything downstream compares paths component-wise, so the helpers here
//! bring them to one shape first.

use std::path::{Component, Path, PathBuf};

/// Replaces Windows-style `\` separators with `/`.
pub fn from_native_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Removes `.` components and folds `..` components without touching the
/// filesystem.
///
/// A `..` that would climb above the root is dropped, matching how the
/// filesystem resolves `/..`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolves `path` against `base` when it is relative.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base.join(path))
    }
}

/// Canonicalizes a path, resolving symlinks.
///
/// If canonicalization fails (the file does not exist, a parent is not
/// readable), the lexically normalized path is returned instead.
pub fn canonicalize_or_keep(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| normalize_lexically(path))
}

/// Returns `true` if `path` lies strictly below `dir`.
///
/// An empty `dir` contains nothing, and a directory is not a child of itself.
pub fn is_child_of(path: &Path, dir: &Path) -> bool {
    if dir.as_os_str().is_empty() {
        return false;
    }
    path != dir && path.starts_with(dir)
}

/// Returns the directory names leading from `root` down to `folder`.
///
/// `relative_dirs("/p/src/util", "/p")` is `["src", "util"]`. Returns `None`
/// when `folder` is not `root` or one of its descendants.
pub fn relative_dirs(folder: &Path, root: &Path) -> Option<Vec<String>> {
    let rest = folder.strip_prefix(root).ok()?;
    Some(
        rest.components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect(),
    )
}

/// Returns the final component of a path as a string, or the whole path when
/// it has none (a filesystem root).
pub fn file_name_or_path(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Returns the file name up to its first `.`, like a "base name".
///
/// `base_name("/p/foo.pb.cc")` is `"foo"`.
pub fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.find('.') {
        Some(idx) => name[..idx].to_string(),
        None => name,
    }
}
