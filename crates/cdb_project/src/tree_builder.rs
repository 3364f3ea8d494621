//! Merging build parts and scanned files into one tree.
//!
//! Files named by a build part are added enabled. Headers that only the
//! scanner found are added disabled, so they stay visible without being
//! treated as part of the build. Part files outside the declared root but
//! below the part's working directory get a secondary root; when any exists,
//! the roots are wrapped in an umbrella folder.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cdb_common::path::{file_name_or_path, is_child_of};
use cdb_scan::{FileType, ScannedFile};

use crate::build_part::BuildPart;
use crate::tree::{FileNode, FolderNode, Node};

/// Everything one tree build consumes.
#[derive(Clone, Copy, Debug)]
pub struct TreeInputs<'a> {
    /// The declared project root.
    pub root: &'a Path,
    /// The database file; always shown as a project file.
    pub database: &'a Path,
    /// The extras file; shown when it exists.
    pub extras_file: &'a Path,
    /// Parts from [`build_parts`](crate::build_parts).
    pub parts: &'a [BuildPart],
    /// Files found by the scanner, possibly none.
    pub scanned: &'a [ScannedFile],
}

/// Builds the project tree.
pub fn build_tree(inputs: TreeInputs<'_>) -> FolderNode {
    let mut root = FolderNode::new(inputs.root);
    let mut secondary: BTreeMap<PathBuf, FolderNode> = BTreeMap::new();
    let mut outside = 0usize;

    for part in inputs.parts {
        for file in &part.files {
            let file_type = FileType::of_part_file(file);
            if is_child_of(file, inputs.root) {
                root.add_file(file, file_type, true);
            } else if is_child_of(file, &part.target_hint) {
                secondary
                    .entry(part.target_hint.clone())
                    .or_insert_with(|| FolderNode::new(&part.target_hint))
                    .add_file(file, file_type, true);
            } else {
                outside += 1;
                tracing::trace!(file = %file.display(), "file outside every root");
            }
        }
    }

    let mut placeholders = 0usize;
    for scanned in inputs.scanned {
        if scanned.file_type == FileType::Header
            && is_child_of(&scanned.path, inputs.root)
            && root.add_file(&scanned.path, FileType::Header, false)
        {
            placeholders += 1;
        }
    }

    let mut top = if secondary.is_empty() {
        root
    } else {
        let mut umbrella = FolderNode::new(inputs.root);
        umbrella.add_child(root.display_name.clone(), Node::Folder(root));
        for (dir, folder) in secondary {
            umbrella.add_child(dir.to_string_lossy().into_owned(), Node::Folder(folder));
        }
        umbrella
    };

    add_marker(&mut top, inputs.database);
    if inputs.extras_file.is_file() {
        add_marker(&mut top, inputs.extras_file);
    }

    tracing::debug!(
        root = %inputs.root.display(),
        files = top.files().count(),
        placeholders,
        outside,
        "built project tree"
    );
    top
}

fn add_marker(top: &mut FolderNode, path: &Path) {
    top.add_child(
        file_name_or_path(path),
        Node::File(FileNode {
            path: path.to_path_buf(),
            file_type: FileType::Project,
            enabled: true,
        }),
    );
}
