//! The project tree: folders and files keyed by name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cdb_common::path::{file_name_or_path, relative_dirs};
use cdb_scan::FileType;
use serde::Serialize;

/// A node of the project tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A directory, or a synthetic root.
    Folder(FolderNode),
    /// A file.
    File(FileNode),
}

/// A file in the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileNode {
    /// Absolute path.
    pub path: PathBuf,
    /// Classification.
    pub file_type: FileType,
    /// `false` for headers found only by the scanner.
    pub enabled: bool,
}

/// A folder with uniquely named children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FolderNode {
    /// Absolute path of the folder.
    pub path: PathBuf,
    /// Name shown for the folder.
    pub display_name: String,
    /// Children by name.
    pub children: BTreeMap<String, Node>,
}

impl FolderNode {
    /// Creates an empty folder named after the last component of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = file_name_or_path(&path);
        Self::with_display_name(path, display_name)
    }

    /// Creates an empty folder with an explicit display name.
    pub fn with_display_name(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
            children: BTreeMap::new(),
        }
    }

    /// Returns the folder for `folder`, creating the missing chain below
    /// `self`.
    ///
    /// Existing folders are reused, so calling this twice with the same path
    /// yields the same node. Returns `None` when `folder` is not `self.path`
    /// or below it, or when a file already occupies a name on the way.
    pub fn folder_for(&mut self, folder: &Path) -> Option<&mut FolderNode> {
        let dirs = relative_dirs(folder, &self.path)?;
        let mut current = self;
        for dir in dirs {
            let path = current.path.join(&dir);
            let child = current
                .children
                .entry(dir.clone())
                .or_insert_with(|| Node::Folder(FolderNode::with_display_name(path, dir)));
            current = match child {
                Node::Folder(folder) => folder,
                Node::File(_) => return None,
            };
        }
        Some(current)
    }

    /// Inserts a file node under its parent folder, creating the chain.
    ///
    /// A file already present keeps its node. Returns `true` if a node was
    /// inserted.
    pub fn add_file(&mut self, path: &Path, file_type: FileType, enabled: bool) -> bool {
        let Some(parent) = path.parent() else {
            return false;
        };
        let Some(folder) = self.folder_for(parent) else {
            return false;
        };
        let name = file_name_or_path(path);
        if folder.children.contains_key(&name) {
            return false;
        }
        folder.children.insert(
            name,
            Node::File(FileNode {
                path: path.to_path_buf(),
                file_type,
                enabled,
            }),
        );
        true
    }

    /// Adds a direct child. The key is `name`, or the child's full path when
    /// `name` is taken.
    pub fn add_child(&mut self, name: String, node: Node) {
        let key = if self.children.contains_key(&name) {
            node.path().to_string_lossy().into_owned()
        } else {
            name
        };
        self.children.insert(key, node);
    }

    /// Finds the file node for `path` anywhere below this folder.
    pub fn file_node(&self, path: &Path) -> Option<&FileNode> {
        self.files().find(|f| f.path == path)
    }

    /// Iterates over every file below this folder, depth first, in name
    /// order.
    pub fn files(&self) -> impl Iterator<Item = &FileNode> + '_ {
        let mut stack: Vec<&Node> = self.children.values().rev().collect();
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                match node {
                    Node::File(file) => return Some(file),
                    Node::Folder(folder) => stack.extend(folder.children.values().rev()),
                }
            }
            None
        })
    }

    /// Returns the child folder with the given name.
    pub fn child_folder(&self, name: &str) -> Option<&FolderNode> {
        match self.children.get(name)? {
            Node::Folder(folder) => Some(folder),
            Node::File(_) => None,
        }
    }
}

impl Node {
    /// The node's path.
    pub fn path(&self) -> &Path {
        match self {
            Node::Folder(folder) => &folder.path,
            Node::File(file) => &file.path,
        }
    }
}
