//! Plain-text rendering of an ingested project.

use std::fmt::Write;

use cdb_project::{BuildDescription, BuildPart, FolderNode, Node};

/// Renders the tree one node per line, indented by depth. Disabled files are
/// marked with `(unused)`.
pub fn render_tree(root: &FolderNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}/", root.display_name);
    render_children(root, 1, &mut out);
    out
}

fn render_children(folder: &FolderNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (name, node) in &folder.children {
        match node {
            Node::Folder(child) => {
                let _ = writeln!(out, "{indent}{name}/");
                render_children(child, depth + 1, out);
            }
            Node::File(file) => {
                let marker = if file.enabled { "" } else { " (unused)" };
                let _ = writeln!(out, "{indent}{name}{marker}");
            }
        }
    }
}

/// Renders one paragraph per build part.
pub fn render_parts(build: &BuildDescription) -> String {
    let mut out = String::new();
    for (index, part) in build.parts.iter().enumerate() {
        render_part(index, part, &mut out);
    }
    if let Some(sysroot) = &build.sysroot {
        let _ = writeln!(out, "sysroot: {}", sysroot.display());
    }
    out
}

fn render_part(index: usize, part: &BuildPart, out: &mut String) {
    let _ = writeln!(
        out,
        "part {index}: {} ({} file(s))",
        part.display_name,
        part.files.len()
    );
    let flags = [("C", &part.c_flags), ("C++", &part.cxx_flags)];
    for (language, flags) in flags {
        let Some(flags) = flags else {
            continue;
        };
        let toolchain = flags
            .toolchain
            .as_ref()
            .map_or("<none>", |id| id.as_str());
        let _ = writeln!(out, "  {language} toolchain: {toolchain}");
        if !flags.flags.is_empty() {
            let _ = writeln!(out, "  {language} flags: {}", flags.flags.join(" "));
        }
    }
    for header in &part.header_paths {
        let _ = writeln!(out, "  include: {}", header.path.display());
    }
    for def in &part.macros {
        let _ = writeln!(out, "  macro: {def}");
    }
}
