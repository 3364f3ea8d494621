//! Build parts, the project tree, and the ingestion coordinator.
//!
//! This crate joins the parser and the scanner. [`build_parts`] groups sorted
//! compile records into [`BuildPart`]s and resolves their toolchains,
//! [`build_tree`] merges the parts with the scanned files into a
//! [`FolderNode`] tree, and [`IngestionCoordinator`] runs the whole pass
//! asynchronously, with cancellation and change detection.

#![warn(missing_docs)]

pub mod build_part;
pub mod coordinator;
pub mod error;
pub mod settings;
pub mod tree;
pub mod tree_builder;

pub use cdb_scan::FileType;

pub use build_part::{build_parts, BuildDescription, BuildPart, CompilerFlags};
pub use coordinator::{CoordinatorState, IngestionCoordinator, Project, ReparseOutcome};
pub use error::IngestError;
pub use settings::{ProjectSettings, ScanSettings};
pub use tree::{FileNode, FolderNode, Node};
pub use tree_builder::{build_tree, TreeInputs};
