//! Cancellable filesystem scanning for project trees.
//!
//! [`scan_tree`] walks a root directory on the calling thread, drops files the
//! [`ScanFilter`] ignores (the database's `.user` sibling, well-known binaries,
//! and files whose MIME type is binary), and classifies the rest by
//! [`FileType`]. The MIME verdicts are memoized in a [`MimeBinaryCache`] that
//! the caller moves in and receives back, so it survives across scans.

#![warn(missing_docs)]

pub mod error;
pub mod file_type;
pub mod filter;
pub mod mime;
pub mod scanner;

pub use error::ScanError;
pub use file_type::FileType;
pub use filter::ScanFilter;
pub use mime::MimeBinaryCache;
pub use scanner::{scan_tree, ScanResult, ScannedFile};
