//! Shared foundational types for the compilation-database ingestion engine.
//!
//! This crate provides the interned flag representation used by every parsed
//! compile record, the byte-level fingerprint used to detect database changes
//! between reparses, and the path normalization helpers shared by the parser,
//! scanner, and tree builder.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod path;

pub use hash::ProjectFileHash;
pub use ident::{Flag, FlagInterner};
