//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
///
/// Each category maps to the ingestion stage that raised it (e.g., `P001` for
/// a skipped database record, `T001` for a toolchain fallback).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Database parsing diagnostics, prefixed with `P`.
    Parse,
    /// Toolchain resolution diagnostics, prefixed with `T`.
    Toolchain,
    /// Filesystem scan diagnostics, prefixed with `S`.
    Scan,
    /// Internal errors, prefixed with `E`.
    Internal,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Parse => 'P',
            Category::Toolchain => 'T',
            Category::Scan => 'S',
            Category::Internal => 'E',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `P001`, `T002`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A database object could not be parsed and was skipped.
    pub const MALFORMED_RECORD: Self = Self::new(Category::Parse, 1);
    /// A database object parsed but named no source file.
    pub const RECORD_WITHOUT_FILE: Self = Self::new(Category::Parse, 2);
    /// The database file exists but could not be read.
    pub const DATABASE_UNREADABLE: Self = Self::new(Category::Parse, 3);
    /// No toolchain matched the compiler; the environment default was used.
    pub const TOOLCHAIN_DEFAULTED: Self = Self::new(Category::Toolchain, 1);
    /// No toolchain matched and the environment has no default either.
    pub const TOOLCHAIN_MISSING: Self = Self::new(Category::Toolchain, 2);
    /// The scan root does not exist or is not a directory.
    pub const SCAN_ROOT_MISSING: Self = Self::new(Category::Scan, 1);
    /// An entry below the scan root could not be read.
    pub const SCAN_ENTRY_UNREADABLE: Self = Self::new(Category::Scan, 2);
    /// A producer task panicked or was aborted unexpectedly.
    pub const TASK_FAILED: Self = Self::new(Category::Internal, 1);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Parse.prefix(), 'P');
        assert_eq!(Category::Toolchain.prefix(), 'T');
        assert_eq!(Category::Scan.prefix(), 'S');
        assert_eq!(Category::Internal.prefix(), 'E');
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::MALFORMED_RECORD), "P001");
        assert_eq!(format!("{}", DiagnosticCode::TOOLCHAIN_MISSING), "T002");
        let code = DiagnosticCode::new(Category::Scan, 42);
        assert_eq!(format!("{code}"), "S042");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::TOOLCHAIN_DEFAULTED;
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
