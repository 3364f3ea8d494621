//! How much a diagnostic degraded the ingested project, and per-pass tallies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::diagnostic::Diagnostic;

/// The severity level of a diagnostic.
///
/// Ordered by how much of the project model was lost: a `Note` means input was
/// skipped or repaired, an `Error` means a whole part of the model is empty.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A suggestion attached to otherwise clean input.
    Help,
    /// Input that was skipped or repaired, e.g. a malformed record.
    Note,
    /// A degraded result, e.g. a toolchain guessed rather than matched.
    Warning,
    /// A failure that left part of the project model empty.
    Error,
}

impl Severity {
    /// The lowercase name used in rendered and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Help => "help",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// The ANSI SGR color code the terminal renderer uses.
    pub fn ansi_color(self) -> &'static str {
        match self {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
            Severity::Help => "32",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of diagnostics per severity in one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// Error-severity diagnostics.
    pub errors: usize,
    /// Warning-severity diagnostics.
    pub warnings: usize,
    /// Note-severity diagnostics.
    pub notes: usize,
    /// Help-severity diagnostics.
    pub help: usize,
}

impl SeverityCounts {
    /// Tallies a list of diagnostics.
    pub fn of<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        let mut counts = Self::default();
        for diag in diagnostics {
            counts.record(diag.severity);
        }
        counts
    }

    /// Counts one more diagnostic of `severity`.
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Note => self.notes += 1,
            Severity::Help => self.help += 1,
        }
    }

    /// Whether the pass lost part of the project model.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
