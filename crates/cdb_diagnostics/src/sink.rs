//! Diagnostics collected during one ingestion pass.

use std::sync::Mutex;

use crate::code::{Category, DiagnosticCode};
use crate::diagnostic::Diagnostic;
use crate::severity::SeverityCounts;

/// Collects the diagnostics of one pass.
///
/// The parser and the scanner run on separate blocking threads and report into
/// the same sink; the coordinator drains it once both have finished.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.diagnostics.lock().unwrap().push(diag);
    }

    /// Drains the sink, in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock().unwrap())
    }

    /// A snapshot of the collected diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }

    /// How many diagnostics carry `code`.
    pub fn count_code(&self, code: DiagnosticCode) -> usize {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.code == code)
            .count()
    }

    /// How many diagnostics came from `category` (parse, toolchain, ...).
    pub fn count_category(&self, category: Category) -> usize {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.code.category == category)
            .count()
    }

    /// Per-severity tally of what has been collected so far.
    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::of(self.diagnostics.lock().unwrap().iter())
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
