//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Ingestion never fails as a whole: a malformed record, an unmatched
//! toolchain, or an unreadable directory is contained where it happens and
//! reported as a structured [`Diagnostic`]. The thread-safe [`DiagnosticSink`]
//! accumulates them across the concurrent parse and scan tasks, and
//! [`TerminalRenderer`] formats them for the command-line driver.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::{Severity, SeverityCounts};
pub use sink::DiagnosticSink;
