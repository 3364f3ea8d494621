//! `cdb ingest`: runs one ingestion pass.
//!
//! 1. Resolve settings from `cdb.toml` and the command-line overrides
//! 2. Run the coordinator once on a Tokio runtime
//! 3. Print the tree and build parts (text) or the whole project (JSON)
//! 4. Render diagnostics to stderr

use cdb_diagnostics::{DiagnosticRenderer, Severity, SeverityCounts, TerminalRenderer};
use cdb_project::{IngestionCoordinator, Project, ReparseOutcome};

use crate::pipeline::resolve_setup;
use crate::report::{render_parts, render_tree};
use crate::{GlobalArgs, IngestArgs, ReportFormat};

/// Runs the `cdb ingest` command.
///
/// Returns exit code 0 if the pass reported no errors, 1 otherwise.
pub fn run(args: &IngestArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let setup = resolve_setup(args, global, &cwd)?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Ingesting {}", setup.settings.database.display());
    }

    let registry = setup.registry;
    let mut coordinator =
        IngestionCoordinator::new(setup.settings, registry.clone(), registry).with_host(setup.host);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(coordinator.reparse());

    let project = match outcome {
        ReparseOutcome::Success(project) => project,
        ReparseOutcome::Cached(hash) => {
            tracing::debug!(%hash, "unexpected cached outcome on a first pass");
            return Ok(0);
        }
        ReparseOutcome::Cancelled => return Err("ingestion was cancelled".into()),
    };

    match args.format {
        ReportFormat::Text => print_text(&project, global),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&*project)?;
            println!("{json}");
        }
    }

    let counts = SeverityCounts::of(&project.diagnostics);
    Ok(if counts.has_errors() { 1 } else { 0 })
}

fn print_text(project: &Project, global: &GlobalArgs) {
    print!("{}", render_tree(&project.root));
    println!();
    print!("{}", render_parts(&project.build));

    let renderer = TerminalRenderer::new(global.color);
    for diag in &project.diagnostics {
        if global.quiet && diag.severity != Severity::Error {
            continue;
        }
        eprint!("{}", renderer.render(diag));
    }

    if !global.quiet {
        let counts = SeverityCounts::of(&project.diagnostics);
        eprintln!(
            "   Result: {} part(s), {} file(s), {} error(s), {} warning(s)",
            project.build.parts.len(),
            project.build.file_count(),
            counts.errors,
            counts.warnings
        );
    }
}
