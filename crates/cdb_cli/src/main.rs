//! cdb CLI: drives the compilation-database ingestion engine.
//!
//! Provides `cdb ingest` to run one ingestion pass and print the project tree,
//! build parts, and diagnostics, and `cdb hash` to print a database's
//! fingerprint.

#![warn(missing_docs)]

mod hash;
mod ingest;
mod pipeline;
mod report;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// cdb: ingest compilation databases into a project model.
#[derive(Parser, Debug)]
#[command(name = "cdb", version, about = "Compilation database ingestion")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `cdb.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one ingestion pass and print the result.
    Ingest(IngestArgs),
    /// Print the fingerprint of a compilation database.
    Hash {
        /// The database file.
        database: PathBuf,
    },
}

/// Arguments for the `cdb ingest` subcommand.
#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Compilation database to ingest, overriding the configuration.
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Project root, overriding the configuration.
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Do not scan the root directory.
    #[arg(long)]
    pub no_scan: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a configuration file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    pipeline::init_logging(&global);

    let result = match cli.command {
        Command::Ingest(ref args) => ingest::run(args, &global),
        Command::Hash { ref database } => hash::run(database),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_ingest_default() {
        let cli = Cli::parse_from(["cdb", "ingest"]);
        match cli.command {
            Command::Ingest(ref args) => {
                assert!(args.database.is_none());
                assert!(args.root.is_none());
                assert_eq!(args.format, ReportFormat::Text);
                assert!(!args.no_scan);
            }
            _ => panic!("expected Ingest command"),
        }
    }

    #[test]
    fn parse_ingest_with_args() {
        let cli = Cli::parse_from([
            "cdb",
            "ingest",
            "--database",
            "build/compile_commands.json",
            "--root",
            "/proj",
            "--format",
            "json",
            "--no-scan",
        ]);
        match cli.command {
            Command::Ingest(ref args) => {
                assert_eq!(
                    args.database.as_deref(),
                    Some(std::path::Path::new("build/compile_commands.json"))
                );
                assert_eq!(args.root.as_deref(), Some(std::path::Path::new("/proj")));
                assert_eq!(args.format, ReportFormat::Json);
                assert!(args.no_scan);
            }
            _ => panic!("expected Ingest command"),
        }
    }

    #[test]
    fn parse_hash() {
        let cli = Cli::parse_from(["cdb", "hash", "compile_commands.json"]);
        match cli.command {
            Command::Hash { database } => {
                assert_eq!(database, PathBuf::from("compile_commands.json"));
            }
            _ => panic!("expected Hash command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["cdb", "--quiet", "--color", "never", "ingest"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_after_subcommand() {
        let cli = Cli::parse_from(["cdb", "ingest", "--config", "/p/cdb.toml", "-v"]);
        assert_eq!(cli.config, Some(PathBuf::from("/p/cdb.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn hash_requires_a_path() {
        assert!(Cli::try_parse_from(["cdb", "hash"]).is_err());
    }
}
