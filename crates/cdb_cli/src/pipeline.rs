//! Shared helpers for CLI commands: logging setup, configuration discovery,
//! and turning configuration plus flags into project settings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cdb_common::path::absolutize;
use cdb_config::{load_config_file, resolve_project, CONFIG_FILE_NAME};
use cdb_project::{ProjectSettings, ScanSettings};
use cdb_toolchain::{HostOs, StaticRegistry};
use tracing::level_filters::LevelFilter;

use crate::{GlobalArgs, IngestArgs};

/// Installs the stderr log subscriber. `-v` enables debug output, `-q`
/// limits it to errors.
pub fn init_logging(global: &GlobalArgs) {
    let level = if global.quiet {
        LevelFilter::ERROR
    } else if global.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
}

/// Walks up from `start` looking for the nearest `cdb.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Everything an ingestion run needs.
pub struct RunSetup {
    /// Project settings, with command-line overrides applied.
    pub settings: ProjectSettings,
    /// Toolchains and environment defaults.
    pub registry: Arc<StaticRegistry>,
    /// Host conventions.
    pub host: HostOs,
}

/// Builds the run setup from the configuration file (explicit or discovered
/// from `cwd`) and the command-line overrides.
///
/// Without any configuration a `--database` is required, and the registry is
/// empty.
pub fn resolve_setup(
    args: &IngestArgs,
    global: &GlobalArgs,
    cwd: &Path,
) -> Result<RunSetup, Box<dyn std::error::Error>> {
    let config_path = match &global.config {
        Some(path) => Some(absolutize(path, cwd)),
        None if args.database.is_none() => find_config(cwd),
        None => None,
    };

    let mut setup = match config_path {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading configuration");
            let config = load_config_file(&path)?;
            let base = path.parent().unwrap_or(cwd);
            let resolved = resolve_project(&config, base)?;
            let mut settings =
                ProjectSettings::new(resolved.database).with_root(resolved.root);
            if let Some(suffix) = resolved.extras_suffix {
                settings.extras_suffix = suffix;
            }
            settings.skip_unchanged = resolved.skip_unchanged;
            settings.scan = ScanSettings {
                enabled: resolved.scan.enabled,
                extra_binary_extensions: resolved.scan.extra_binary_extensions,
                exclude_dirs: resolved.scan.exclude_dirs,
            };
            RunSetup {
                settings,
                registry: Arc::new(resolved.registry),
                host: resolved.host,
            }
        }
        None => {
            let Some(database) = &args.database else {
                return Err(format!(
                    "no {CONFIG_FILE_NAME} found in {} or any parent directory; pass --database",
                    cwd.display()
                )
                .into());
            };
            RunSetup {
                settings: ProjectSettings::new(absolutize(database, cwd)),
                registry: Arc::new(StaticRegistry::default()),
                host: HostOs::current(),
            }
        }
    };

    if let Some(database) = &args.database {
        setup.settings.database = absolutize(database, cwd);
    }
    if let Some(root) = &args.root {
        setup.settings.root = absolutize(root, cwd);
    }
    if args.no_scan {
        setup.settings.scan.enabled = false;
    }
    setup.settings.check()?;
    Ok(setup)
}
