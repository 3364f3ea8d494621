//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CdbConfig;
use std::collections::HashSet;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "cdb.toml";

/// Loads and validates `cdb.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<CdbConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<CdbConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CdbConfig, ConfigError> {
    let config: CdbConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and that toolchain ids are unique and resolvable.
fn validate_config(config: &CdbConfig) -> Result<(), ConfigError> {
    if config.project.database.trim().is_empty() {
        return Err(ConfigError::MissingField("project.database".to_string()));
    }

    let mut ids = HashSet::new();
    for toolchain in &config.toolchains {
        let id = toolchain.id.as_str();
        if id.is_empty() {
            return Err(ConfigError::MissingField("toolchains.id".to_string()));
        }
        if !ids.insert(id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate toolchain id '{id}'"
            )));
        }
    }

    let defaults = [
        ("environment.default_c", &config.environment.default_c),
        ("environment.default_cxx", &config.environment.default_cxx),
    ];
    for (field, id) in defaults {
        if let Some(id) = id {
            if !ids.contains(id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "{field} names unknown toolchain '{id}'"
                )));
            }
        }
    }
    Ok(())
}
