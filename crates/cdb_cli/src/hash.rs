//! `cdb hash`: prints the fingerprint of a compilation database.

use std::path::Path;

use cdb_common::ProjectFileHash;

/// Runs the `cdb hash` command.
pub fn run(database: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(database)
        .map_err(|e| format!("cannot read {}: {e}", database.display()))?;
    println!("{}", ProjectFileHash::from_bytes(&bytes));
    Ok(0)
}
