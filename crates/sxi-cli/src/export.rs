//! `export-json`

use anyhow::{Context, Result};
use std::path::Path;
use sxi_model::ListFile;

/// JSON form of the list file
///
/// # Errors
/// When the list cannot be loaded or encoded.
pub fn to_json(file: &ListFile) -> Result<String> {
    let list = file
        .load()
        .with_context(|| format!("cannot load {}", file.path().display()))?;
    Ok(list.to_json()?)
}

/// Write the JSON form to `output`, or stdout
///
/// # Errors
/// See [`to_json`]; also when `output` cannot be written.
pub fn run(file: &ListFile, output: Option<&Path>) -> Result<()> {
    let json = to_json(file)?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!(path = %path.display(), "exported");
        }
        None => println!("{json}"),
    }
    Ok(())
}
