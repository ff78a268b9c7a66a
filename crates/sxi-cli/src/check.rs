//! `check`: is the list file byte-identical to its canonical encoding

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use sxi_model::{codec, ListFile};

/// Result of comparing the file with its canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// File is canonical
    Normalized,
    /// File differs; carries a human-readable difference
    NotNormalized {
        /// Unified diff, or line counts when `diff` is unavailable
        diff: String,
    },
}

/// Compare `file` with its canonical encoding
///
/// # Errors
/// When the file cannot be read or decoded.
pub fn check(file: &ListFile) -> Result<CheckOutcome> {
    let text = file.read_text()?;
    let list = codec::decode(&text)
        .with_context(|| format!("{} cannot be decoded", file.path().display()))?;
    let normalized = codec::encode(&list)?;

    if normalized == text {
        tracing::debug!(path = %file.path().display(), "list is normalized");
        return Ok(CheckOutcome::Normalized);
    }
    Ok(CheckOutcome::NotNormalized {
        diff: difference(file.path(), &text, &normalized)?,
    })
}

/// `diff -u` between the file and `normalized`, line counts as a fallback
fn difference(path: &Path, text: &str, normalized: &str) -> Result<String> {
    let mut expected = tempfile::Builder::new()
        .prefix("instances-normalized-")
        .suffix(".yml")
        .tempfile()
        .context("cannot create temporary file")?;
    expected
        .write_all(normalized.as_bytes())
        .context("cannot write temporary file")?;

    match Command::new("diff").arg("-u").arg(path).arg(expected.path()).output() {
        Ok(output) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        Err(e) => {
            tracing::warn!(error = %e, "diff is not available");
            Ok(format!(
                "{} has {} lines, the normalized form has {} lines\n",
                path.display(),
                text.lines().count(),
                normalized.lines().count()
            ))
        }
    }
}
