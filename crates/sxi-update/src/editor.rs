//! Interactive editor collaborator
//!
//! [`Editor::edit`] blocks until the human saves and quits. The production
//! implementation runs an external program on a temporary `.yml` file.

use crate::error::EditorError;
use std::io::IsTerminal;
use std::path::Path;
use std::process::{Command, Stdio};

/// Something that lets a human edit a buffer
pub trait Editor {
    /// Hand `buffer` to the human, return what they saved
    ///
    /// # Errors
    /// [`EditorError`] if no editor can be run or the buffer cannot be read back.
    fn edit(&self, buffer: &[u8]) -> Result<Vec<u8>, EditorError>;
}

#[cfg(target_os = "macos")]
const DEFAULT_EDITORS: &[&str] = &["open -t", "subl", "vscode", "atom"];

#[cfg(windows)]
const DEFAULT_EDITORS: &[&str] = &["subl", "vscode", "atom", "notepad++.exe", "notepad.exe"];

// vim and emacs are left out; users of those set $EDITOR anyway
#[cfg(not(any(target_os = "macos", windows)))]
const DEFAULT_EDITORS: &[&str] = &["subl", "vscode", "atom", "kate", "geany", "gedit", "nano", "editor"];

/// External editor program
///
/// Resolution order: explicit command, `$VISUAL`, `$EDITOR`, then the first
/// platform default found on `PATH`.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: Option<String>,
    suffix: String,
}

impl ExternalEditor {
    /// Create editor with environment-based resolution
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            command: None,
            suffix: ".yml".to_string(),
        }
    }

    /// With explicit command, bypassing the environment
    #[inline]
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Editor command line that will be run
    ///
    /// # Errors
    /// [`EditorError::Unavailable`] when nothing is configured or installed.
    pub fn resolve_command(&self) -> Result<String, EditorError> {
        if let Some(command) = self.command.as_ref().filter(|c| !c.trim().is_empty()) {
            return Ok(command.clone());
        }

        for var in ["VISUAL", "EDITOR"] {
            if let Ok(command) = std::env::var(var) {
                if !command.trim().is_empty() {
                    return Ok(command);
                }
            }
        }

        DEFAULT_EDITORS
            .iter()
            .find(|candidate| {
                candidate
                    .split_whitespace()
                    .next()
                    .is_some_and(|program| which::which(program).is_ok())
            })
            .map(|candidate| (*candidate).to_string())
            .ok_or(EditorError::Unavailable)
    }

    fn run(&self, command: &str, file: &Path) -> Result<(), EditorError> {
        let (program, args) = split_command(command)?;

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .args(blocking_args(&program))
            .arg(file);

        // Keep the editor on the terminal when our stdout is piped
        if std::io::stdin().is_terminal() && !std::io::stdout().is_terminal() {
            if let Ok(tty) = std::fs::OpenOptions::new().write(true).open(tty_path()) {
                cmd.stdout(Stdio::from(tty));
            }
        }

        tracing::debug!(%command, file = %file.display(), "launching editor");
        let status = cmd.status().map_err(|source| EditorError::Launch {
            command: command.to_string(),
            source,
        })?;
        if !status.success() {
            return Err(EditorError::Failed {
                command: command.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ExternalEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, buffer: &[u8]) -> Result<Vec<u8>, EditorError> {
        let command = self.resolve_command()?;

        // Removed on drop, whatever happens in between
        let file = tempfile::Builder::new()
            .prefix("searx-instances-")
            .suffix(&self.suffix)
            .tempfile()?;
        std::fs::write(file.path(), buffer)?;

        self.run(&command, file.path())?;

        match std::fs::read(file.path()) {
            Ok(content) => Ok(content),
            // Some editors replace the file; a deleted file means an empty buffer
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Split a command line shell-style into program and arguments
///
/// Unbalanced quotes or an empty line leave no editor to run.
fn split_command(command: &str) -> Result<(String, Vec<String>), EditorError> {
    let mut words = shlex::split(command).ok_or(EditorError::Unavailable)?;
    if words.is_empty() {
        return Err(EditorError::Unavailable);
    }
    let program = words.remove(0);
    Ok((program, words))
}

/// Flags that make known editors wait until the file is closed
fn blocking_args(program: &str) -> &'static [&'static str] {
    let name = Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program);
    match name {
        "vim" | "gvim" | "vim.basic" | "vim.tiny" => &["-f", "-o"],
        "emacs" => &["-nw"],
        "gedit" => &["-w", "--new-window"],
        "nano" => &["-R"],
        "code" => &["-w", "-n"],
        _ => &[],
    }
}

#[cfg(windows)]
fn tty_path() -> &'static str {
    "CON:"
}

#[cfg(not(windows))]
fn tty_path() -> &'static str {
    "/dev/tty"
}
