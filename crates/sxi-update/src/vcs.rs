//! Version control collaborator and the per-request commit transaction

use crate::error::{UpdateError, UpdateResult, VcsError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Operations the orchestrator needs from version control
pub trait VersionControl {
    /// Whether `path` differs from the last commit (index or working tree)
    ///
    /// # Errors
    /// [`VcsError`] if the repository cannot be queried.
    fn is_dirty(&self, path: &Path) -> Result<bool, VcsError>;

    /// Number of files staged against the last commit
    ///
    /// # Errors
    /// [`VcsError`] if the repository cannot be queried.
    fn staged_count(&self) -> Result<usize, VcsError>;

    /// Stage `path`
    ///
    /// # Errors
    /// [`VcsError`] on failure.
    fn stage(&self, path: &Path) -> Result<(), VcsError>;

    /// Commit the staged changes, returning the commit id
    ///
    /// # Errors
    /// [`VcsError`] on failure.
    fn commit(&self, message: &str) -> Result<String, VcsError>;

    /// Discard changes to `path`
    ///
    /// # Errors
    /// [`VcsError`] on failure.
    fn checkout(&self, path: &Path) -> Result<(), VcsError>;
}

/// `git` binary driven with `git -C <root>`
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Bind to a repository root
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.root).args(args);
        cmd
    }

    /// Path as git sees it after `-C root`
    fn pathspec(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    /// Run and capture stdout; non-zero exit is an error
    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let out = self
            .command(args)
            .output()
            .map_err(|source| VcsError::Spawn {
                args: args.join(" "),
                source,
            })?;
        if !out.status.success() {
            return Err(VcsError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn is_dirty(&self, path: &Path) -> Result<bool, VcsError> {
        let path = self.pathspec(path);
        let args = ["diff", "--quiet", "HEAD", "--", path.as_str()];
        let status = self
            .command(&args)
            .status()
            .map_err(|source| VcsError::Spawn {
                args: args.join(" "),
                source,
            })?;
        // `diff --quiet` exits 1 when there are differences
        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(VcsError::Command {
                args: args.join(" "),
                stderr: status.to_string(),
            }),
        }
    }

    fn staged_count(&self) -> Result<usize, VcsError> {
        let out = self.run(&["diff", "--cached", "--name-only", "HEAD"])?;
        Ok(out.lines().filter(|l| !l.trim().is_empty()).count())
    }

    fn stage(&self, path: &Path) -> Result<(), VcsError> {
        self.run(&["add", "--", self.pathspec(path).as_str()])?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String, VcsError> {
        self.run(&["commit", "-m", message])?;
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    fn checkout(&self, path: &Path) -> Result<(), VcsError> {
        self.run(&["checkout", "--", self.pathspec(path).as_str()])?;
        Ok(())
    }
}

/// Scoped stage-or-rollback around one request
///
/// [`CommitTransaction::commit`] stages the tracked files and commits them.
/// Dropping the transaction without committing discards every change to the
/// tracked files, on any exit path.
pub struct CommitTransaction<'a> {
    vcs: &'a dyn VersionControl,
    files: Vec<PathBuf>,
    finished: bool,
}

impl<'a> CommitTransaction<'a> {
    /// Open a transaction once the tree is clean
    ///
    /// # Errors
    /// [`UpdateError::PreconditionFailed`] when files are staged or a
    /// tracked file has uncommitted changes.
    pub fn begin(vcs: &'a dyn VersionControl, files: &[&Path]) -> UpdateResult<Self> {
        let staged = vcs.staged_count()?;
        if staged > 0 {
            return Err(UpdateError::precondition(format!(
                "there are {staged} staged file(s)"
            )));
        }
        for file in files {
            if vcs.is_dirty(file)? {
                return Err(UpdateError::precondition(format!(
                    "{} is dirty",
                    file.display()
                )));
            }
        }

        Ok(Self {
            vcs,
            files: files.iter().map(|f| f.to_path_buf()).collect(),
            finished: false,
        })
    }

    /// Stage the tracked files and commit, returning the commit id
    ///
    /// # Errors
    /// [`UpdateError::Vcs`]; the changes are then discarded.
    pub fn commit(mut self, message: &str) -> UpdateResult<String> {
        for file in &self.files {
            self.vcs.stage(file)?;
        }
        let id = self.vcs.commit(message)?;
        self.finished = true;
        Ok(id)
    }
}

impl Drop for CommitTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        for file in &self.files {
            if let Err(e) = self.vcs.checkout(file) {
                tracing::error!(file = %file.display(), error = %e, "failed to discard changes");
            }
        }
    }
}
