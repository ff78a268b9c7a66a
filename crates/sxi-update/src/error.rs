//! Error types for request application
//!
//! Errors that a human can fix in the editor (malformed documents, URL
//! conflicts) never leave the request loop. Everything here that reaches the
//! caller stops the batch.

use sxi_model::ModelError;
use std::path::PathBuf;

/// Errors from the external editor
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// No editor configured or installed
    #[error("unable to find a viable editor on this system, please consider setting your $EDITOR variable")]
    Unavailable,

    /// Editor process could not be started
    #[error("failed to launch editor `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Editor exited with a failure status
    #[error("editor `{command}` exited with {status}")]
    Failed { command: String, status: String },

    /// Temporary buffer file could not be written or read back
    #[error("editor buffer io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the version control collaborator
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// `git` could not be started
    #[error("failed to run git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    /// `git` ran and failed
    #[error("git {args} failed: {stderr}")]
    Command { args: String, stderr: String },
}

/// Errors from the issue tracker
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Request could not be sent or returned an error status
    #[error("issue tracker request failed: {0}")]
    Http(String),

    /// Response body is not the expected JSON
    #[error("unexpected issue tracker response: {0}")]
    Decode(String),
}

/// Errors that stop a batch of requests
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// Working tree not clean before a request
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// No usable editor
    #[error("editor unavailable: {0}")]
    EditorUnavailable(String),

    /// Editor failed while a request was drafted
    #[error("editor error: {0}")]
    Editor(EditorError),

    /// Edit request for a URL that is not in the list
    #[error("{0} is not in the instance list")]
    UnknownInstance(String),

    /// URL given by the operator is rejected by the normalizer
    #[error("invalid instance URL: {0}")]
    InvalidUrl(String),

    /// Version control failure
    #[error("version control error: {0}")]
    Vcs(#[from] VcsError),

    /// Issue tracker failure
    #[error("issue tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// List load/save failure
    #[error("instance list error: {0}")]
    Model(#[from] ModelError),

    /// Configuration file problem
    #[error("configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl UpdateError {
    /// Create precondition failure
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    /// Create configuration error for path
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<EditorError> for UpdateError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Unavailable => Self::EditorUnavailable(err.to_string()),
            other => Self::Editor(other),
        }
    }
}

/// Result type alias for update operations
pub type UpdateResult<T> = Result<T, UpdateError>;
