//! Commit orchestrator
//!
//! Runs requests one after the other. Each request gets a clean tree, the
//! request loop, and exactly one commit when accepted. The first failure or
//! cancellation stops the batch; earlier commits stay.

use crate::editor::Editor;
use crate::error::UpdateResult;
use crate::request::{RequestKind, RequestOutcome, UserRequest};
use crate::vcs::{CommitTransaction, VersionControl};
use sxi_model::{InstanceList, ListFile};

/// Progress of a batch, in the order it happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Request handed to the editor
    Started {
        /// Request kind
        kind: RequestKind,
        /// Target URL
        url: String,
    },
    /// Accepted request committed
    Committed {
        /// Commit id
        commit: String,
    },
    /// Human cancelled the request
    Cancelled,
}

/// One accepted and committed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedRequest {
    /// Request kind
    pub kind: RequestKind,
    /// Target URL
    pub url: String,
    /// Request identifier, if any
    pub id: Option<String>,
    /// Commit id
    pub commit: String,
}

/// What a batch did before it finished or stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Committed requests, in order
    pub committed: Vec<CommittedRequest>,
    /// `<Kind> <url>` of the request that was cancelled
    pub cancelled: Option<String>,
}

impl BatchReport {
    /// Whether every request was committed
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cancelled.is_none()
    }
}

/// Run `requests` in order, one commit per accepted request
///
/// # Errors
/// The first fatal error: a dirty tree or staged files before a request,
/// editor or version control failures, an Edit of an unknown URL, list
/// write failures. Requests committed before it are kept.
pub fn run_requests(
    list: &mut InstanceList,
    requests: &[UserRequest],
    editor: &dyn Editor,
    vcs: &dyn VersionControl,
    file: &ListFile,
) -> UpdateResult<BatchReport> {
    run_requests_with(list, requests, editor, vcs, file, &mut |_| {})
}

/// [`run_requests`] reporting progress to `observer`
///
/// # Errors
/// See [`run_requests`].
pub fn run_requests_with(
    list: &mut InstanceList,
    requests: &[UserRequest],
    editor: &dyn Editor,
    vcs: &dyn VersionControl,
    file: &ListFile,
    observer: &mut dyn FnMut(&BatchEvent),
) -> UpdateResult<BatchReport> {
    let mut report = BatchReport::default();

    for request in requests {
        let transaction = CommitTransaction::begin(vcs, &[file.path()])?;

        tracing::info!(kind = %request.kind, url = %request.url, id = ?request.id, "starting request");
        observer(&BatchEvent::Started {
            kind: request.kind,
            url: request.url.clone(),
        });

        match request.run(list, editor, file)? {
            RequestOutcome::Accepted { commit_message } => {
                let commit = transaction.commit(&commit_message)?;
                tracing::info!(%commit, url = %request.url, "committed");
                observer(&BatchEvent::Committed {
                    commit: commit.clone(),
                });
                report.committed.push(CommittedRequest {
                    kind: request.kind,
                    url: request.url.clone(),
                    id: request.id.clone(),
                    commit,
                });
            }
            RequestOutcome::Cancelled => {
                drop(transaction);
                observer(&BatchEvent::Cancelled);
                report.cancelled = Some(format!("{} {}", request.kind, request.url));
                break;
            }
        }
    }

    Ok(report)
}
