//! Reviewed updates of the searx instance list
//!
//! A batch of [`UserRequest`]s (from the issue tracker or the command line)
//! is applied one request at a time. Each request is drafted by a human in
//! an [`Editor`], validated against the [`InstanceList`](sxi_model::InstanceList)
//! and, once accepted, saved and committed through [`VersionControl`].
//!
//! # Layout
//!
//! - [`request`]: Add / Delete / Edit and the edit-validate-retry loop
//! - [`orchestrator`]: clean-tree check and one commit per accepted request
//! - [`source`]: requests from issues and from operator input
//! - [`editor`], [`vcs`], [`tracker`]: collaborators behind traits
//! - [`buffer`]: edit buffer text helpers
//! - [`config`]: paths, tracker location, editor override

pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod orchestrator;
pub mod request;
pub mod source;
pub mod tracker;
pub mod vcs;

pub use config::UpdateConfig;
pub use editor::{Editor, ExternalEditor};
pub use error::{EditorError, TrackerError, UpdateError, UpdateResult, VcsError};
pub use orchestrator::{run_requests, run_requests_with, BatchEvent, BatchReport, CommittedRequest};
pub use request::{KindBehavior, RequestKind, RequestOutcome, RequestState, UserRequest};
pub use tracker::{GithubIssues, Issue, IssueTracker};
pub use vcs::{CommitTransaction, GitCli, VersionControl};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
