//! Testing utilities for the searx instance list workspace
//!
//! Scripted collaborators and fixtures shared by the integration tests.

#![allow(missing_docs)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use sxi_model::{AdditionalUrls, Instance, InstanceList, ListFile};
use sxi_update::{Editor, EditorError, Issue, IssueTracker, TrackerError, VcsError, VersionControl};

/// Editor that replies with queued buffers
///
/// Every buffer it is shown is recorded. A reply may be [`Reply::Keep`] to
/// save the buffer unchanged. An empty queue behaves like a human blanking
/// the buffer.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    replies: RefCell<VecDeque<Reply>>,
    shown: RefCell<Vec<String>>,
}

#[derive(Debug, Clone)]
pub enum Reply {
    /// Save this text
    Text(String),
    /// Save the buffer as shown
    Keep,
    /// Fail like a missing editor
    Unavailable,
}

impl ScriptedEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.borrow_mut().push_back(Reply::Text(text.into()));
        self
    }

    pub fn keep(self) -> Self {
        self.replies.borrow_mut().push_back(Reply::Keep);
        self
    }

    pub fn unavailable(self) -> Self {
        self.replies.borrow_mut().push_back(Reply::Unavailable);
        self
    }

    /// Buffers shown so far
    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.shown.borrow().len()
    }
}

impl Editor for ScriptedEditor {
    fn edit(&self, buffer: &[u8]) -> Result<Vec<u8>, EditorError> {
        let shown = String::from_utf8_lossy(buffer).into_owned();
        self.shown.borrow_mut().push(shown.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Text(text)) => Ok(text.into_bytes()),
            Some(Reply::Keep) => Ok(shown.into_bytes()),
            Some(Reply::Unavailable) => Err(EditorError::Unavailable),
            None => Ok(Vec::new()),
        }
    }
}

/// Version control that records calls
///
/// Precondition answers are scripted per `begin` (the n-th `staged_count`
/// call); anything not scripted is clean.
#[derive(Debug, Default)]
pub struct RecordingVcs {
    dirty_at: Vec<usize>,
    staged_at: Vec<usize>,
    round: Cell<usize>,
    calls: RefCell<Vec<String>>,
    commits: RefCell<Vec<String>>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The list file is dirty when the `round`-th request starts (0-based)
    pub fn dirty_at(mut self, round: usize) -> Self {
        self.dirty_at.push(round);
        self
    }

    /// A file is staged when the `round`-th request starts (0-based)
    pub fn staged_at(mut self, round: usize) -> Self {
        self.staged_at.push(round);
        self
    }

    /// Commit messages, in order
    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    /// Every call, as `stage <path>` / `commit` / `checkout <path>`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn checkouts(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("checkout"))
            .count()
    }

    fn current_round(&self) -> usize {
        self.round.get().saturating_sub(1)
    }
}

impl VersionControl for RecordingVcs {
    fn is_dirty(&self, _path: &Path) -> Result<bool, VcsError> {
        Ok(self.dirty_at.contains(&self.current_round()))
    }

    fn staged_count(&self) -> Result<usize, VcsError> {
        let round = self.round.get();
        self.round.set(round + 1);
        Ok(usize::from(self.staged_at.contains(&round)))
    }

    fn stage(&self, path: &Path) -> Result<(), VcsError> {
        self.calls
            .borrow_mut()
            .push(format!("stage {}", file_name(path)));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String, VcsError> {
        self.calls.borrow_mut().push("commit".to_string());
        let mut commits = self.commits.borrow_mut();
        commits.push(message.to_string());
        Ok(format!("c{}", commits.len()))
    }

    fn checkout(&self, path: &Path) -> Result<(), VcsError> {
        self.calls
            .borrow_mut()
            .push(format!("checkout {}", file_name(path)));
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Tracker returning a fixed issue list
#[derive(Debug, Clone, Default)]
pub struct StaticTracker {
    pub issues: Vec<Issue>,
}

impl StaticTracker {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

impl IssueTracker for StaticTracker {
    fn open_issues(&self) -> Result<Vec<Issue>, TrackerError> {
        Ok(self.issues.clone())
    }
}

pub fn issue(number: u64, labels: &[&str], title: &str, body: &str) -> Issue {
    Issue {
        number,
        html_url: format!("https://github.com/searxng/searx-instances/issues/{number}"),
        user: "someone".to_string(),
        labels: labels.iter().map(|l| (*l).to_string()).collect(),
        title: title.to_string(),
        body: body.to_string(),
    }
}

pub fn sample_list() -> InstanceList {
    let mut list = InstanceList::new();
    list.insert(
        "https://searx.me",
        Instance::new()
            .with_safe(true)
            .with_comment("maintained by the searx team")
            .with_additional_urls(AdditionalUrls::new().with("http://searxme2v3cqhlfw.onion", "Hidden Service")),
    )
    .unwrap();
    list.insert("https://searx.example.org", Instance::new()).unwrap();
    list
}

/// List file in a temporary directory, pre-populated with `list`
pub struct TempList {
    pub dir: tempfile::TempDir,
    pub file: ListFile,
}

impl TempList {
    pub fn new(list: &InstanceList) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let file = ListFile::new(dir.path().join("instances.yml"));
        file.save(list).unwrap();
        Self { dir, file }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    pub fn text(&self) -> String {
        std::fs::read_to_string(self.file.path()).unwrap()
    }
}
