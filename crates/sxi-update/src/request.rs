//! Add / Delete / Edit requests and the edit-validate-retry loop
//!
//! Every request goes through the same states:
//!
//! ```text
//! Drafting ──► Validating ──► Accepted
//!    ▲             │
//!    └── error ────┘          Drafting ──(blank buffer)──► Cancelled
//! ```
//!
//! Only the kind-specific pre-fill and effect differ; they are looked up in
//! [`RequestKind::behavior`].

use crate::buffer;
use crate::editor::Editor;
use crate::error::{UpdateError, UpdateResult};
use std::fmt::{self, Display, Formatter};
use sxi_model::{codec, Instance, InstanceList, ListFile, ModelError, ModelResult};

/// Request kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Register a new instance
    Add,
    /// Remove an instance
    Delete,
    /// Replace an instance block
    Edit,
}

/// Builds the YAML shown before the commit message template
pub type PrefillFn = fn(&UserRequest, &InstanceList) -> UpdateResult<String>;

/// Applies the edited document to a list
pub type ApplyFn = fn(&UserRequest, &mut InstanceList, InstanceList) -> ModelResult<()>;

/// Kind-specific part of a request
#[derive(Clone, Copy)]
pub struct KindBehavior {
    /// Name used in commit messages and progress output
    pub label: &'static str,
    /// Initial YAML content
    pub prefill: PrefillFn,
    /// Effect on the list
    pub apply: ApplyFn,
}

const ADD: KindBehavior = KindBehavior {
    label: "Add",
    prefill: prefill_skeleton,
    apply: apply_insert_all,
};

const DELETE: KindBehavior = KindBehavior {
    label: "Delete",
    prefill: prefill_nothing,
    apply: apply_remove_target,
};

const EDIT: KindBehavior = KindBehavior {
    label: "Edit",
    prefill: prefill_existing,
    apply: apply_replace_target,
};

impl RequestKind {
    /// Pre-fill and effect for this kind
    #[inline]
    #[must_use]
    pub const fn behavior(self) -> &'static KindBehavior {
        match self {
            Self::Add => &ADD,
            Self::Delete => &DELETE,
            Self::Edit => &EDIT,
        }
    }

    /// Name used in commit messages and progress output
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.behavior().label
    }
}

impl Display for RequestKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn prefill_skeleton(request: &UserRequest, _list: &InstanceList) -> UpdateResult<String> {
    let mut skeleton = InstanceList::new();
    skeleton.insert(request.url.as_str(), Instance::new())?;
    Ok(codec::encode(&skeleton)?)
}

fn prefill_nothing(_request: &UserRequest, _list: &InstanceList) -> UpdateResult<String> {
    Ok(String::new())
}

fn prefill_existing(request: &UserRequest, list: &InstanceList) -> UpdateResult<String> {
    let instance = list
        .get(&request.url)
        .ok_or_else(|| UpdateError::UnknownInstance(request.url.clone()))?;
    let mut current = InstanceList::new();
    current.insert(request.url.as_str(), instance.clone())?;
    Ok(codec::encode(&current)?)
}

fn apply_insert_all(
    _request: &UserRequest,
    list: &mut InstanceList,
    update: InstanceList,
) -> ModelResult<()> {
    if update.is_empty() {
        return Err(ModelError::validation("no instance block"));
    }
    insert_all(list, update)
}

fn apply_remove_target(
    request: &UserRequest,
    list: &mut InstanceList,
    _update: InstanceList,
) -> ModelResult<()> {
    list.remove(&request.url).map(drop)
}

fn apply_replace_target(
    request: &UserRequest,
    list: &mut InstanceList,
    update: InstanceList,
) -> ModelResult<()> {
    list.remove(&request.url)?;
    insert_all(list, update)
}

fn insert_all(list: &mut InstanceList, update: InstanceList) -> ModelResult<()> {
    for (url, instance) in &update {
        list.insert(url.as_str(), instance.clone())?;
    }
    Ok(())
}

/// States of the request loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Buffer is with the human
    Drafting,
    /// Edited buffer is being checked
    Validating,
    /// Change applied and saved
    Accepted,
    /// Human emptied the buffer
    Cancelled,
}

/// How a request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Change applied to the list and saved
    Accepted {
        /// Commit message extracted from the buffer
        commit_message: String,
    },
    /// Nothing changed
    Cancelled,
}

impl RequestOutcome {
    /// Whether the change was applied
    #[inline]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// A proposed change to the instance list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRequest {
    /// What to do
    pub kind: RequestKind,
    /// Request identifier (issue number)
    pub id: Option<String>,
    /// Where the request came from, closed by the commit
    pub reference: Option<String>,
    /// Who asked
    pub user: Option<String>,
    /// Target URL
    pub url: String,
    /// Free-text request body
    pub message: String,
}

impl UserRequest {
    /// Create request without origin metadata
    #[must_use]
    pub fn new(kind: RequestKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            id: None,
            reference: None,
            user: None,
            url: url.into(),
            message: String::new(),
        }
    }

    /// With identifier and originating reference
    #[must_use]
    pub fn with_origin(mut self, id: impl Into<String>, reference: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.reference = Some(reference.into());
        self
    }

    /// With submitting user
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// With message body
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Commit message template and guidance, as comment lines
    #[must_use]
    pub fn message_template(&self) -> String {
        let mut commit_message = format!("{} {}\n", self.kind, self.url);
        if self.reference.is_some() || self.user.is_some() {
            commit_message.push('\n');
        }
        if let Some(reference) = &self.reference {
            commit_message.push_str(&format!("Close {reference}\n"));
        }
        if let Some(user) = &self.user {
            commit_message.push_str(&format!("From @{user}\n"));
        }

        format!(
            "{}\n\
             #> The above text is the commit message\n\
             #> Delete the whole buffer to cancel the request\n\
             \n\
             #> -- MESSAGE -----------------------\n\
             {}\n",
            buffer::comment_lines(&commit_message, "# "),
            buffer::comment_lines(&self.message, "#> "),
        )
    }

    /// Initial editor buffer: kind-specific YAML, then the template
    ///
    /// # Errors
    /// [`UpdateError::UnknownInstance`] for an Edit of a URL not in `list`.
    pub fn initial_buffer(&self, list: &InstanceList) -> UpdateResult<String> {
        let prefill = (self.kind.behavior().prefill)(self, list)?;
        if prefill.is_empty() {
            Ok(self.message_template())
        } else {
            Ok(format!("{prefill}\n{}", self.message_template()))
        }
    }

    /// Apply this request's effect for an edited document
    ///
    /// # Errors
    /// [`ModelError::Validation`] on URL conflicts or a missing target.
    pub fn apply(&self, list: &mut InstanceList, update: InstanceList) -> ModelResult<()> {
        (self.kind.behavior().apply)(self, list, update)
    }

    /// Run the edit-validate-retry loop against `list`
    ///
    /// On acceptance `list` is updated and saved to `file`; on cancellation
    /// neither is touched.
    ///
    /// # Errors
    /// Editor failures, an Edit of an unknown URL, and list save failures.
    /// Problems in the edited document are shown to the human instead.
    pub fn run(
        &self,
        list: &mut InstanceList,
        editor: &dyn Editor,
        file: &ListFile,
    ) -> UpdateResult<RequestOutcome> {
        let mut content = self.initial_buffer(list)?;
        let mut error: Option<String> = None;
        let mut state = RequestState::Drafting;

        loop {
            match state {
                RequestState::Drafting => {
                    content = call_editor(editor, &content, error.as_deref())?;
                    state = if buffer::is_blank(&content) {
                        RequestState::Cancelled
                    } else {
                        RequestState::Validating
                    };
                }
                RequestState::Validating => match self.check(list, &content) {
                    Ok(()) => state = RequestState::Accepted,
                    Err(e) if e.is_recoverable() => {
                        tracing::warn!(url = %self.url, error = %e, "edited request rejected");
                        error = Some(e.to_string());
                        state = RequestState::Drafting;
                    }
                    Err(e) => return Err(e.into()),
                },
                RequestState::Accepted => {
                    let update = codec::decode(&content)?;
                    self.apply(list, update)?;
                    file.save(list)?;
                    tracing::info!(kind = %self.kind, url = %self.url, "request accepted");
                    return Ok(RequestOutcome::Accepted {
                        commit_message: buffer::extract_commit_message(&content),
                    });
                }
                RequestState::Cancelled => {
                    tracing::info!(kind = %self.kind, url = %self.url, "request cancelled");
                    return Ok(RequestOutcome::Cancelled);
                }
            }
        }
    }

    /// Decode the buffer and apply it to a throwaway copy of `list`
    fn check(&self, list: &InstanceList, content: &str) -> Result<(), ModelError> {
        let update = codec::decode(content)?;
        let mut scratch = list.clone();
        self.apply(&mut scratch, update)
    }
}

fn call_editor(editor: &dyn Editor, content: &str, error: Option<&str>) -> UpdateResult<String> {
    let input = buffer::with_error_block(content, error);
    tracing::debug!(bytes = input.len(), "handing buffer to editor");
    let output = editor.edit(input.as_bytes())?;
    Ok(buffer::strip_error_block(&String::from_utf8_lossy(&output)))
}
