//! Request sources: issue tracker records and operator input

use crate::error::{UpdateError, UpdateResult};
use crate::request::{RequestKind, UserRequest};
use crate::tracker::Issue;
use once_cell::sync::Lazy;
use regex::Regex;
use sxi_model::url;

/// Label every instance request carries
pub const INSTANCE_LABEL: &str = "instance";

const KIND_LABELS: [(&str, RequestKind); 3] = [
    ("instance add", RequestKind::Add),
    ("instance delete", RequestKind::Delete),
    ("instance edit", RequestKind::Edit),
];

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[a-z]*[ ]?(http.+)").expect("title pattern is valid"));

static HTML_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*-->").expect("comment pattern is valid"));

/// Requests for the open issues labelled [`INSTANCE_LABEL`]
///
/// With a non-empty `selection` only those issue numbers are considered.
/// Issues without a usable kind label or title URL are skipped with a
/// warning. Tracker order is kept.
#[must_use]
pub fn requests_from_issues(issues: &[Issue], selection: &[u64]) -> Vec<UserRequest> {
    issues
        .iter()
        .filter(|issue| issue.labels.iter().any(|l| l == INSTANCE_LABEL))
        .filter(|issue| selection.is_empty() || selection.contains(&issue.number))
        .filter_map(request_from_issue)
        .collect()
}

fn request_from_issue(issue: &Issue) -> Option<UserRequest> {
    let kind = match kind_from_labels(&issue.labels) {
        Ok(kind) => kind,
        Err(reason) => {
            tracing::warn!(issue = issue.number, labels = ?issue.labels, "ignoring issue: {reason}");
            return None;
        }
    };

    let Some(candidate) = TITLE_RE
        .captures(&issue.title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
    else {
        tracing::warn!(issue = issue.number, title = %issue.title, "ignoring issue: URL not found in the title");
        return None;
    };
    let Some(url) = url::normalize(candidate) else {
        tracing::warn!(issue = issue.number, url = candidate, "ignoring issue: URL rejected");
        return None;
    };

    Some(
        UserRequest::new(kind, url)
            .with_origin(issue.number.to_string(), issue.html_url.as_str())
            .with_user(issue.user.as_str())
            .with_message(strip_html_comments(&issue.body)),
    )
}

/// Request kind carried by the labels
fn kind_from_labels(labels: &[String]) -> Result<RequestKind, &'static str> {
    let mut found = None;
    for (label, kind) in KIND_LABELS {
        if labels.iter().any(|l| l == label) {
            if found.is_some_and(|k| k != kind) {
                return Err("incoherent labels");
            }
            found = Some(kind);
        }
    }
    found.ok_or("no request kind label")
}

/// Issue body without HTML comments, trimmed
#[must_use]
pub fn strip_html_comments(body: &str) -> String {
    HTML_COMMENT_RE.replace_all(body, "").trim().to_string()
}

/// Requests given on the command line, in add / delete / edit order
///
/// # Errors
/// [`UpdateError::InvalidUrl`] if an URL to add is rejected.
pub fn requests_from_operator(
    add: &[String],
    delete: &[String],
    edit: &[String],
) -> UpdateResult<Vec<UserRequest>> {
    let mut requests = Vec::with_capacity(add.len() + delete.len() + edit.len());
    for candidate in add {
        let url = url::normalize(candidate)
            .ok_or_else(|| UpdateError::InvalidUrl(candidate.clone()))?;
        requests.push(UserRequest::new(RequestKind::Add, url));
    }
    requests.extend(delete.iter().map(|u| UserRequest::new(RequestKind::Delete, u.as_str())));
    requests.extend(edit.iter().map(|u| UserRequest::new(RequestKind::Edit, u.as_str())));
    Ok(requests)
}
