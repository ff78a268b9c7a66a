//! Issue tracker collaborator
//!
//! Requests arrive as GitHub issues. Only the fields the request sources
//! need are kept.

use crate::error::TrackerError;
use serde::Deserialize;

/// One open issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Web URL of the issue, used in commit messages
    pub html_url: String,
    /// Login of the author
    pub user: String,
    /// Label names
    pub labels: Vec<String>,
    /// Title, expected to carry the instance URL
    pub title: String,
    /// Body text
    pub body: String,
}

/// Source of open issues
pub trait IssueTracker {
    /// Every open issue
    ///
    /// # Errors
    /// [`TrackerError`] if the tracker cannot be queried.
    fn open_issues(&self) -> Result<Vec<Issue>, TrackerError>;
}

/// GitHub REST API, queried once per call
#[derive(Debug, Clone)]
pub struct GithubIssues {
    api_base: String,
    repository: String,
}

impl GithubIssues {
    /// Create for `owner/name` on the given API base URL
    #[must_use]
    pub fn new(api_base: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            repository: repository.into(),
        }
    }

    /// Endpoint listing open issues
    #[must_use]
    pub fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/issues?state=open",
            self.api_base.trim_end_matches('/'),
            self.repository
        )
    }
}

impl IssueTracker for GithubIssues {
    fn open_issues(&self) -> Result<Vec<Issue>, TrackerError> {
        let url = self.issues_url();
        tracing::info!(%url, "fetching open issues");

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("searx-instances/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrackerError::Http(format!("failed to build http client: {e}")))?;

        let resp = client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| TrackerError::Http(format!("{url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(TrackerError::Http(format!("{url}: status {}", resp.status())));
        }

        let text = resp
            .text()
            .map_err(|e| TrackerError::Http(format!("{url}: {e}")))?;
        parse_issues(&text)
    }
}

#[derive(Deserialize)]
struct GithubIssue {
    number: u64,
    html_url: String,
    user: GithubUser,
    #[serde(default)]
    labels: Vec<GithubLabel>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Deserialize)]
struct GithubUser {
    login: String,
}

#[derive(Deserialize)]
struct GithubLabel {
    name: String,
}

/// Decode the GitHub issue list JSON
///
/// # Errors
/// [`TrackerError::Decode`] if the JSON does not have the issue list shape.
pub fn parse_issues(json: &str) -> Result<Vec<Issue>, TrackerError> {
    let raw: Vec<GithubIssue> =
        serde_json::from_str(json).map_err(|e| TrackerError::Decode(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|issue| Issue {
            number: issue.number,
            html_url: issue.html_url,
            user: issue.user.login,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            title: issue.title.unwrap_or_default(),
            body: issue.body.unwrap_or_default(),
        })
        .collect())
}
