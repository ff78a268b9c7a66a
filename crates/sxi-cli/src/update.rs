//! `update`: gather requests and run them as a batch

use crate::cli::UpdateArgs;
use anyhow::{Context, Result};
use sxi_update::{
    run_requests_with, source, BatchEvent, BatchReport, Editor, ExternalEditor, GitCli,
    GithubIssues, IssueTracker, UpdateConfig, UserRequest, VersionControl,
};

/// Requests in source order: issues, then add, delete, edit
///
/// # Errors
/// When the tracker cannot be queried or an URL to add is rejected.
pub fn collect_requests(
    args: &UpdateArgs,
    tracker: &dyn IssueTracker,
) -> Result<Vec<UserRequest>> {
    let mut requests = Vec::new();

    if let Some(selection) = &args.github_issues {
        let issues = tracker.open_issues()?;
        tracing::info!(open = issues.len(), "fetched issues");
        requests.extend(source::requests_from_issues(&issues, selection));
    }
    requests.extend(source::requests_from_operator(
        &args.add,
        &args.delete,
        &args.edit,
    )?);

    Ok(requests)
}

/// Run `requests` against the configured list, printing progress
///
/// # Errors
/// The first error that stopped the batch.
pub fn apply(
    config: &UpdateConfig,
    requests: &[UserRequest],
    editor: &dyn Editor,
    vcs: &dyn VersionControl,
) -> Result<BatchReport> {
    let file = config.list_file();
    let mut list = file
        .load()
        .with_context(|| format!("cannot load {}", file.path().display()))?;

    let report = run_requests_with(&mut list, requests, editor, vcs, &file, &mut |event: &BatchEvent| {
        match event {
            BatchEvent::Started { kind, url } => println!("{kind} {url}"),
            BatchEvent::Committed { commit } => println!("Commit {commit}"),
            BatchEvent::Cancelled => println!("Cancelled"),
        }
    })?;
    Ok(report)
}

/// `update` with the production collaborators
///
/// # Errors
/// See [`collect_requests`] and [`apply`].
pub fn run(config: &UpdateConfig, args: &UpdateArgs) -> Result<BatchReport> {
    if args.is_empty() {
        println!("Nothing to do");
        return Ok(BatchReport::default());
    }
    let tracker = GithubIssues::new(
        config.issues_api_base.as_str(),
        config.issues_repository.as_str(),
    );
    let requests = collect_requests(args, &tracker)?;
    if requests.is_empty() {
        println!("Nothing to do");
        return Ok(BatchReport::default());
    }

    let mut editor = ExternalEditor::new();
    if let Some(command) = &config.editor {
        editor = editor.with_command(command.as_str());
    }
    let vcs = GitCli::new(config.repo_root.as_path());

    apply(config, &requests, &editor, &vcs)
}
