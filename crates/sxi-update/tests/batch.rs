//! Batch behaviour with scripted editor and version control

use pretty_assertions::assert_eq;
use sxi_model::{codec, InstanceList};
use sxi_test_utils::{issue, sample_list, RecordingVcs, ScriptedEditor, StaticTracker, TempList};
use sxi_update::{
    run_requests, run_requests_with, source, BatchEvent, IssueTracker, RequestKind, UpdateError,
    UserRequest,
};

fn add(url: &str) -> UserRequest {
    UserRequest::new(RequestKind::Add, url)
}

#[test]
fn accepted_requests_commit_one_by_one() {
    let mut list = sample_list();
    let temp = TempList::new(&list);
    let editor = ScriptedEditor::new().keep().keep();
    let vcs = RecordingVcs::new();

    let requests = [add("https://a.example.org"), add("https://b.example.org")];
    let report = run_requests(&mut list, &requests, &editor, &vcs, &temp.file).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.committed.len(), 2);
    assert_eq!(report.committed[1].commit, "c2");
    assert_eq!(
        vcs.calls(),
        vec!["stage instances.yml", "commit", "stage instances.yml", "commit"]
    );
    assert_eq!(
        vcs.commits(),
        vec!["Add https://a.example.org\n", "Add https://b.example.org\n"]
    );
    assert_eq!(temp.file.load().unwrap(), list);
    assert_eq!(list.len(), 4);
}

#[test]
fn precondition_failure_stops_the_batch() {
    let mut list = sample_list();
    let temp = TempList::new(&list);
    let editor = ScriptedEditor::new().keep().keep().keep();
    let vcs = RecordingVcs::new().dirty_at(1);

    let requests = [
        add("https://a.example.org"),
        add("https://b.example.org"),
        add("https://c.example.org"),
    ];
    let err = run_requests(&mut list, &requests, &editor, &vcs, &temp.file).unwrap_err();

    assert!(matches!(err, UpdateError::PreconditionFailed(_)));
    assert_eq!(vcs.commits().len(), 1);
    // the second request was never drafted, so neither was the third
    assert_eq!(editor.calls(), 1);
    assert!(list.contains("https://a.example.org"));
    assert!(!list.contains("https://b.example.org"));
}

#[test]
fn staged_files_fail_before_the_first_request() {
    let mut list = sample_list();
    let temp = TempList::new(&list);
    let editor = ScriptedEditor::new().keep();
    let vcs = RecordingVcs::new().staged_at(0);

    let err = run_requests(&mut list, &[add("https://a.example.org")], &editor, &vcs, &temp.file)
        .unwrap_err();

    assert_eq!(err.to_string(), "precondition failed: there are 1 staged file(s)");
    assert_eq!(editor.calls(), 0);
}

#[test]
fn cancellation_halts_without_changes() {
    let mut list = sample_list();
    let temp = TempList::new(&list);
    let before = temp.text();
    let editor = ScriptedEditor::new().reply("\n");
    let vcs = RecordingVcs::new();

    let requests = [add("https://a.example.org"), add("https://b.example.org")];
    let report = run_requests(&mut list, &requests, &editor, &vcs, &temp.file).unwrap();

    assert!(report.committed.is_empty());
    assert_eq!(report.cancelled.as_deref(), Some("Add https://a.example.org"));
    assert_eq!(editor.calls(), 1);
    assert!(vcs.commits().is_empty());
    assert_eq!(vcs.checkouts(), 1);
    assert_eq!(temp.text(), before);
    assert_eq!(list, sample_list());
}

#[test]
fn retry_keeps_the_human_edits() {
    let mut list = sample_list();
    let temp = TempList::new(&list);
    // first answer collides with an existing additional URL
    let editor = ScriptedEditor::new()
        .reply("https://new.example.org:\n  additional_urls:\n    http://searxme2v3cqhlfw.onion: Mirror\n\n# Add https://new.example.org\n")
        .keep()
        .reply("https://new.example.org:\n  comments:\n  - fixed\n\n# Add https://new.example.org\n");
    let vcs = RecordingVcs::new();

    let report = run_requests(
        &mut list,
        &[add("https://new.example.org")],
        &editor,
        &vcs,
        &temp.file,
    )
    .unwrap();

    let shown = editor.shown();
    assert_eq!(shown.len(), 3);
    assert!(shown[1].contains("additional_urls:\n    http://searxme2v3cqhlfw.onion: Mirror"));
    assert!(shown[1].contains("## http://searxme2v3cqhlfw.onion already declared"));
    // kept buffer came back with its error block, which was stripped and replaced
    assert_eq!(shown[2].matches("## -- ERROR").count(), 1);
    assert_eq!(report.committed.len(), 1);
    assert_eq!(
        list.get("https://new.example.org").unwrap().comments,
        vec!["fixed".to_string()]
    );
}

#[test]
fn edit_of_unknown_url_is_fatal_and_rolls_back() {
    let mut list = sample_list();
    let temp = TempList::new(&list);
    let editor = ScriptedEditor::new().keep();
    let vcs = RecordingVcs::new();

    let requests = [UserRequest::new(RequestKind::Edit, "https://missing.example.org")];
    let err = run_requests(&mut list, &requests, &editor, &vcs, &temp.file).unwrap_err();

    assert!(matches!(err, UpdateError::UnknownInstance(ref url) if url == "https://missing.example.org"));
    assert_eq!(editor.calls(), 0);
    assert_eq!(vcs.calls(), vec!["checkout instances.yml"]);
}

#[test]
fn editor_unavailable_stops_the_batch() {
    let mut list = InstanceList::new();
    let temp = TempList::new(&list);
    let editor = ScriptedEditor::new().unavailable();
    let vcs = RecordingVcs::new();

    let err = run_requests(&mut list, &[add("https://a.example.org")], &editor, &vcs, &temp.file)
        .unwrap_err();
    assert!(matches!(err, UpdateError::EditorUnavailable(_)));
}

#[test]
fn delete_and_edit_write_canonical_text() {
    let mut list = sample_list();
    let temp = TempList::new(&list);
    let editor = ScriptedEditor::new()
        .keep()
        .reply("https://searx.me:\n  safe: false\n\n# Edit https://searx.me\n");
    let vcs = RecordingVcs::new();

    let requests = [
        UserRequest::new(RequestKind::Delete, "https://searx.example.org"),
        UserRequest::new(RequestKind::Edit, "https://searx.me"),
    ];
    let mut events = Vec::new();
    let report = run_requests_with(&mut list, &requests, &editor, &vcs, &temp.file, &mut |e: &BatchEvent| {
        events.push(e.clone());
    })
    .unwrap();

    assert_eq!(report.committed.len(), 2);
    assert_eq!(temp.text(), "https://searx.me:\n  safe: false\n");
    assert_eq!(codec::decode(&temp.text()).unwrap(), list);
    assert_eq!(
        events,
        vec![
            BatchEvent::Started {
                kind: RequestKind::Delete,
                url: "https://searx.example.org".to_string()
            },
            BatchEvent::Committed {
                commit: "c1".to_string()
            },
            BatchEvent::Started {
                kind: RequestKind::Edit,
                url: "https://searx.me".to_string()
            },
            BatchEvent::Committed {
                commit: "c2".to_string()
            },
        ]
    );
}

#[test]
fn issues_feed_the_batch_with_closing_commit_messages() {
    let tracker = StaticTracker::new(vec![
        issue(3, &["instance", "instance add"], "Add https://a.example.org", "<!-- help -->\nhello"),
        issue(4, &["question"], "How do I add https://b.example.org", ""),
    ]);
    let requests = source::requests_from_issues(&tracker.open_issues().unwrap(), &[]);
    assert_eq!(requests.len(), 1);

    let mut list = sample_list();
    let temp = TempList::new(&list);
    let editor = ScriptedEditor::new().keep();
    let vcs = RecordingVcs::new();
    let report = run_requests(&mut list, &requests, &editor, &vcs, &temp.file).unwrap();

    assert_eq!(report.committed[0].id.as_deref(), Some("3"));
    assert_eq!(
        vcs.commits(),
        vec!["Add https://a.example.org\n\nClose https://github.com/searxng/searx-instances/issues/3\nFrom @someone\n"]
    );
    assert!(editor.shown()[0].contains("#> hello\n"));
}
