//! Subcommands driven with scripted collaborators

use pretty_assertions::assert_eq;
use sxi_cli::check::{check, CheckOutcome};
use sxi_cli::cli::UpdateArgs;
use sxi_cli::{export, update};
use sxi_test_utils::{issue, sample_list, RecordingVcs, ScriptedEditor, StaticTracker, TempList};
use sxi_update::UpdateConfig;

#[test]
fn collect_requests_in_source_order() {
    let tracker = StaticTracker::new(vec![
        issue(8, &["instance", "instance edit"], "Edit https://searx.me", ""),
        issue(9, &["instance", "instance add"], "Add https://new.example.org", ""),
    ]);
    let args = UpdateArgs {
        github_issues: Some(vec![9]),
        add: vec!["other.example.org".to_string()],
        delete: vec!["https://searx.example.org".to_string()],
        ..UpdateArgs::default()
    };

    let requests = update::collect_requests(&args, &tracker).unwrap();
    let urls: Vec<_> = requests.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://new.example.org",
            "https://other.example.org",
            "https://searx.example.org",
        ]
    );
}

#[test]
fn without_issue_flag_tracker_is_not_queried() {
    let tracker = StaticTracker::new(vec![issue(
        1,
        &["instance", "instance add"],
        "Add https://a.example.org",
        "",
    )]);
    let args = UpdateArgs::default();
    assert!(args.is_empty());
    assert!(update::collect_requests(&args, &tracker).unwrap().is_empty());
}

#[test]
fn update_without_sources_does_nothing() {
    let temp = TempList::new(&sample_list());
    let config = UpdateConfig::new()
        .with_list_path(temp.path())
        .with_issues("http://127.0.0.1:9", "searx/searx-instances");
    let before = temp.text();

    let report = update::run(&config, &UpdateArgs::default()).unwrap();
    assert!(report.committed.is_empty());
    assert!(report.cancelled.is_none());
    assert_eq!(temp.text(), before);
}

#[test]
fn apply_leaves_a_normalized_list() {
    let temp = TempList::new(&sample_list());
    let config = UpdateConfig::new().with_list_path(temp.path());
    let args = UpdateArgs {
        add: vec!["https://a.example.org".to_string()],
        ..UpdateArgs::default()
    };
    let requests = update::collect_requests(&args, &StaticTracker::default()).unwrap();

    let editor = ScriptedEditor::new().keep();
    let vcs = RecordingVcs::new();
    let report = update::apply(&config, &requests, &editor, &vcs).unwrap();

    assert_eq!(report.committed.len(), 1);
    assert_eq!(check(&temp.file).unwrap(), CheckOutcome::Normalized);
    assert!(temp.text().ends_with("https://a.example.org: {}\n"));
}

#[test]
fn export_sorts_keys_and_fills_fields() {
    let temp = TempList::new(&sample_list());
    let json = export::to_json(&temp.file).unwrap();

    let expected = r#"{
  "https://searx.example.org": {
    "additional_urls": {},
    "comments": [],
    "safe": null
  },
  "https://searx.me": {
    "additional_urls": {
      "http://searxme2v3cqhlfw.onion": "Hidden Service"
    },
    "comments": [
      "maintained by the searx team"
    ],
    "safe": true
  }
}"#;
    assert_eq!(json, expected);
}

#[test]
fn export_to_file() {
    let temp = TempList::new(&sample_list());
    let output = temp.dir.path().join("instances.json");
    export::run(&temp.file, Some(&output)).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("{\n  \"https://searx.example.org\""));
    assert!(written.ends_with("}\n"));
}
