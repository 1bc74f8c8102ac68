//! Session-level harness tests for full retrieval scenarios.
//!
//! These tests drive `run_session` against a fixture project and a scripted
//! reasoning service to verify end-to-end behavior: convergence, retry
//! exhaustion, the round bound and handling of undecodable files.

use askrepo::answer::synthesize_answer;
use askrepo::io::config::AskConfig;
use askrepo::looping::{SessionEvent, SessionStop, run_session};
use askrepo::test_support::{ScriptedReply, ScriptedService, TestProject, selection_reply};

fn three_file_project() -> TestProject {
    TestProject::with_files(&[
        ("a.py", "def a():\n    return 'a'\n"),
        ("b.py", "def b():\n    return 'b'\n"),
        ("c.py", "def c():\n    return 'c'\n"),
    ])
    .expect("project")
}

/// Converging session:
/// 1. Round 1: select a.py, b.py -> both collected
/// 2. Round 2: empty selection -> Done
/// 3. Synthesis sees exactly a.py and b.py
#[test]
fn converges_and_answers_from_selected_files() {
    let project = three_file_project();
    let service = ScriptedService::new(vec![
        selection_reply(&["a.py", "b.py"]),
        selection_reply(&[]),
        ScriptedReply::Text("a and b return their names".to_string()),
    ]);

    let outcome = run_session(
        &service,
        "what do a and b return?",
        project.path(),
        &AskConfig::default(),
        |_| {},
    )
    .expect("session");

    assert_eq!(outcome.stop, SessionStop::Converged);
    assert_eq!(outcome.rounds, 2);
    let paths: Vec<&str> = outcome.collected.paths().collect();
    assert_eq!(paths, vec!["a.py", "b.py"]);
    assert!(outcome.collected.is_subset_of(&outcome.known));

    // The second selection request lists the collected files for exclusion.
    let second = &service.requests()[1];
    let prompt = &second.conversation.messages()[1].content;
    assert!(prompt.contains("Already collected files:\na.py\nb.py\n"));
    assert!(prompt.contains("--- a.py ---"));

    let answer = synthesize_answer(&service, "what do a and b return?", &outcome.collected)
        .expect("answer");
    assert_eq!(answer, "a and b return their names");

    let requests = service.requests();
    let answer_prompt = &requests[2].conversation.messages()[1].content;
    assert!(answer_prompt.contains("--- a.py ---"));
    assert!(answer_prompt.contains("--- b.py ---"));
    assert!(!answer_prompt.contains("--- c.py ---"));
    assert_eq!(service.remaining(), 0);
}

/// Invalid paths are retried twice, then the round yields an empty selection
/// and the controller stops as if the service had converged.
#[test]
fn exhausted_selection_ends_session_like_empty_selection() {
    let project = three_file_project();
    let service = ScriptedService::new(vec![
        selection_reply(&["z.py"]),
        selection_reply(&["z.py"]),
        selection_reply(&["z.py"]),
    ]);

    let outcome = run_session(&service, "q", project.path(), &AskConfig::default(), |_| {})
        .expect("session");

    assert_eq!(
        outcome.stop,
        SessionStop::SelectionExhausted {
            problems: vec!["file z.py does not exist".to_string()],
        }
    );
    assert!(outcome.stop.should_answer());
    assert_eq!(outcome.rounds, 1);
    assert!(outcome.collected.is_empty());
    assert_eq!(service.call_count(), 3);
}

/// Exhaustion after earlier progress keeps what was already collected.
#[test]
fn exhaustion_keeps_previously_collected_files() {
    let project = three_file_project();
    let service = ScriptedService::new(vec![
        selection_reply(&["c.py"]),
        selection_reply(&["nope.py"]),
        selection_reply(&["nope.py"]),
        selection_reply(&["nope.py"]),
    ]);

    let outcome = run_session(&service, "q", project.path(), &AskConfig::default(), |_| {})
        .expect("session");

    assert!(matches!(outcome.stop, SessionStop::SelectionExhausted { .. }));
    assert_eq!(outcome.rounds, 2);
    assert_eq!(outcome.collected.get("c.py"), Some("def c():\n    return 'c'\n"));
}

/// A service that never returns an empty selection is cut off after
/// `max_iterations` rounds; nothing collected is discarded, collected files
/// are read only once and no answer request is made.
#[test]
fn never_converging_service_is_insufficient() {
    let project = three_file_project();
    let mut replies = vec![selection_reply(&["a.py"]), selection_reply(&["b.py"])];
    replies.extend((0..8).map(|_| selection_reply(&["a.py", "b.py"])));
    let service = ScriptedService::new(replies);

    let mut fetched = Vec::new();
    let outcome = run_session(&service, "q", project.path(), &AskConfig::default(), |event| {
        if let SessionEvent::Fetched { path, .. } = event {
            fetched.push((*path).to_string());
        }
    })
    .expect("session");

    assert_eq!(fetched, ["a.py", "b.py"]);

    assert_eq!(outcome.stop, SessionStop::Insufficient { max_iterations: 10 });
    assert_eq!(outcome.rounds, 10);
    assert_eq!(service.call_count(), 10);
    assert_eq!(service.remaining(), 0);
    assert_eq!(outcome.collected.len(), 2);
}

/// A non-UTF-8 file is never collected and may be proposed again later.
#[test]
fn undecodable_file_is_skipped_and_can_be_reproposed() {
    let project = three_file_project();
    project
        .write("blob.py", &[0x80, 0x81, 0xfe, 0xff])
        .expect("write blob");
    let service = ScriptedService::new(vec![
        selection_reply(&["blob.py", "a.py"]),
        selection_reply(&["blob.py"]),
        selection_reply(&[]),
    ]);

    let outcome = run_session(&service, "q", project.path(), &AskConfig::default(), |_| {})
        .expect("session");

    assert_eq!(outcome.stop, SessionStop::Converged);
    assert_eq!(outcome.rounds, 3);
    assert!(outcome.known.contains("blob.py"));
    assert!(!outcome.collected.contains("blob.py"));
    let paths: Vec<&str> = outcome.collected.paths().collect();
    assert_eq!(paths, vec!["a.py"]);
}

/// Service failures are fatal and stop the session immediately.
#[test]
fn service_error_propagates() {
    let project = three_file_project();
    let service = ScriptedService::new(vec![
        selection_reply(&["a.py"]),
        ScriptedReply::Error("HTTP 401 unauthorized".to_string()),
    ]);

    let err = run_session(&service, "q", project.path(), &AskConfig::default(), |_| {})
        .unwrap_err();
    assert!(format!("{err:#}").contains("HTTP 401"));
    assert_eq!(service.call_count(), 2);
}

/// Every selection handed to the controller names known files only and stays
/// within the per-round cap, even when the service misbehaves first.
#[test]
fn selections_stay_within_known_files_and_cap() {
    let project = three_file_project();
    let too_many: Vec<&str> = vec!["a.py"; 11];
    let service = ScriptedService::new(vec![
        selection_reply(&too_many),
        selection_reply(&["a.py", "ghost.py"]),
        selection_reply(&["a.py", "c.py"]),
        selection_reply(&[]),
    ]);

    let mut selected = Vec::new();
    let outcome = run_session(&service, "q", project.path(), &AskConfig::default(), |event| {
        if let SessionEvent::Selected { files, .. } = event {
            selected.push(files.to_vec());
        }
    })
    .expect("session");

    assert_eq!(outcome.stop, SessionStop::Converged);
    assert_eq!(selected, vec![vec!["a.py".to_string(), "c.py".to_string()]]);
    for files in &selected {
        assert!(files.len() <= 10);
        assert!(files.iter().all(|file| outcome.known.contains(file)));
    }
}
