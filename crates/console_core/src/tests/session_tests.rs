use super::*;
use crate::{
    error::FailureCause,
    test_support::{sample_patterns, socratic, terse, ScriptedCompletion, SwappableStore},
};

fn session_with(store: SwappableStore, completion: ScriptedCompletion) -> ConsoleSession {
    ConsoleSession::new(Arc::new(store), Arc::new(completion))
}

#[tokio::test]
async fn select_then_chat_round_trip() {
    let completion = ScriptedCompletion::replying(&["Hello."]);
    let mut session = session_with(SwappableStore::with(sample_patterns()), completion.clone());

    let patterns = session.refresh_patterns().await.expect("patterns");
    assert_eq!(patterns.len(), 2);

    let outcome = session.toggle_by_id(PatternId(2), true);
    assert_eq!(outcome, ToggleOutcome::Selected { displaced: None });
    assert_eq!(session.active_instruction(), "Be terse");

    let reply = session.submit("hi").await.expect("reply");
    assert_eq!(reply, "Hello.");

    let snapshot = session.snapshot();
    assert_eq!(
        snapshot.messages,
        vec![ChatMessage::user("hi"), ChatMessage::assistant("Hello.")]
    );
    assert!(snapshot.is_checked(PatternId(2)));
    assert!(!snapshot.is_checked(PatternId(1)));
    assert_eq!(snapshot.active_pattern(), Some(&terse()));
    assert_eq!(completion.calls().await[0].system_instruction, "Be terse");
}

#[tokio::test]
async fn submit_before_selection_is_rejected() {
    let mut session = session_with(
        SwappableStore::with(sample_patterns()),
        ScriptedCompletion::replying(&["unused"]),
    );
    session.refresh_patterns().await.expect("patterns");

    let err = session.submit("hello").await.expect_err("no selection");

    assert_eq!(err, SubmitError::NoPatternSelected);
    assert!(session.snapshot().messages.is_empty());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_list() {
    let store = SwappableStore::with(sample_patterns());
    let mut session = session_with(store.clone(), ScriptedCompletion::default());
    session.refresh_patterns().await.expect("patterns");

    store.fail("connection refused").await;
    let err = session.refresh_patterns().await.expect_err("store down");

    assert_eq!(err.reason, "connection refused");
    assert_eq!(session.state().patterns(), sample_patterns().as_slice());
}

#[tokio::test]
async fn refresh_dropping_selected_pattern_blocks_submission() {
    let store = SwappableStore::with(sample_patterns());
    let completion = ScriptedCompletion::replying(&["unused"]);
    let mut session = session_with(store.clone(), completion.clone());
    session.refresh_patterns().await.expect("patterns");
    session.toggle_by_id(PatternId(1), true);

    store.set(vec![terse()]).await;
    session.refresh_patterns().await.expect("patterns");

    let snapshot = session.snapshot();
    assert!(snapshot.selection_stale);
    assert_eq!(snapshot.active_selection, None);
    assert_eq!(snapshot.active_instruction, "");
    assert!(!session.is_checked(PatternId(1)));
    assert_eq!(
        session.submit("hello").await.expect_err("stale"),
        SubmitError::NoPatternSelected
    );
    assert!(completion.calls().await.is_empty());

    session.toggle_by_id(PatternId(2), true);
    assert!(!session.snapshot().selection_stale);
    assert_eq!(session.active_instruction(), "Be terse");
}

#[tokio::test]
async fn toggle_by_unknown_id_is_ignored() {
    let mut session = session_with(
        SwappableStore::with(sample_patterns()),
        ScriptedCompletion::default(),
    );
    session.refresh_patterns().await.expect("patterns");
    session.toggle_by_id(PatternId(1), true);

    assert_eq!(session.toggle_by_id(PatternId(42), true), ToggleOutcome::Ignored);
    assert!(session.is_checked(PatternId(1)));
}

#[tokio::test]
async fn reset_starts_a_new_session_but_keeps_patterns() {
    let mut session = session_with(
        SwappableStore::with(sample_patterns()),
        ScriptedCompletion::replying(&["Hi there."]),
    );
    session.refresh_patterns().await.expect("patterns");
    session.toggle_by_id(PatternId(1), true);
    session.submit("hello").await.expect("reply");
    let before = session.state().session_id();

    session.reset();

    assert_ne!(session.state().session_id(), before);
    assert_eq!(
        session.snapshot(),
        SessionSnapshot {
            patterns: vec![socratic(), terse()],
            ..SessionSnapshot::default()
        }
    );
}

#[tokio::test]
async fn unconfigured_settings_degrade_to_reported_failures() {
    let mut session = ConsoleSession::from_settings(&Settings::default());

    let err = session.refresh_patterns().await.expect_err("no store");
    assert_eq!(err.reason, "SUPABASE_URL is not configured");

    session.toggle(PatternId(1), "Be Socratic", true);
    let err = session.submit("hello").await.expect_err("no api key");
    match err {
        SubmitError::CompletionFailed(failed) => {
            assert_eq!(failed.cause, FailureCause::Auth);
            assert!(failed.message.contains("ANTHROPIC_API_KEY"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.snapshot().messages, vec![ChatMessage::user("hello")]);
}

#[tokio::test]
async fn blank_pattern_text_leaves_no_instruction() {
    let rows: Vec<shared::protocol::PatternRow> =
        serde_json::from_str(r#"[{"id": 7, "file_name": "empty", "patterns": ""}]"#)
            .expect("rows");
    let completion = ScriptedCompletion::replying(&["unused"]);
    let mut session = ConsoleSession::new(
        Arc::new(crate::store::StaticPatternStore::from_rows(rows)),
        Arc::new(completion.clone()),
    );
    session.refresh_patterns().await.expect("patterns");

    session.toggle_by_id(PatternId(7), true);
    assert_eq!(session.active_instruction(), "");

    let err = session.submit("hi").await.expect_err("blank instruction");
    assert_eq!(err, SubmitError::NoPatternSelected);
    assert!(session.snapshot().messages.is_empty());
    assert!(completion.calls().await.is_empty());
}
