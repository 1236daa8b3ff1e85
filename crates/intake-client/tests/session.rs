//! Session flows against in-process and HTTP backends.

use std::sync::Arc;
use std::time::Duration;

use intake_client::{
    DirectBackend, FollowUpOutcome, HttpBackend, IntakeBackend, Session, SummaryState,
    LAST_SUMMARY_KEY,
};
use intake_core::{
    FileStore, IntakeError, IntakeField, KeyValueStore, MemoryStore, FORM_KEY, HISTORY_KEY,
};
use mock_provider::{DelayedProvider, FailingProvider, ScriptedProvider};

const MODEL: &str = "test-model";

const SUMMARY_JSON: &str = r#"{"summary":"A mild headache that started this morning.","possibleConditions":[{"name":"Tension headache","description":"..."}],"selfCare":["Hydrate"],"warningSign":[]}"#;

fn fill_required<S: KeyValueStore>(session: &mut Session<S>) {
    session.set_field(IntakeField::Sex, "Female").unwrap();
    session
        .set_field(IntakeField::AgeGroup, "Adult (18–39)")
        .unwrap();
    session.set_field(IntakeField::Email, "a@b.com").unwrap();
    session
        .set_field(IntakeField::Symptoms, "mild headache since this morning")
        .unwrap();
}

#[tokio::test]
async fn test_full_flow_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let backend = DirectBackend::new(
        ScriptedProvider::sequence([SUMMARY_JSON, "Drink water.", "Rest in a dark room."]),
        MODEL,
    );

    let mut session = Session::open(FileStore::open(&path).unwrap()).unwrap();
    fill_required(&mut session);

    match session.request_summary(&backend).await.unwrap() {
        SummaryState::Ready(result) => assert!(result.uses_fallback_warning_signs()),
        other => panic!("expected a summary, got {other:?}"),
    }

    session.ask(&backend, "What helps?").await.unwrap();
    session.ask(&backend, "Anything else?").await.unwrap();

    let requests = backend.provider().requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[2]
        .user_prompt
        .contains("A mild headache that started this morning."));

    let form = session.form().clone();
    drop(session);

    let reopened = Session::open(FileStore::open(&path).unwrap()).unwrap();
    assert_eq!(reopened.form(), &form);
    assert_eq!(reopened.history().len(), 2);
    assert_eq!(reopened.history()[0].question, "What helps?");
    assert_eq!(reopened.history()[1].answer, "Rest in a dark room.");
    assert_eq!(
        reopened.summary_text(),
        Some("A mild headache that started this morning.")
    );
}

#[tokio::test]
async fn test_missing_required_fields_never_reach_provider() {
    let backend = DirectBackend::new(ScriptedProvider::always(SUMMARY_JSON), MODEL);
    let mut session = Session::open(MemoryStore::new()).unwrap();
    session.set_field(IntakeField::Sex, "Male").unwrap();

    let err = session.request_summary(&backend).await.unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(backend.provider().call_count(), 0);
    assert!(matches!(session.summary(), SummaryState::Idle));
}

#[tokio::test]
async fn test_blank_question_rejected() {
    let backend = DirectBackend::new(ScriptedProvider::always("unused"), MODEL);
    let mut session = Session::open(MemoryStore::new()).unwrap();

    for question in ["", "   ", "\n\t"] {
        let err = session.ask(&backend, question).await.unwrap_err();
        assert!(err.to_string().contains("Question is required"));
    }
    assert_eq!(backend.provider().call_count(), 0);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_failed_follow_up_keeps_draft_and_history() {
    let backend = DirectBackend::new(FailingProvider::timeout(), MODEL);
    let mut storage = MemoryStore::new();
    storage
        .set(
            HISTORY_KEY,
            r#"[{"question":"Earlier?","answer":"Yes.","timestamp":"2026-01-01T10:00:00Z"}]"#
                .to_string(),
        )
        .unwrap();
    let mut session = Session::open(storage).unwrap();

    let outcome = session.ask(&backend, "Should I worry?").await.unwrap();
    match outcome {
        FollowUpOutcome::Failed(err) => assert!(err.is_retryable()),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(session.draft_question(), "Should I worry?");
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_failed_summary_offers_retry() {
    let backend = DirectBackend::new(ScriptedProvider::sequence(["not json", SUMMARY_JSON]), MODEL);
    let mut session = Session::open(MemoryStore::new()).unwrap();
    fill_required(&mut session);

    match session.request_summary(&backend).await.unwrap() {
        SummaryState::Failed(err) => assert_eq!(err.kind(), "parse"),
        other => panic!("expected parse failure, got {other:?}"),
    }
    assert!(session.storage().get(LAST_SUMMARY_KEY).unwrap().is_none());

    assert!(matches!(
        session.request_summary(&backend).await.unwrap(),
        SummaryState::Ready(_)
    ));
}

#[tokio::test]
async fn test_out_of_order_answers_keep_latest_only() {
    let slow = DirectBackend::new(
        DelayedProvider::with_millis(ScriptedProvider::always("first answer"), 50),
        MODEL,
    );
    let fast = DirectBackend::new(ScriptedProvider::always("second answer"), MODEL);
    let mut session = Session::open(MemoryStore::new()).unwrap();
    let record = session.form().clone();

    let first = session.begin_follow_up("First?").unwrap();
    let second = session.begin_follow_up("Second?").unwrap();

    let (first_answer, second_answer) = tokio::join!(
        slow.follow_up("First?", &record, None),
        fast.follow_up("Second?", &record, None),
    );

    let outcome = session
        .finish_follow_up(second, "Second?", second_answer)
        .unwrap();
    assert!(matches!(outcome, FollowUpOutcome::Answered(ref e) if e.answer == "second answer"));

    let outcome = session
        .finish_follow_up(first, "First?", first_answer)
        .unwrap();
    assert!(matches!(outcome, FollowUpOutcome::Discarded));

    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].question, "Second?");
}

#[tokio::test]
async fn test_clear_during_pending_request_drops_answer() {
    let backend = DirectBackend::new(ScriptedProvider::always("late"), MODEL);
    let mut session = Session::open(MemoryStore::new()).unwrap();
    let record = session.form().clone();

    let ticket = session.begin_follow_up("Still there?").unwrap();
    let answer = backend.follow_up("Still there?", &record, None).await;
    session.clear_history().unwrap();

    let outcome = session
        .finish_follow_up(ticket, "Still there?", answer)
        .unwrap();
    assert!(matches!(outcome, FollowUpOutcome::Discarded));
    assert!(session.history().is_empty());
    assert!(session.storage().get(HISTORY_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_stale_summary_dropped() {
    let mut session = Session::open(MemoryStore::new()).unwrap();
    fill_required(&mut session);

    let first = session.begin_summary().unwrap();
    let second = session.begin_summary().unwrap();

    let applied = session
        .finish_summary(second, Err(IntakeError::Validation("x".to_string())))
        .unwrap();
    assert!(applied);

    let late = intake_core::SummaryOutcome::parse(SUMMARY_JSON)
        .parsed()
        .cloned()
        .unwrap();
    assert!(!session.finish_summary(first, Ok(late)).unwrap());
    assert!(matches!(session.summary(), SummaryState::Failed(_)));
}

#[tokio::test]
async fn test_failed_summary_is_not_restored_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let backend = DirectBackend::new(ScriptedProvider::sequence([SUMMARY_JSON, "not json"]), MODEL);

    let mut session = Session::open(FileStore::open(&path).unwrap()).unwrap();
    fill_required(&mut session);
    session.request_summary(&backend).await.unwrap();
    assert!(session.summary_text().is_some());

    assert!(matches!(
        session.request_summary(&backend).await.unwrap(),
        SummaryState::Failed(_)
    ));
    drop(session);

    let reopened = Session::open(FileStore::open(&path).unwrap()).unwrap();
    assert!(reopened.summary_text().is_none());
    assert!(reopened.storage().get(LAST_SUMMARY_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_editing_form_drops_cached_summary() {
    let backend = DirectBackend::new(ScriptedProvider::always(SUMMARY_JSON), MODEL);
    let mut session = Session::open(MemoryStore::new()).unwrap();
    fill_required(&mut session);
    session.request_summary(&backend).await.unwrap();
    assert!(session.summary_text().is_some());

    session
        .set_field(IntakeField::Symptoms, "sharp chest pain")
        .unwrap();

    assert!(session.summary_text().is_none());
    assert!(session.storage().get(LAST_SUMMARY_KEY).unwrap().is_none());

    session.ask(&backend, "Should I worry?").await.unwrap();
    let prompt = backend.provider().last_request().unwrap().user_prompt;
    assert!(prompt.contains("No previous summary available"));
    assert!(!prompt.contains("A mild headache that started this morning."));
}

#[tokio::test]
async fn test_clear_form_resets_summary() {
    let backend = DirectBackend::new(ScriptedProvider::always(SUMMARY_JSON), MODEL);
    let mut session = Session::open(MemoryStore::new()).unwrap();
    fill_required(&mut session);
    session.request_summary(&backend).await.unwrap();

    session.clear_form().unwrap();

    assert!(session.form().is_empty());
    assert!(session.summary_text().is_none());
    assert!(session.storage().get(FORM_KEY).unwrap().is_none());
    assert!(session.storage().get(LAST_SUMMARY_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_http_backend_against_running_api() {
    let provider = Arc::new(ScriptedProvider::sequence([SUMMARY_JSON, "Hydrate and rest."]));
    let app = intake_api::app(intake_api::AppState::new(provider.clone(), MODEL));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = HttpBackend::new(format!("http://{addr}/"), Duration::from_secs(5)).unwrap();
    let mut session = Session::open(MemoryStore::new()).unwrap();

    let err = backend
        .follow_up("  ", session.form(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Validation(ref m) if m == "Question is required"));

    fill_required(&mut session);
    match session.request_summary(&backend).await.unwrap() {
        SummaryState::Ready(result) => {
            assert_eq!(result.possible_conditions[0].name, "Tension headache");
        }
        other => panic!("expected a summary, got {other:?}"),
    }

    let outcome = session.ask(&backend, "Can I take ibuprofen?").await.unwrap();
    assert!(matches!(outcome, FollowUpOutcome::Answered(ref e) if e.answer == "Hydrate and rest."));

    let follow_up = provider.last_request().unwrap();
    assert!(follow_up
        .user_prompt
        .contains("A mild headache that started this morning."));
    assert!(!follow_up.user_prompt.contains("a@b.com"));
}

#[tokio::test]
async fn test_http_backend_unreachable_is_retryable() {
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let mut session = Session::open(MemoryStore::new()).unwrap();
    fill_required(&mut session);

    match session.request_summary(&backend).await.unwrap() {
        SummaryState::Failed(err) => {
            assert_eq!(err.kind(), "provider");
            assert!(err.is_retryable());
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
