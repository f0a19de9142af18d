use std::sync::Arc;
use surveyor_core::model::{Catalog, Target};
use surveyor_core::sink::SubmissionSink;
use surveyor_core::state::{EMPTY_FORM_MESSAGE, UiState};
use surveyor_runtime::{FormSession, MemorySubmissionStore};
use surveyor_test::{FailingSink, Fetch, ScriptedSource, assert_error, assert_in_progress, assert_submitted, catalogs};

type Session = FormSession<Arc<ScriptedSource>, Arc<MemorySubmissionStore>>;

fn session_for(catalog: Catalog) -> (Session, Arc<MemorySubmissionStore>) {
    let store = Arc::new(MemorySubmissionStore::new());
    let session = FormSession::new(Arc::new(ScriptedSource::always(catalog)), Arc::clone(&store));
    (session, store)
}

#[tokio::test]
async fn loads_first_question_in_catalog_order() {
    let (mut session, _) = session_for(catalogs::branching());
    let state = session.load().await;
    assert_in_progress!(state, "name");
    assert!(state.answers().unwrap().is_empty());
}

#[tokio::test]
async fn two_step_form_submits_collected_answers() {
    let (mut session, store) = session_for(catalogs::two_step());
    session.load().await;

    let state = session.advance("Q1", "foo").await;
    assert_in_progress!(state, "Q2");
    let answers: Vec<_> = state.answers().unwrap().iter().collect();
    assert_eq!(answers, vec![("Q1", "foo")]);

    let state = session.advance("Q2", "bar").await;
    assert_submitted!(state);

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    let persisted: Vec<_> = records[0].answers.iter().collect();
    assert_eq!(persisted, vec![("Q1", "foo"), ("Q2", "bar")]);
}

#[tokio::test]
async fn self_loop_submits_immediately() {
    let (mut session, store) = session_for(catalogs::self_loop());
    session.load().await;

    assert_submitted!(session.advance("Q1", "x").await);
    let records = store.list_all().await.unwrap();
    assert_eq!(records[0].answers.get("Q1"), Some("x"));
    assert_eq!(records[0].answers.len(), 1);
}

#[tokio::test]
async fn dangling_target_submits() {
    let (mut session, store) = session_for(catalogs::dangling());
    session.load().await;

    assert_submitted!(session.advance("Q1", "v").await);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn empty_catalog_is_an_error() {
    let (mut session, store) = session_for(catalogs::empty());
    let state = session.load().await;
    assert_error!(state, EMPTY_FORM_MESSAGE);

    assert_error!(session.advance("Q1", "x").await);
    assert!(store.is_empty());
}

#[tokio::test]
async fn fetch_failure_carries_message() {
    let store = Arc::new(MemorySubmissionStore::new());
    let mut session = FormSession::new(Arc::new(ScriptedSource::failing("offline")), store);
    let state = session.load().await;
    assert_error!(state, "failed to reach form source: offline");
}

#[tokio::test]
async fn skip_on_unskippable_question_changes_nothing() {
    let (mut session, store) = session_for(catalogs::two_step());
    let before = session.load().await;
    let after = session.skip().await;
    assert_eq!(before, after);
    assert!(store.is_empty());
}

#[tokio::test]
async fn skip_follows_skip_target_without_answering() {
    let (mut session, _) = session_for(catalogs::branching());
    session.load().await;
    session.advance("name", "Ada").await;

    let state = session.skip().await;
    assert_in_progress!(state, "pets");
    assert!(!state.answers().unwrap().contains("age"));

    assert_submitted!(session.skip().await);
}

#[tokio::test]
async fn sink_failure_becomes_error_state() {
    let sink = Arc::new(FailingSink::new());
    let mut session = FormSession::new(
        Arc::new(ScriptedSource::always(catalogs::self_loop())),
        Arc::clone(&sink),
    );
    session.load().await;

    let state = session.advance("Q1", "x").await;
    assert_error!(state, "Failed to save answers: submission store error: disk full");
    assert_eq!(sink.attempts(), 1);
}

#[tokio::test]
async fn reload_starts_with_fresh_answers() {
    let (mut session, store) = session_for(catalogs::two_step());
    session.load().await;
    session.advance("Q1", "first").await;
    session.advance("Q2", "run").await;

    let state = session.load().await;
    assert_in_progress!(state, "Q1");
    assert!(state.answers().unwrap().is_empty());

    session.advance("Q1", "second").await;
    session.advance("Q2", "run").await;

    let records = store.list_all().await.unwrap();
    assert_eq!(records[0].answers.get("Q1"), Some("second"));
    assert_eq!(records[1].answers.get("Q1"), Some("first"));
    assert!(records[0].id > records[1].id);
}

#[tokio::test]
async fn subscribers_see_each_published_state() {
    let source = Arc::new(ScriptedSource::new([
        Fetch::Fail("offline".into()),
        Fetch::Catalog(catalogs::two_step()),
    ]));
    let mut session = FormSession::new(Arc::clone(&source), Arc::new(MemorySubmissionStore::new()));
    let mut states = session.subscribe();
    assert_eq!(*states.borrow_and_update(), UiState::Loading);

    session.load().await;
    assert!(states.has_changed().unwrap());
    assert!(states.borrow_and_update().is_terminal());

    session.load().await;
    let state = states.borrow_and_update().clone();
    assert_in_progress!(state, "Q1");
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn backward_jump_revisits_question_and_overwrites() {
    use surveyor_test::catalogs::text;
    let catalog = Catalog::new(vec![
        text("a").refer_to(Target::question("b")),
        text("b").refer_to(Target::question("a")).skip_to(Target::Submit),
    ]);
    let (mut session, store) = session_for(catalog);
    session.load().await;

    session.advance("a", "1").await;
    assert_in_progress!(session.advance("b", "2").await, "a");
    session.advance("a", "3").await;
    assert_submitted!(session.skip().await);

    let records = store.list_all().await.unwrap();
    let persisted: Vec<_> = records[0].answers.iter().collect();
    assert_eq!(persisted, vec![("a", "3"), ("b", "2")]);
}
