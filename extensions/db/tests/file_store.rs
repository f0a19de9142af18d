use surveyor_core::answer::AnswerSet;
use surveyor_core::sink::SubmissionSink;
use surveyor_db::SqliteSubmissionStore;

fn url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}", dir.path().join("surveyor.db").display())
}

#[tokio::test]
async fn creates_database_file_on_first_connect() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteSubmissionStore::connect(&url(&dir)).await.unwrap();

    assert!(dir.path().join("surveyor.db").exists());
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn submissions_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let answers: AnswerSet = [("Q1", "foo"), ("Q2", "bar")].into_iter().collect();

    let first_id = {
        let store = SqliteSubmissionStore::connect(&url(&dir)).await.unwrap();
        let record = store.persist(&answers).await.unwrap();
        store.pool().close().await;
        record.id
    };

    let store = SqliteSubmissionStore::connect(&url(&dir)).await.unwrap();
    assert_eq!(store.subscribe().borrow().len(), 1);

    let second = store.persist(&answers).await.unwrap();
    assert!(second.id > first_id);

    let listed = store.list_all().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].answers, answers);
}

#[tokio::test]
async fn two_stores_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SqliteSubmissionStore::connect(&url(&dir)).await.unwrap();
    let reader = SqliteSubmissionStore::connect(&url(&dir)).await.unwrap();

    writer
        .persist(&[("q", "v")].into_iter().collect())
        .await
        .unwrap();

    let listed = reader.list_all().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].answers.get("q"), Some("v"));
}
