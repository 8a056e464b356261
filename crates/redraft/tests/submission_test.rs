//! Form submission tests with in-memory collaborators and SQLite data sources.

use async_trait::async_trait;
use redraft::{
    BoundStatement, ConnectionConfig, DataSourceBuilder, DispatchError, DispatchErrorKind,
    Dispatcher, ExecutionOutcome, FormSubmission, FormView, FormViewBuilder, InMemoryViewStore,
    RecordingRefreshQueue, Requester, RequesterBuilder, SourceQueryBuilder, StatementExecutor,
    SubmissionErrorKind,
};
use serde_json::{Map, Value, json};
use sqlx::{Connection, SqliteConnection};
use tempfile::TempDir;

const QUERY: &str = "SELECT id, name FROM users WHERE active = true";

async fn users_database(dir: &TempDir) -> ConnectionConfig {
    let path = dir.path().join("forms.sqlite");
    let mut conn = SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap();
    for statement in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL)",
        "INSERT INTO users (id, name, active) VALUES (7, 'Bob', 1), (8, 'Carol', 0)",
    ] {
        sqlx::query(statement).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
    ConnectionConfig::new().with("dbpath", path.to_string_lossy().to_string())
}

fn view(engine: &str, configuration: ConnectionConfig, options: Value) -> FormView {
    FormViewBuilder::default()
        .id("users-form")
        .options(options)
        .query(
            SourceQueryBuilder::default()
                .id(11)
                .query_text(QUERY)
                .data_source(
                    DataSourceBuilder::default()
                        .id(3)
                        .name("warehouse")
                        .engine(engine)
                        .configuration(configuration)
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn mapping() -> Value {
    json!({"columnMapping": {"id": "id", "name": "field"}})
}

fn requester() -> Requester {
    RequesterBuilder::default()
        .id(5)
        .email("ana@example.com")
        .display_name("Ana")
        .build()
        .unwrap()
}

fn values(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

async fn store_with(view: FormView) -> InMemoryViewStore {
    let store = InMemoryViewStore::new();
    store.insert(view).await;
    store
}

#[tokio::test]
async fn test_submission_writes_and_schedules_refresh() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;
    let queue = RecordingRefreshQueue::new();
    let submission = FormSubmission::new(
        store_with(view("sqlite", config, mapping())).await,
        queue.clone(),
        Dispatcher::new(),
    );

    let response = submission
        .submit("users-form", &requester(), &values(json!({"id": 7, "name": "Alice"})))
        .await
        .unwrap();

    assert_eq!(response.data().rows().len(), 1);
    assert_eq!(response.data().rows()[0]["name"], json!("Alice"));
    assert_eq!(response.job().status(), "queued");

    let requests = queue.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_text(), QUERY);
    assert_eq!(*requests[0].data_source_id(), 3);
    assert_eq!(requests[0].metadata()["Username"], "ana@example.com");
    assert_eq!(requests[0].metadata()["query_id"], 11);

    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["data"]["rows"][0]["id"], json!(7));
    assert!(body["job"]["id"].is_string());
}

#[tokio::test]
async fn test_unsupported_engine_is_rejected_with_source_details() {
    let queue = RecordingRefreshQueue::new();
    let submission = FormSubmission::new(
        store_with(view("bigquery", ConnectionConfig::new(), mapping())).await,
        queue.clone(),
        Dispatcher::new(),
    );

    let err = submission
        .submit("users-form", &requester(), &values(json!({"id": 7, "name": "Alice"})))
        .await
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &SubmissionErrorKind::InvalidDataSource(
            "Datasource 'warehouse' with id '3' is invalid: Datasource type 'bigquery' not supported"
                .to_string()
        )
    );
    assert!(err.kind().is_client_error());
    assert!(queue.requests().await.is_empty());
}

#[tokio::test]
async fn test_unknown_view_is_not_found() {
    let submission = FormSubmission::new(
        InMemoryViewStore::new(),
        RecordingRefreshQueue::new(),
        Dispatcher::new(),
    );

    let err = submission
        .submit("missing", &requester(), &Map::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &SubmissionErrorKind::ViewNotFound("Form view 'missing' not found".to_string())
    );
    assert!(!err.kind().is_client_error());
}

#[tokio::test]
async fn test_view_without_mapping_is_invalid_submission() {
    let submission = FormSubmission::new(
        store_with(view("sqlite", ConnectionConfig::new(), json!({}))).await,
        RecordingRefreshQueue::new(),
        Dispatcher::new(),
    );

    let err = submission
        .submit("users-form", &requester(), &values(json!({"id": 7})))
        .await
        .unwrap_err();

    assert_eq!(
        err.message(),
        "Form with view id 'users-form' has no attribute 'columnMapping' defined."
    );
}

#[tokio::test]
async fn test_missing_value_is_rejected_before_execution() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;
    let queue = RecordingRefreshQueue::new();
    let submission = FormSubmission::new(
        store_with(view("sqlite", config, mapping())).await,
        queue.clone(),
        Dispatcher::new(),
    );

    let err = submission
        .submit("users-form", &requester(), &values(json!({"id": 7})))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), SubmissionErrorKind::InvalidSubmission(_)));
    assert!(queue.requests().await.is_empty());
}

#[tokio::test]
async fn test_no_matching_row_fails_without_refresh() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;
    let queue = RecordingRefreshQueue::new();
    let submission = FormSubmission::new(
        store_with(view("sqlite", config, mapping())).await,
        queue.clone(),
        Dispatcher::new(),
    );

    // Carol is inactive, so the query's filter excludes her.
    let err = submission
        .submit("users-form", &requester(), &values(json!({"id": 8, "name": "Dave"})))
        .await
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &SubmissionErrorKind::ExecutionFailed("Query completed but it returned no data.".to_string())
    );
    assert!(queue.requests().await.is_empty());
}

#[tokio::test]
async fn test_unavailable_queue_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;
    let submission = FormSubmission::new(
        store_with(view("sqlite", config, mapping())).await,
        RecordingRefreshQueue::unavailable(),
        Dispatcher::new(),
    );

    let err = submission
        .submit("users-form", &requester(), &values(json!({"id": 7, "name": "Alice"})))
        .await
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &SubmissionErrorKind::Queue("refresh queue unavailable".to_string())
    );
}

struct CancellingExecutor;

#[async_trait]
impl StatementExecutor for CancellingExecutor {
    async fn execute(
        &self,
        _dialect: &str,
        _connection: &ConnectionConfig,
        _statement: &BoundStatement,
    ) -> Result<ExecutionOutcome, DispatchError> {
        Err(DispatchError::new(DispatchErrorKind::Cancelled(
            "canceling statement due to user request".to_string(),
        )))
    }
}

#[tokio::test]
async fn test_cancellation_propagates() {
    let submission = FormSubmission::new(
        store_with(view("pg", ConnectionConfig::new(), mapping())).await,
        RecordingRefreshQueue::new(),
        CancellingExecutor,
    );

    let err = submission
        .submit("users-form", &requester(), &values(json!({"id": 7, "name": "Alice"})))
        .await
        .unwrap_err();

    assert_eq!(
        err.message(),
        "Query cancelled: canceling statement due to user request"
    );
}
