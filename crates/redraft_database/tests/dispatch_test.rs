//! End-to-end dispatch tests against temporary SQLite databases.

use redraft_core::{
    BoundStatement, ColumnDescriptor, ConnectionConfig, ExecutionOutcome, NO_DATA_MESSAGE,
    UpdateStatement,
};
use redraft_database::{Dispatcher, DispatcherBuilder};
use redraft_error::DispatchErrorKind;
use serde_json::{Value, json};
use sqlx::{Connection, SqliteConnection};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

async fn users_database(dir: &TempDir) -> ConnectionConfig {
    let path = dir.path().join("forms.sqlite");
    seed(&path, &[
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL)",
        "INSERT INTO users (id, name, active) VALUES (7, 'Bob', 1), (8, 'Carol', 0)",
    ])
    .await;
    ConnectionConfig::new().with("dbpath", path.to_string_lossy().to_string())
}

async fn seed(path: &Path, statements: &[&str]) {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let mut conn = SqliteConnection::connect(&url).await.unwrap();
    for statement in statements {
        sqlx::query(statement).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
}

async fn read_name(config: &ConnectionConfig, id: i64) -> String {
    let path = config.text("dbpath").unwrap();
    let mut conn = SqliteConnection::connect(&format!("sqlite://{}", path))
        .await
        .unwrap();
    let name: (String,) = sqlx::query_as("SELECT name FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(&mut conn)
        .await
        .unwrap();
    name.0
}

fn rename(filter: Option<&str>, id: Value, name: Value) -> BoundStatement {
    let statement = UpdateStatement::new(
        "users",
        filter.map(str::to_string),
        vec!["name".to_string()],
        vec!["id".to_string()],
    );
    BoundStatement::new(
        statement,
        vec![("name".to_string(), name), ("id".to_string(), id)],
    )
}

#[tokio::test]
async fn test_update_returns_the_written_row() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;

    let outcome = Dispatcher::new()
        .execute(
            "sqlite",
            &config,
            &rename(Some("active = true"), json!(7), json!("Alice")),
        )
        .await
        .unwrap();

    let table = match outcome {
        ExecutionOutcome::Rows(table) => table,
        other => panic!("expected rows, got {:?}", other),
    };
    assert_eq!(
        table.columns(),
        &vec![ColumnDescriptor::new("id", None), ColumnDescriptor::new("name", None)]
    );
    assert_eq!(table.rows().len(), 1);
    assert_eq!(Value::Object(table.rows()[0].clone()), json!({"id": 7, "name": "Alice"}));
    assert_eq!(read_name(&config, 7).await, "Alice");
}

#[tokio::test]
async fn test_no_matching_row_yields_no_data_message() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;

    // Carol is inactive, so the filter excludes her row.
    let outcome = Dispatcher::new()
        .execute(
            "sqlite",
            &config,
            &rename(Some("active = true"), json!(8), json!("Dave")),
        )
        .await
        .unwrap();

    assert_eq!(outcome, ExecutionOutcome::NoData);
    assert_eq!(outcome.message(), Some(NO_DATA_MESSAGE));
    assert_eq!(
        outcome.into_parts(),
        (None, Some("Query completed but it returned no data.".to_string()))
    );
    assert_eq!(read_name(&config, 8).await, "Carol");
}

#[tokio::test]
async fn test_database_error_becomes_failed_outcome() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;
    let statement = UpdateStatement::new(
        "missing_table",
        None,
        vec!["name".to_string()],
        vec!["id".to_string()],
    );
    let bound = BoundStatement::new(
        statement,
        vec![("name".to_string(), json!("x")), ("id".to_string(), json!(1))],
    );

    let outcome = Dispatcher::new()
        .execute("sqlite", &config, &bound)
        .await
        .unwrap();

    let message = match outcome {
        ExecutionOutcome::Failed(message) => message,
        other => panic!("expected a failure message, got {:?}", other),
    };
    assert!(message.contains("no such table"), "{}", message);
}

#[tokio::test]
async fn test_failed_statement_leaves_data_untouched() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;

    // NOT NULL violation on the SET column.
    let outcome = Dispatcher::new()
        .execute("sqlite", &config, &rename(None, json!(7), Value::Null))
        .await
        .unwrap();

    assert!(matches!(outcome, ExecutionOutcome::Failed(_)));
    assert_eq!(read_name(&config, 7).await, "Bob");
}

#[tokio::test]
async fn test_unsupported_dialect_fails_before_connecting() {
    // No dbpath: building a connection string would fail differently.
    let err = Dispatcher::new()
        .execute(
            "bigquery",
            &ConnectionConfig::new(),
            &rename(None, json!(1), json!("x")),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        DispatchErrorKind::UnsupportedDialect("bigquery".to_string())
    );
}

#[tokio::test]
async fn test_missing_connection_settings_become_a_message() {
    let outcome = Dispatcher::new()
        .execute(
            "sqlite",
            &ConnectionConfig::new(),
            &rename(None, json!(1), json!("x")),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ExecutionOutcome::Failed("Connection configuration for 'sqlite' is missing 'dbpath'".to_string())
    );
}

#[tokio::test]
async fn test_unconfigured_engine_becomes_a_message() {
    let outcome = Dispatcher::new()
        .execute(
            "oracle",
            &ConnectionConfig::new().with("host", "db"),
            &rename(None, json!(1), json!("x")),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ExecutionOutcome::Failed("No connection string format configured for dialect 'oracle'".to_string())
    );
}

#[tokio::test]
async fn test_timeout_while_blocked_on_a_lock_is_cancellation() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;
    let path = config.text("dbpath").unwrap();

    // Hold the write lock so the update cannot proceed.
    let mut blocker = SqliteConnection::connect(&format!("sqlite://{}", path))
        .await
        .unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut blocker)
        .await
        .unwrap();

    let dispatcher = DispatcherBuilder::default()
        .statement_timeout(Duration::from_millis(250))
        .build()
        .unwrap();
    let err = dispatcher
        .execute("sqlite", &config, &rename(None, json!(7), json!("Alice")))
        .await
        .unwrap_err();

    sqlx::query("ROLLBACK").execute(&mut blocker).await.unwrap();
    blocker.close().await.unwrap();

    assert!(err.kind.is_cancellation());
    assert!(err.kind.to_string().contains("timeout"), "{}", err.kind);
    assert_eq!(read_name(&config, 7).await, "Bob");
}

#[tokio::test]
async fn test_statement_within_timeout_commits() {
    let dir = TempDir::new().unwrap();
    let config = users_database(&dir).await;
    let dispatcher = DispatcherBuilder::default()
        .statement_timeout(Duration::from_secs(30))
        .build()
        .unwrap();

    let outcome = dispatcher
        .execute("sqlite", &config, &rename(None, json!(7), json!("Alice")))
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(read_name(&config, 7).await, "Alice");
}
