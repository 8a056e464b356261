//! Execution of bound statements against a data source's engine.

use crate::bind::{bind_mysql, bind_postgres, bind_sqlite};
use crate::convert::{Positional, convert_mysql_rows, convert_pg_rows, convert_sqlite_rows};
use crate::{connection_string, resolve_column_type};
use async_trait::async_trait;
use derive_getters::Getters;
use redraft_core::{BoundStatement, ConnectionConfig, Dialect, ExecutionOutcome, ResultTable};
use redraft_error::{DispatchError, DispatchErrorKind};
use redraft_interface::StatementExecutor;
use serde_json::Value;
use sqlx::mysql::MySqlConnection;
use sqlx::postgres::PgConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, Either, Executor, Statement};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Runs bound statements on the engine a data source names.
///
/// Every call opens its own connection and transaction; nothing is pooled or
/// shared between calls.
///
/// # Examples
///
/// ```
/// use redraft_database::DispatcherBuilder;
/// use std::future::Future;
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// let dispatcher = DispatcherBuilder::default()
///     .statement_timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(dispatcher.statement_timeout(), &Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Default, Getters, derive_builder::Builder)]
#[builder(setter(into, strip_option), default)]
pub struct Dispatcher {
    /// Upper bound on connecting plus executing; elapsing cancels the call.
    /// Commit is not bounded, so a reported cancellation never hides a write.
    statement_timeout: Option<Duration>,
}

impl Dispatcher {
    /// Dispatcher without an execution timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `statement` on the engine named by `dialect_id`.
    ///
    /// The statement runs inside a transaction that commits only after all
    /// returned rows were read; any failure or cancellation rolls it back.
    ///
    /// # Errors
    ///
    /// * `UnsupportedDialect` before anything else when `dialect_id` is
    ///   outside the supported set.
    /// * `Cancelled` when the engine reports a cancelled statement or the
    ///   configured timeout elapses before the statement returns. The
    ///   timeout never interrupts the commit, so `Cancelled` always means
    ///   nothing was written.
    ///
    /// Every other failure is returned as [`ExecutionOutcome::Failed`], with
    /// I/O interruptions reported as "Query interrupted. Please retry.".
    #[instrument(
        name = "dispatch.execute",
        skip(self, connection, statement),
        fields(
            dialect = %dialect_id,
            parameters = statement.parameters().len(),
            rows = tracing::field::Empty
        )
    )]
    pub async fn execute(
        &self,
        dialect_id: &str,
        connection: &ConnectionConfig,
        statement: &BoundStatement,
    ) -> Result<ExecutionOutcome, DispatchError> {
        let dialect = Dialect::parse(dialect_id)?;
        let deadline = self.statement_timeout.map(Deadline::after);

        let result = run_statement(dialect, connection, statement, deadline).await;

        match result {
            Ok((_, rows)) if rows.is_empty() => {
                tracing::Span::current().record("rows", 0);
                warn!("Statement completed without returning rows");
                Ok(ExecutionOutcome::NoData)
            }
            Ok((columns, rows)) => {
                tracing::Span::current().record("rows", rows.len());
                let resolved = columns
                    .iter()
                    .map(|c| (c.name().clone(), resolve_column_type(dialect, c)))
                    .collect();
                info!(columns = columns.len(), rows = rows.len(), "Statement returned rows");
                Ok(ExecutionOutcome::Rows(ResultTable::from_positional(
                    resolved, rows,
                )))
            }
            Err(err) if err.kind.is_cancellation() => {
                warn!(error = %err.kind, "Statement cancelled");
                Err(err)
            }
            Err(err) => {
                match &err.kind {
                    DispatchErrorKind::TransientIo(_) => {
                        warn!(error = %err.kind, "Statement interrupted")
                    }
                    _ => error!(error = %err.kind, "Statement failed"),
                }
                Ok(ExecutionOutcome::Failed(err.kind.user_message()))
            }
        }
    }
}

#[async_trait]
impl StatementExecutor for Dispatcher {
    async fn execute(
        &self,
        dialect: &str,
        connection: &ConnectionConfig,
        statement: &BoundStatement,
    ) -> Result<ExecutionOutcome, DispatchError> {
        Dispatcher::execute(self, dialect, connection, statement).await
    }
}

/// Point in time after which connecting and executing are abandoned.
///
/// Committing is never raced against the deadline: once the statement has
/// returned its rows the outcome is decided by the commit alone.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    limit: Duration,
    at: Instant,
}

impl Deadline {
    fn after(limit: Duration) -> Self {
        Self {
            limit,
            at: Instant::now() + limit,
        }
    }
}

/// Run `work` until `deadline`; elapsing drops it and raises `Cancelled`.
async fn within<T, F>(deadline: Option<Deadline>, work: F) -> Result<T, DispatchError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match deadline {
        None => Ok(work.await?),
        Some(deadline) => match tokio::time::timeout_at(deadline.at, work).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(DispatchError::new(DispatchErrorKind::Cancelled(format!(
                "execution exceeded the {:?} timeout",
                deadline.limit
            )))),
        },
    }
}

async fn run_statement(
    dialect: Dialect,
    connection: &ConnectionConfig,
    statement: &BoundStatement,
    deadline: Option<Deadline>,
) -> Result<Positional, DispatchError> {
    let url = connection_string(dialect, connection)?;
    let sql = statement
        .statement()
        .render(dialect.placeholder_style());
    let values: Vec<Value> = statement.values().cloned().collect();
    debug!(%dialect, sql = %sql, "Rendered statement");

    match dialect {
        Dialect::Pg => run_postgres(&url, &sql, &values, deadline).await,
        Dialect::Mysql => run_mysql(&url, &sql, &values, deadline).await,
        Dialect::Sqlite => run_sqlite(&url, &sql, &values, deadline).await,
        Dialect::Mssql | Dialect::Oracle => Err(DispatchError::new(
            DispatchErrorKind::ConnectionNotConfigured(dialect.to_string()),
        )),
    }
}

// Leaving any of these functions before `commit` drops the transaction,
// which rolls it back.

async fn run_postgres(
    url: &str,
    sql: &str,
    values: &[Value],
    deadline: Option<Deadline>,
) -> Result<Positional, DispatchError> {
    let mut conn = within(deadline, PgConnection::connect(url)).await?;
    let mut tx = within(deadline, conn.begin()).await?;

    let prepared = within(deadline, (&mut *tx).prepare(sql)).await?;
    let types = match prepared.parameters() {
        Some(Either::Left(types)) => types.to_vec(),
        _ => Vec::new(),
    };
    let query = bind_postgres(prepared.query(), values, &types)?;
    let rows = within(deadline, query.fetch_all(&mut *tx)).await?;

    tx.commit().await?;
    close(conn).await;
    Ok(convert_pg_rows(&rows))
}

async fn run_mysql(
    url: &str,
    sql: &str,
    values: &[Value],
    deadline: Option<Deadline>,
) -> Result<Positional, DispatchError> {
    let mut conn = within(deadline, MySqlConnection::connect(url)).await?;
    let mut tx = within(deadline, conn.begin()).await?;

    let query = bind_mysql(sqlx::query(sql), values);
    let rows = within(deadline, query.fetch_all(&mut *tx)).await?;

    tx.commit().await?;
    close(conn).await;
    Ok(convert_mysql_rows(&rows))
}

async fn run_sqlite(
    url: &str,
    sql: &str,
    values: &[Value],
    deadline: Option<Deadline>,
) -> Result<Positional, DispatchError> {
    let mut conn = within(deadline, SqliteConnection::connect(url)).await?;
    let mut tx = within(deadline, conn.begin()).await?;

    let query = bind_sqlite(sqlx::query(sql), values);
    let rows = within(deadline, query.fetch_all(&mut *tx)).await?;

    tx.commit().await?;
    close(conn).await;
    Ok(convert_sqlite_rows(&rows))
}

// The transaction is already committed; a failed goodbye does not change the outcome.
async fn close<C: Connection>(conn: C) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "Connection did not close cleanly");
    }
}
