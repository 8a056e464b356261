//! Traits for the collaborators the write-back core is embedded in.

use crate::{FormView, RefreshJob, RefreshRequest};
use async_trait::async_trait;
use redraft_core::{BoundStatement, ConnectionConfig, ExecutionOutcome};
use redraft_error::DispatchError;

/// Result type for collaborator operations.
pub type CollaboratorResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Source of form view definitions.
///
/// Resolves a view ID to its options, source query and data source. Lookups
/// are expected to be scoped to the caller's organization by the implementor.
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Load the view with `view_id`.
    async fn load_view(&self, view_id: &str) -> CollaboratorResult<FormView>;
}

/// Queue that re-runs a source query after a write-back.
///
/// Enqueueing is fire-and-forget: the core records the returned job handle
/// but never waits for the job itself.
#[async_trait]
pub trait RefreshQueue: Send + Sync {
    /// Enqueue a refresh and return its job handle.
    async fn enqueue(&self, request: RefreshRequest) -> CollaboratorResult<RefreshJob>;
}

/// Runs bound statements against a data source's engine.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Execute `statement` on the engine named by `dialect`.
    ///
    /// Non-cancellation failures come back as [`ExecutionOutcome::Failed`];
    /// only cancellation and configuration problems are errors.
    async fn execute(
        &self,
        dialect: &str,
        connection: &ConnectionConfig,
        statement: &BoundStatement,
    ) -> Result<ExecutionOutcome, DispatchError>;
}
