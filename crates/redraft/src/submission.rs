//! Form submission: synthesize, bind, execute and schedule a refresh.

use derive_getters::Getters;
use redraft_core::{ColumnRoleMapping, Dialect, ExecutionOutcome, NO_DATA_MESSAGE, ResultTable};
use redraft_database::Dispatcher;
use redraft_error::{DispatchErrorKind, SubmissionError, SubmissionErrorKind};
use redraft_interface::{
    FormView, RefreshJob, RefreshQueue, RefreshRequest, Requester, StatementExecutor, ViewStore,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

/// Successful submission: the refresh job handle plus the written rows.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct SubmissionResponse {
    /// Refresh job scheduled for the view's source query
    job: RefreshJob,
    /// Rows returned by the update
    data: ResultTable,
}

/// Handles form submissions against the views in a [`ViewStore`].
///
/// The executor defaults to [`Dispatcher`]; tests and embedders may supply
/// their own.
#[derive(Debug, Clone)]
pub struct FormSubmission<V, Q, E = Dispatcher> {
    views: V,
    queue: Q,
    executor: E,
}

impl<V, Q, E> FormSubmission<V, Q, E>
where
    V: ViewStore,
    Q: RefreshQueue,
    E: StatementExecutor,
{
    /// Wire a submission handler to its collaborators.
    pub fn new(views: V, queue: Q, executor: E) -> Self {
        Self {
            views,
            queue,
            executor,
        }
    }

    /// Write `values` back through the view identified by `view_id`.
    ///
    /// Submitted values are never logged.
    ///
    /// # Errors
    ///
    /// * `ViewNotFound` if the view cannot be loaded.
    /// * `InvalidDataSource` if the view's data source engine is unsupported.
    /// * `InvalidSubmission` if the mapping, the source query or the values
    ///   are rejected before execution.
    /// * `ExecutionFailed` if the statement failed or returned no rows.
    /// * `Cancelled` if execution was cancelled or timed out.
    /// * `Queue` if the refresh job could not be scheduled.
    #[instrument(
        name = "submission.submit",
        skip(self, requester, values),
        fields(user_id = requester.id(), submitted = values.len())
    )]
    pub async fn submit(
        &self,
        view_id: &str,
        requester: &Requester,
        values: &Map<String, Value>,
    ) -> Result<SubmissionResponse, SubmissionError> {
        let view = self.views.load_view(view_id).await.map_err(|e| {
            SubmissionError::new(SubmissionErrorKind::ViewNotFound(e.to_string()))
        })?;
        check_data_source(&view)?;

        let query = view.query();
        let source = query.data_source();
        let mapping = ColumnRoleMapping::from_view_options(view.id(), view.options())
            .map_err(|e| SubmissionError::new(SubmissionErrorKind::InvalidSubmission(e.message())))?;
        let statement = redraft_synth::synthesize(query.query_text(), &mapping)
            .map_err(|e| SubmissionError::new(SubmissionErrorKind::InvalidSubmission(e.message())))?;
        let bound = redraft_synth::bind(statement, values)
            .map_err(|e| SubmissionError::new(SubmissionErrorKind::InvalidSubmission(e.message())))?;

        let outcome = self
            .executor
            .execute(source.engine(), source.configuration(), &bound)
            .await
            .map_err(|e| {
                SubmissionError::new(match e.kind {
                    DispatchErrorKind::Cancelled(reason) => SubmissionErrorKind::Cancelled(reason),
                    other => SubmissionErrorKind::InvalidDataSource(other.user_message()),
                })
            })?;

        let data = match outcome {
            ExecutionOutcome::Rows(table) => table,
            ExecutionOutcome::NoData => {
                return Err(SubmissionError::new(SubmissionErrorKind::ExecutionFailed(
                    NO_DATA_MESSAGE.to_string(),
                )));
            }
            ExecutionOutcome::Failed(message) => {
                return Err(SubmissionError::new(SubmissionErrorKind::ExecutionFailed(
                    message,
                )));
            }
        };

        let job = self
            .queue
            .enqueue(RefreshRequest::for_query(query, requester))
            .await
            .map_err(|e| {
                warn!(error = %e, "Write-back succeeded but the refresh was not scheduled");
                SubmissionError::new(SubmissionErrorKind::Queue(e.to_string()))
            })?;

        info!(view_id, job_id = %job.id(), rows = data.rows().len(), "Form submission written");
        Ok(SubmissionResponse { job, data })
    }
}

fn check_data_source(view: &FormView) -> Result<(), SubmissionError> {
    let source = view.query().data_source();
    if Dialect::is_supported(source.engine()) {
        return Ok(());
    }
    Err(SubmissionError::new(SubmissionErrorKind::InvalidDataSource(
        format!(
            "Datasource '{}' with id '{}' is invalid: Datasource type '{}' not supported",
            source.name(),
            source.id(),
            source.engine()
        ),
    )))
}
