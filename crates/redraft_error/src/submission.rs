//! Form submission error types.

/// Failure conditions of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SubmissionErrorKind {
    /// The view, its source query, or its data source could not be loaded
    #[display("{}", _0)]
    ViewNotFound(String),
    /// The data source uses an engine outside the supported set
    #[display("{}", _0)]
    InvalidDataSource(String),
    /// Statement synthesis or binding rejected the submission
    #[display("{}", _0)]
    InvalidSubmission(String),
    /// Execution finished with a failure message
    #[display("{}", _0)]
    ExecutionFailed(String),
    /// Execution was cancelled or timed out
    #[display("Query cancelled: {}", _0)]
    Cancelled(String),
    /// The refresh job could not be enqueued
    #[display("Failed to enqueue refresh: {}", _0)]
    Queue(String),
}

impl SubmissionErrorKind {
    /// Whether this failure is attributable to the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SubmissionErrorKind::InvalidDataSource(_)
                | SubmissionErrorKind::InvalidSubmission(_)
                | SubmissionErrorKind::ExecutionFailed(_)
        )
    }
}

/// Submission error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Submission Error: {} at line {} in {}", kind, line, file)]
pub struct SubmissionError {
    kind: SubmissionErrorKind,
    line: u32,
    file: &'static str,
}

impl SubmissionError {
    /// Create a new submission error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SubmissionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SubmissionErrorKind {
        &self.kind
    }

    /// Message for the external-facing response, without location details.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl<T> From<T> for SubmissionError
where
    T: Into<SubmissionErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}
