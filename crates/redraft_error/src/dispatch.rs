//! Engine dispatch error types.

/// Message shown for low-level I/O interruptions during execution.
pub const INTERRUPTED_MESSAGE: &str = "Query interrupted. Please retry.";

/// SQLSTATE / result codes drivers report when a statement was cancelled
/// or hit a server-side execution timeout.
///
/// `57014` is Postgres `query_canceled` (also raised for `statement_timeout`),
/// `70100` is MySQL `ER_QUERY_INTERRUPTED`, `9` is SQLite `SQLITE_INTERRUPT`.
const CANCELLATION_CODES: &[&str] = &["57014", "70100", "9"];

/// Engine dispatch failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DispatchErrorKind {
    /// Dialect identifier outside the supported set
    #[display("Datasource type '{}' not supported", _0)]
    UnsupportedDialect(String),
    /// No connection-string format has been configured for this dialect
    #[display("No connection string format configured for dialect '{}'", _0)]
    ConnectionNotConfigured(String),
    /// Connection configuration lacks a key the builder needs
    #[display("Connection configuration for '{}' is missing '{}'", dialect, key)]
    MissingConfigKey {
        /// Dialect whose builder ran
        dialect: String,
        /// Missing configuration key
        key: String,
    },
    /// Connection configuration holds a value the builder cannot use
    #[display("Connection configuration for '{}' has an invalid '{}'", dialect, key)]
    InvalidConfigValue {
        /// Dialect whose builder ran
        dialect: String,
        /// Offending configuration key
        key: String,
    },
    /// A submitted value cannot be converted to the engine's parameter type
    #[display("Parameter {} cannot be converted to {}", position, expected)]
    ParameterType {
        /// One-based position of the parameter in the rendered statement
        position: usize,
        /// Type name the engine reported
        expected: String,
    },
    /// Network or OS level interruption
    #[display("{}", _0)]
    TransientIo(String),
    /// Operator cancellation or enforced execution timeout
    #[display("Query cancelled: {}", _0)]
    Cancelled(String),
    /// Any other driver or database failure
    #[display("{}", _0)]
    Execution(String),
}

impl DispatchErrorKind {
    /// Whether this failure must propagate instead of becoming a message.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DispatchErrorKind::Cancelled(_))
    }

    /// The message a caller shows in place of a result table.
    pub fn user_message(&self) -> String {
        match self {
            DispatchErrorKind::TransientIo(_) => INTERRUPTED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Dispatch error with source location tracking.
///
/// # Examples
///
/// ```
/// use redraft_error::{DispatchError, DispatchErrorKind};
///
/// let err = DispatchError::new(DispatchErrorKind::UnsupportedDialect("bigquery".into()));
/// assert!(format!("{}", err).contains("bigquery"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Dispatch Error: {} at line {} in {}", kind, line, file)]
pub struct DispatchError {
    /// The kind of error that occurred
    pub kind: DispatchErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DispatchError {
    /// Create a new DispatchError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DispatchErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DispatchErrorKind {
        &self.kind
    }
}

/// Whether a driver-reported error code signals cancellation or timeout.
pub fn is_cancellation_code(code: &str) -> bool {
    CANCELLATION_CODES.contains(&code)
}

// Driver error classification (only available with database feature)
#[cfg(feature = "database")]
impl From<sqlx::Error> for DispatchError {
    #[track_caller]
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Io(e) => DispatchErrorKind::TransientIo(e.to_string()),
            sqlx::Error::Database(db)
                if db.code().is_some_and(|code| is_cancellation_code(&code)) =>
            {
                DispatchErrorKind::Cancelled(db.message().to_string())
            }
            _ => DispatchErrorKind::Execution(err.to_string()),
        };
        DispatchError::new(kind)
    }
}
